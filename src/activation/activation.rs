use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    Identity,
    /// Softmax is a vector-valued activation; it is applied row by row in
    /// `apply()` rather than through the element-wise `function()`.
    Softmax,
}

impl ActivationFunction {
    /// Element-wise activation. `Softmax` is not element-wise; use `apply()`.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity => x,
            ActivationFunction::Softmax => {
                panic!("ActivationFunction::Softmax::function() must not be called directly; \
                        use ActivationFunction::apply() which applies the row-wise softmax.")
            }
        }
    }

    /// Element-wise derivative of the activation.
    ///
    /// For `Softmax`, the output layer is paired with cross-entropy and the
    /// combined gradient `predicted - expected` is already w.r.t. the logits
    /// (see `CrossEntropyLoss::derivative()`). Returning `1.0` passes that
    /// delta through unchanged instead of applying the Jacobian twice.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Softmax => 1.0,
        }
    }

    /// Activates a batch of pre-activations `z` (one example per row).
    pub fn apply(&self, z: &Matrix) -> Matrix {
        match self {
            ActivationFunction::Softmax => z.map_rows(softmax),
            _ => z.map(|x| self.function(x)),
        }
    }
}

/// Numerically stable softmax of a single row.
pub fn softmax(row: &[f64]) -> Vec<f64> {
    let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = row.iter().map(|x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn relu_clamps_negatives() {
        let z = Matrix::from_data(vec![vec![-2.0, 0.0, 3.5]]);
        assert_eq!(ActivationFunction::ReLU.apply(&z).data, vec![vec![0.0, 0.0, 3.5]]);
        assert_eq!(ActivationFunction::ReLU.derivative(-1.0), 0.0);
        assert_eq!(ActivationFunction::ReLU.derivative(1.0), 1.0);
    }

    #[test]
    fn softmax_rows_sum_to_one() {
        let z = Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![1000.0, 1000.0, -1000.0]]);
        let p = ActivationFunction::Softmax.apply(&z);
        for row in &p.data {
            assert_abs_diff_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(p.data[1][0], 0.5, epsilon = 1e-12);
        assert!(p.data[0][2] > p.data[0][1] && p.data[0][1] > p.data[0][0]);
    }

    #[test]
    #[should_panic(expected = "must not be called directly")]
    fn softmax_is_not_element_wise() {
        ActivationFunction::Softmax.function(0.0);
    }
}

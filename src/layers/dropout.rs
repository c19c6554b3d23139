use rand::{Rng, RngCore};
use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Inverted dropout: during training each unit is zeroed with probability
/// `p` and survivors are scaled by `1 / (1 - p)`, so evaluation is identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dropout {
    pub p: f64,
}

impl Dropout {
    pub fn new(p: f64) -> Dropout {
        assert!((0.0..1.0).contains(&p), "dropout probability must be in [0, 1)");
        Dropout { p }
    }

    /// Samples a scaled keep-mask with the same shape as the activations.
    pub fn sample_mask(&self, rows: usize, cols: usize, rng: &mut dyn RngCore) -> Matrix {
        let scale = 1.0 / (1.0 - self.p);
        let mut mask = Matrix::zeros(rows, cols);
        for row in mask.data.iter_mut() {
            for m in row.iter_mut() {
                if !rng.gen_bool(self.p) {
                    *m = scale;
                }
            }
        }
        mask
    }
}

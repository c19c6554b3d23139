use crate::math::matrix::Matrix;

/// Categorical cross-entropy loss for use with a Softmax output layer and
/// integer class labels.
///
/// Softmax is applied exactly once, in the output layer. Pipelines that feed
/// already-softmaxed scores into a log-softmax loss report a compressed loss
/// range, so values printed here are not numerically comparable to theirs.
pub struct CrossEntropyLoss;

/// Small epsilon added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// Mean cross-entropy over a batch:
    ///   L = -(1/n) · Σ_i log(predicted[i][labels[i]] + eps)
    ///
    /// `predicted` — softmax probabilities, shape [n, n_classes]
    /// `labels`    — class index per row, length n
    pub fn loss(predicted: &Matrix, labels: &[usize]) -> f64 {
        assert_eq!(predicted.rows, labels.len(), "one label per prediction row");
        let n = labels.len() as f64;
        predicted.data.iter().zip(labels.iter())
            .map(|(p, &y)| -(p[y] + EPS).ln())
            .sum::<f64>() / n
    }

    /// Gradient of the combined Softmax + cross-entropy w.r.t. the pre-softmax
    /// logits, already divided by the batch size to match the mean in `loss`:
    ///   ∂L/∂z_ij = (predicted[i][j] - onehot(labels[i])[j]) / n
    ///
    /// The Softmax activation's own derivative is identity (1.0), so this
    /// delta passes straight into the output layer's weight gradients.
    pub fn derivative(predicted: &Matrix, labels: &[usize]) -> Matrix {
        assert_eq!(predicted.rows, labels.len(), "one label per prediction row");
        let n = labels.len() as f64;
        let mut delta = predicted.map(|p| p / n);
        for (row, &y) in delta.data.iter_mut().zip(labels.iter()) {
            row[y] -= 1.0 / n;
        }
        delta
    }
}

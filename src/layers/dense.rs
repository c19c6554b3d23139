use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{
    activation::activation::ActivationFunction,
    layers::dropout::Dropout,
    math::matrix::Matrix,
    network::mode::Mode,
};

/// Fully connected layer: `a = act(x·W + b)`, optionally followed by dropout.
///
/// Weights are stored input-major (`input_size × size`) so a batch with one
/// example per row multiplies on the left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer{
    pub size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
    pub dropout: Option<Dropout>,
}

/// Everything the backward pass needs from one layer's forward pass.
#[derive(Debug, Clone)]
pub struct LayerCache {
    pub input: Matrix,
    /// Pre-activation values (z = xW + b), needed for the activation derivative.
    pub pre_activation: Matrix,
    /// Scaled keep-mask; `None` when dropout was inactive.
    pub mask: Option<Matrix>,
    pub output: Matrix,
}

#[derive(Debug, Clone)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub biases: Matrix,
    /// ∂L/∂x, handed to the previous layer.
    pub input_delta: Matrix,
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        dropout: Option<Dropout>,
        rng: &mut R,
    ) -> Layer {
        let bound = 1.0 / (input_size as f64).sqrt();
        let weights = Matrix::uniform(input_size, size, bound, rng);
        let biases = Matrix::uniform(1, size, bound, rng);

        Layer {
            size,
            weights,
            biases,
            activator: activation,
            dropout,
        }
    }

    pub fn feed_from(&self, input: &Matrix, mode: Mode<'_>) -> LayerCache {
        let z = input.dot(&self.weights).add_row(&self.biases);
        let a = self.activator.apply(&z);

        let (output, mask) = match (self.dropout, mode) {
            (Some(dropout), Mode::Train(rng)) => {
                let mask = dropout.sample_mask(a.rows, a.cols, rng);
                (a.hadamard(&mask), Some(mask))
            }
            _ => (a, None),
        };

        LayerCache {
            input: input.clone(),
            pre_activation: z,
            mask,
            output,
        }
    }

    /// Computes gradients for one batch.
    /// `upstream` is ∂L/∂output for this layer (error in activation space).
    pub fn compute_gradients(&self, cache: &LayerCache, upstream: &Matrix) -> LayerGradients {
        let upstream = match &cache.mask {
            Some(mask) => upstream.hadamard(mask),
            None => upstream.clone(),
        };
        // Use pre-activation z so that derivative(z) = σ'(z) is computed correctly
        let act_derivative = cache.pre_activation.map(|x| self.activator.derivative(x));
        let layer_delta = upstream.hadamard(&act_derivative);

        LayerGradients {
            weights: cache.input.transpose().dot(&layer_delta),
            biases: layer_delta.sum_rows(),
            input_delta: layer_delta.dot(&self.weights.transpose()),
        }
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, lr: f64) {
        self.weights = std::mem::take(&mut self.weights) - weights_grad.map(|x| x * lr);
        self.biases = std::mem::take(&mut self.biases) - biases_grad.map(|x| x * lr);
    }
}

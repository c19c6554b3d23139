use crate::{layers::dense::LayerGradients, network::network::Network};

/// Plain stochastic gradient descent: fixed learning rate, no momentum.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one SGD update to every layer given its pre-computed gradients.
    pub fn step(&self, network: &mut Network, grads: &[LayerGradients]) {
        assert_eq!(network.layers.len(), grads.len(), "one gradient set per layer");
        for (layer, g) in network.layers.iter_mut().zip(grads.iter()) {
            layer.apply_gradients(&g.weights, &g.biases, self.learning_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        activation::ActivationFunction,
        layers::dense::Layer,
        math::matrix::Matrix,
    };

    #[test]
    fn step_moves_against_the_gradient() {
        let mut network = Network {
            layers: vec![Layer {
                size: 1,
                weights: Matrix::from_data(vec![vec![1.0]]),
                biases: Matrix::from_data(vec![vec![0.0]]),
                activator: ActivationFunction::Identity,
                dropout: None,
            }],
        };
        let grads = vec![LayerGradients {
            weights: Matrix::from_data(vec![vec![2.0]]),
            biases: Matrix::from_data(vec![vec![-1.0]]),
            input_delta: Matrix::zeros(1, 1),
        }];
        Sgd::new(0.5).step(&mut network, &grads);
        assert_eq!(network.layers[0].weights.data, vec![vec![0.0]]);
        assert_eq!(network.layers[0].biases.data, vec![vec![0.5]]);
    }
}

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{
    error::{Error, Result},
    layers::{dense::{Layer, LayerCache, LayerGradients}, dropout::Dropout},
    math::matrix::Matrix,
    network::{
        mode::Mode,
        parameters::{bias_name, weight_name, ModelParameters},
        spec::NetworkSpec,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
}

/// Per-layer caches recorded by `Network::forward`, consumed by `backward`.
#[derive(Debug, Clone)]
pub struct ForwardTrace {
    pub caches: Vec<LayerCache>,
}

impl ForwardTrace {
    /// Network output (class probabilities for a softmax head).
    pub fn output(&self) -> &Matrix {
        &self.caches.last().expect("a network has at least one layer").output
    }
}

impl Network {
    /// Builds a network from `spec`, drawing initial weights from `rng`.
    ///
    /// # Panics
    /// Panics if `spec.validate()` fails: no layers, consecutive layer sizes
    /// that disagree, or a dropout probability outside [0, 1). Callers taking
    /// specs from untrusted input should validate first.
    pub fn new<R: Rng + ?Sized>(spec: &NetworkSpec, rng: &mut R) -> Network {
        check_spec(spec);
        let layers = spec.layers.iter()
            .map(|l| Layer::new(l.size, l.input_size, l.activation, l.dropout.map(Dropout::new), &mut *rng))
            .collect();
        Network { layers }
    }

    /// Rebuilds a network for `spec` holding exactly `params`.
    pub fn from_parameters(spec: &NetworkSpec, params: &ModelParameters) -> Result<Network> {
        check_spec(spec);
        let mut network = Network {
            layers: spec.layers.iter()
                .map(|l| Layer {
                    size: l.size,
                    weights: Matrix::zeros(l.input_size, l.size),
                    biases: Matrix::zeros(1, l.size),
                    activator: l.activation,
                    dropout: l.dropout.map(Dropout::new),
                })
                .collect(),
        };
        network.load_state_dict(params)?;
        Ok(network)
    }

    /// Forward pass over a batch (one example per row).
    pub fn forward(&self, input: &Matrix, mut mode: Mode<'_>) -> ForwardTrace {
        let mut caches: Vec<LayerCache> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let cache = {
                let x = caches.last().map_or(input, |c| &c.output);
                layer.feed_from(x, mode.reborrow())
            };
            caches.push(cache);
        }
        ForwardTrace { caches }
    }

    /// Eval-mode forward pass returning only the output.
    pub fn predict(&self, input: &Matrix) -> Matrix {
        let mut trace = self.forward(input, Mode::Eval);
        trace.caches.pop().map(|c| c.output).unwrap_or_default()
    }

    /// Backpropagates `output_delta` (∂L/∂output) through the recorded trace.
    /// Returns one gradient set per layer, in layer order.
    pub fn backward(&self, trace: &ForwardTrace, output_delta: Matrix) -> Vec<LayerGradients> {
        let mut grads: Vec<LayerGradients> = Vec::with_capacity(self.layers.len());
        let mut delta = output_delta;
        for (layer, cache) in self.layers.iter().zip(trace.caches.iter()).rev() {
            let g = layer.compute_gradients(cache, &delta);
            delta = g.input_delta.clone();
            grads.push(g);
        }
        grads.reverse();
        grads
    }

    pub fn num_parameters(&self) -> usize {
        self.layers.iter()
            .map(|l| l.weights.rows * l.weights.cols + l.biases.cols)
            .sum()
    }

    /// Deep copy of every trainable tensor.
    pub fn state_dict(&self) -> ModelParameters {
        let mut params = ModelParameters::new();
        for (i, layer) in self.layers.iter().enumerate() {
            params.insert(weight_name(i), layer.weights.clone());
            params.insert(bias_name(i), layer.biases.clone());
        }
        params
    }

    /// Overwrites every tensor with the values in `params`.
    ///
    /// Names and shapes must match this network exactly; on error the
    /// network is left unchanged.
    pub fn load_state_dict(&mut self, params: &ModelParameters) -> Result<()> {
        let expected = self.state_dict();
        for name in params.names() {
            if expected.get(name).is_none() {
                return Err(Error::UnexpectedParameter(name.to_string()));
            }
        }
        for (name, current) in expected.iter() {
            let incoming = params.get(name)
                .ok_or_else(|| Error::MissingParameter(name.to_string()))?;
            if incoming.shape() != current.shape() {
                return Err(Error::ParameterShape {
                    name: name.to_string(),
                    expected: current.shape(),
                    found: incoming.shape(),
                });
            }
        }

        for (i, layer) in self.layers.iter_mut().enumerate() {
            if let (Some(w), Some(b)) = (params.get(&weight_name(i)), params.get(&bias_name(i))) {
                layer.weights = w.clone();
                layer.biases = b.clone();
            }
        }
        Ok(())
    }
}

fn check_spec(spec: &NetworkSpec) {
    if let Err(e) = spec.validate() {
        panic!("{e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn iris_net(seed: u64) -> Network {
        Network::new(&NetworkSpec::iris_classifier(), &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn iris_classifier_maps_four_features_to_three_probabilities() {
        let net = iris_net(29);
        let x = Matrix::from_data(vec![vec![0.8, 0.5, 0.3, 0.1], vec![0.7, 0.3, 0.6, 0.2]]);
        let p = net.predict(&x);
        assert_eq!(p.shape(), (2, 3));
        for row in &p.data {
            assert_abs_diff_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        }
        assert_eq!(net.num_parameters(), 4 * 100 + 100 + 100 * 100 + 100 + 100 * 3 + 3);
    }

    #[test]
    fn eval_forward_is_deterministic() {
        let net = iris_net(5);
        let x = Matrix::from_data(vec![vec![0.5, 0.5, 0.5, 0.5]]);
        assert_eq!(net.predict(&x), net.predict(&x));
    }

    #[test]
    fn train_forward_applies_dropout() {
        let net = iris_net(5);
        let x = Matrix::from_data(vec![vec![0.5, 0.5, 0.5, 0.5]]);
        let mut rng = StdRng::seed_from_u64(8);
        let trace = net.forward(&x, Mode::Train(&mut rng));
        assert!(trace.caches[0].mask.is_some());
        assert!(trace.caches[1].mask.is_some());
        assert!(trace.caches[2].mask.is_none());
    }

    #[test]
    fn backward_yields_gradient_per_layer_with_parameter_shapes() {
        let net = iris_net(2);
        let x = Matrix::from_data(vec![vec![0.1, 0.2, 0.3, 0.4]; 3]);
        let trace = net.forward(&x, Mode::Eval);
        let grads = net.backward(&trace, Matrix::from_data(vec![vec![0.1, -0.2, 0.1]; 3]));
        assert_eq!(grads.len(), 3);
        for (g, l) in grads.iter().zip(net.layers.iter()) {
            assert_eq!(g.weights.shape(), l.weights.shape());
            assert_eq!(g.biases.shape(), l.biases.shape());
        }
    }

    #[test]
    fn state_dict_round_trips_into_fresh_network() {
        let trained = iris_net(1);
        let params = trained.state_dict();
        assert_eq!(params.len(), 6);
        assert_eq!(params.num_scalars(), trained.num_parameters());
        assert_eq!(params.names().collect::<Vec<_>>(),
            vec!["l1.bias", "l1.weight", "l2.bias", "l2.weight", "l3.bias", "l3.weight"]);

        let restored = Network::from_parameters(&NetworkSpec::iris_classifier(), &params).unwrap();
        assert_eq!(restored.state_dict(), params);
    }

    #[test]
    fn load_state_dict_rejects_wrong_shapes_and_names() {
        let mut net = iris_net(1);
        let before = net.state_dict();

        let mut bad = before.clone();
        bad.insert("l1.weight", Matrix::zeros(3, 100));
        assert!(matches!(net.load_state_dict(&bad), Err(Error::ParameterShape { .. })));

        let mut extra = before.clone();
        extra.insert("l4.weight", Matrix::zeros(1, 1));
        assert!(matches!(net.load_state_dict(&extra), Err(Error::UnexpectedParameter(_))));

        assert!(matches!(net.load_state_dict(&ModelParameters::new()), Err(Error::MissingParameter(_))));
        assert_eq!(net.state_dict(), before);
    }
}

use serde::{Serialize, Deserialize};
use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`       — number of neurons in this layer
/// - `input_size` — number of neurons feeding into this layer (i.e. the output
///                  size of the previous layer, or the raw input dimension for
///                  the first layer)
/// - `activation` — activation function applied after the linear transform
/// - `dropout`    — drop probability applied to the activations while training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
    #[serde(default)]
    pub dropout: Option<f64>,
}

/// A serializable description of a network architecture, independent of
/// any trained weights. Building two networks from the same spec yields
/// parameter sets with identical names and shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
}

/// Drop probability used between the hidden layers of the iris classifier.
pub const IRIS_DROPOUT: f64 = 0.1;

impl NetworkSpec {
    /// 4 → 100 (ReLU, dropout) → 100 (ReLU, dropout) → 3 (Softmax).
    pub fn iris_classifier() -> NetworkSpec {
        NetworkSpec {
            name: "iris_nn".to_string(),
            layers: vec![
                LayerSpec { size: 100, input_size: 4, activation: ActivationFunction::ReLU, dropout: Some(IRIS_DROPOUT) },
                LayerSpec { size: 100, input_size: 100, activation: ActivationFunction::ReLU, dropout: Some(IRIS_DROPOUT) },
                LayerSpec { size: 3, input_size: 100, activation: ActivationFunction::Softmax, dropout: None },
            ],
        }
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    /// Checks that the spec describes a buildable network: at least one
    /// layer, consecutive sizes that chain, and dropout in [0, 1).
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Error::InvalidSpec("network spec must have at least one layer".into()));
        }
        for pair in self.layers.windows(2) {
            if pair[0].size != pair[1].input_size {
                return Err(Error::InvalidSpec(format!(
                    "layer of size {} cannot feed a layer expecting {} inputs",
                    pair[0].size, pair[1].input_size
                )));
            }
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if let Some(p) = layer.dropout {
                if !(0.0..1.0).contains(&p) {
                    return Err(Error::InvalidSpec(format!(
                        "layer {} dropout probability {p} is outside [0, 1)", i + 1
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iris_classifier_is_valid() {
        let spec = NetworkSpec::iris_classifier();
        assert!(spec.validate().is_ok());
        assert_eq!((spec.input_size(), spec.output_size()), (4, 3));
    }

    #[test]
    fn validate_rejects_unbuildable_specs() {
        let mut full_dropout = NetworkSpec::iris_classifier();
        full_dropout.layers[0].dropout = Some(1.0);
        assert!(matches!(full_dropout.validate(), Err(Error::InvalidSpec(_))));

        let mut broken_chain = NetworkSpec::iris_classifier();
        broken_chain.layers[1].input_size = 50;
        assert!(matches!(broken_chain.validate(), Err(Error::InvalidSpec(_))));

        let empty = NetworkSpec { name: "empty".into(), layers: vec![] };
        assert!(matches!(empty.validate(), Err(Error::InvalidSpec(_))));
    }
}

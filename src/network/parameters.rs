use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// An owned snapshot of every trainable tensor in a `Network`, keyed by name
/// (`l1.weight`, `l1.bias`, ...).
///
/// Taking a snapshot copies all values, so later updates to the live network
/// never show up here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelParameters {
    tensors: BTreeMap<String, Matrix>,
}

impl ModelParameters {
    pub fn new() -> ModelParameters {
        ModelParameters::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, tensor: Matrix) {
        self.tensors.insert(name.into(), tensor);
    }

    pub fn get(&self, name: &str) -> Option<&Matrix> {
        self.tensors.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tensors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Matrix)> {
        self.tensors.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Total number of scalar values across all tensors.
    pub fn num_scalars(&self) -> usize {
        self.tensors.values().map(|m| m.rows * m.cols).sum()
    }
}

pub(crate) fn weight_name(layer_idx: usize) -> String {
    format!("l{}.weight", layer_idx + 1)
}

pub(crate) fn bias_name(layer_idx: usize) -> String {
    format!("l{}.bias", layer_idx + 1)
}

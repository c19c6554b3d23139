use crate::{
    data::dataset::Dataset,
    error::{Error, Result},
    math::matrix::Matrix,
};

/// One raw example borrowed from the underlying dataset. `target` is a
/// length-1 slice so batches can be formed by concatenation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<'a> {
    pub data: &'a [f64],
    pub target: &'a [usize],
}

/// An example converted into model-ready form: a 1×n_features row plus labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorSample {
    pub data: Matrix,
    pub target: Vec<usize>,
}

/// Per-access conversion applied by `TabularDataset::get`.
pub trait Transform {
    type Output;

    fn apply(&self, sample: Sample<'_>) -> Self::Output;
}

/// Converts raw feature slices into `Matrix` rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTensor;

impl Transform for ToTensor {
    type Output = TensorSample;

    fn apply(&self, sample: Sample<'_>) -> TensorSample {
        TensorSample {
            data: Matrix::from_data(vec![sample.data.to_vec()]),
            target: sample.target.to_vec(),
        }
    }
}

/// Anything that can name a sample position.
///
/// Unsigned integers (`usize`, `u32`, `u64`) are used as-is once they fit in
/// `usize`; a 1×1 `Matrix` holding a non-negative whole number is unwrapped
/// to that integer first.
pub trait IntoSampleIndex {
    fn into_sample_index(self) -> Result<usize>;
}

impl IntoSampleIndex for usize {
    fn into_sample_index(self) -> Result<usize> {
        Ok(self)
    }
}

impl IntoSampleIndex for u32 {
    fn into_sample_index(self) -> Result<usize> {
        usize::try_from(self).map_err(|_| Error::InvalidIndex(format!("{self} does not fit in usize")))
    }
}

impl IntoSampleIndex for u64 {
    fn into_sample_index(self) -> Result<usize> {
        usize::try_from(self).map_err(|_| Error::InvalidIndex(format!("{self} does not fit in usize")))
    }
}

impl IntoSampleIndex for &Matrix {
    fn into_sample_index(self) -> Result<usize> {
        if self.shape() != (1, 1) {
            return Err(Error::InvalidIndex(format!(
                "tensor index must hold one value, got shape {:?}", self.shape()
            )));
        }
        let value = self.data[0][0];
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
            return Err(Error::InvalidIndex(format!("{value} is not a non-negative integer")));
        }
        Ok(value as usize)
    }
}

/// Indexed view over a `Dataset` that applies a `Transform` on each access.
#[derive(Debug, Clone)]
pub struct TabularDataset<T = ToTensor> {
    data: Dataset,
    transform: T,
}

impl TabularDataset<ToTensor> {
    pub fn new(data: Dataset) -> TabularDataset<ToTensor> {
        TabularDataset { data, transform: ToTensor }
    }
}

impl<T: Transform> TabularDataset<T> {
    pub fn with_transform(data: Dataset, transform: T) -> TabularDataset<T> {
        TabularDataset { data, transform }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.data
    }

    /// Untransformed example at `idx`.
    pub fn sample(&self, idx: impl IntoSampleIndex) -> Result<Sample<'_>> {
        let idx = idx.into_sample_index()?;
        if idx >= self.len() {
            return Err(Error::InvalidIndex(format!(
                "{idx} is out of range for {} samples", self.len()
            )));
        }
        Ok(Sample {
            data: &self.data.features()[idx],
            target: &self.data.labels()[idx..idx + 1],
        })
    }

    pub fn get(&self, idx: impl IntoSampleIndex) -> Result<T::Output> {
        self.sample(idx).map(|s| self.transform.apply(s))
    }
}

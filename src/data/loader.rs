use rand::{seq::SliceRandom, Rng};

use crate::{
    data::adapter::{TabularDataset, TensorSample, Transform},
    error::Result,
    math::matrix::Matrix,
};

/// A group of examples stacked for one forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// One example per row.
    pub data: Matrix,
    pub target: Vec<usize>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}

/// Groups a `TabularDataset` into fixed-size batches.
///
/// When the dataset size is not a multiple of `batch_size` the trailing
/// partial batch is kept unless `drop_last` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataLoader {
    pub batch_size: usize,
    pub shuffle: bool,
    pub drop_last: bool,
}

impl DataLoader {
    /// # Panics
    /// Panics if `batch_size == 0`.
    pub fn new(batch_size: usize) -> DataLoader {
        assert!(batch_size > 0, "batch_size must be at least 1");
        DataLoader { batch_size, shuffle: false, drop_last: false }
    }

    pub fn shuffle(mut self, shuffle: bool) -> DataLoader {
        self.shuffle = shuffle;
        self
    }

    pub fn drop_last(mut self, drop_last: bool) -> DataLoader {
        self.drop_last = drop_last;
        self
    }

    pub fn num_batches(&self, len: usize) -> usize {
        if self.drop_last {
            len / self.batch_size
        } else {
            len.div_ceil(self.batch_size)
        }
    }

    /// Sample positions for each batch of one epoch. The order is a fresh
    /// permutation from `rng` when shuffling, sequential otherwise.
    pub fn batch_indices<R: Rng + ?Sized>(&self, len: usize, rng: &mut R) -> Vec<Vec<usize>> {
        let mut order: Vec<usize> = (0..len).collect();
        if self.shuffle {
            order.shuffle(rng);
        }
        order.chunks(self.batch_size)
            .filter(|chunk| !self.drop_last || chunk.len() == self.batch_size)
            .map(<[usize]>::to_vec)
            .collect()
    }

    /// Materializes one epoch of batches.
    pub fn batches<T, R>(&self, dataset: &TabularDataset<T>, rng: &mut R) -> Result<Vec<Batch>>
    where
        T: Transform<Output = TensorSample>,
        R: Rng + ?Sized,
    {
        self.batch_indices(dataset.len(), rng)
            .into_iter()
            .map(|indices| {
                let samples = indices.into_iter()
                    .map(|i| dataset.get(i))
                    .collect::<Result<Vec<TensorSample>>>()?;
                Ok(collate(samples))
            })
            .collect()
    }
}

/// Stacks sample rows into one matrix and concatenates their targets.
fn collate(samples: Vec<TensorSample>) -> Batch {
    let mut rows = Vec::with_capacity(samples.len());
    let mut target = Vec::with_capacity(samples.len());
    for s in samples {
        rows.extend(s.data.data);
        target.extend(s.target);
    }
    Batch { data: Matrix::from_data(rows), target }
}

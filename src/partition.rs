//! Seeded train/val partitioning.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::types::Split;

/// Items split into disjoint training and validation subsets, each kept in
/// shuffled order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T> {
    pub train: Vec<T>,
    pub val: Vec<T>,
}

impl<T> Partition<T> {
    pub fn len(&self) -> usize {
        self.train.len() + self.val.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.val.is_empty()
    }

    /// Every item paired with its split, validation items first.
    pub fn assignments(&self) -> impl Iterator<Item = (&T, Split)> {
        self.val
            .iter()
            .map(|item| (item, Split::Val))
            .chain(self.train.iter().map(|item| (item, Split::Train)))
    }
}

/// Number of validation items: `max(1, floor(val_fraction * len))`, never more
/// than `len`.
///
/// Fractions outside `(0, 1)` are not rejected. Negative or NaN products
/// saturate to zero before the floor of one applies.
pub fn val_count(len: usize, val_fraction: f64) -> usize {
    let n = (val_fraction * len as f64).floor() as usize;
    n.max(1).min(len)
}

/// Shuffle `items` with a generator seeded by `seed` and take the first
/// [`val_count`] of them as the validation subset.
///
/// The input order matters: the same sequence, seed and fraction always give
/// the same partition. An empty `items` slice is [`Error::EmptyDataset`].
pub fn assign<T: Clone>(items: &[T], seed: u64, val_fraction: f64) -> Result<Partition<T>> {
    if items.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let mut shuffled = items.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let train = shuffled.split_off(val_count(shuffled.len(), val_fraction));

    Ok(Partition {
        train,
        val: shuffled,
    })
}

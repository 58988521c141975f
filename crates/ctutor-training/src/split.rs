//! Seeded train/validation partitioning.
//!
//! Examples arrive in generation order, so they are shuffled before the split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Result of partitioning a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split<T> {
    pub train: Vec<T>,
    pub validation: Vec<T>,
}

/// Shuffle `samples` with a fixed `seed`, then hold out `ceil(n * validation_fraction)`
/// items for validation. The same seed always yields the same partition.
pub fn split_train_val<T>(mut samples: Vec<T>, validation_fraction: f64, seed: u64) -> Split<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total = samples.len();
    let fraction = validation_fraction.clamp(0.0, 1.0);
    let validation_len = ((total as f64) * fraction).ceil() as usize;
    let train_len = total - validation_len.min(total);

    let validation = samples.split_off(train_len);

    tracing::debug!(
        train = samples.len(),
        validation = validation.len(),
        seed,
        "dataset split"
    );

    Split { train: samples, validation }
}

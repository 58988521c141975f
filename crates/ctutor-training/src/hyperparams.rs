use crate::error::{TrainingError, TrainingResult};
use serde::{Deserialize, Serialize};

/// Controller-level hyperparameters. Optimizer settings belong to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingHyperParams {
    pub seed: u64,
    pub epochs: usize,
    pub batch_size: usize,
    /// Fraction of examples held out for validation (rounded up).
    pub validation_fraction: f64,
    /// Reshuffle the training partition at the start of every epoch.
    pub shuffle_each_epoch: bool,
}

impl Default for TrainingHyperParams {
    fn default() -> Self {
        Self { seed: 42, epochs: 10, batch_size: 4, validation_fraction: 0.2, shuffle_each_epoch: true }
    }
}

impl TrainingHyperParams {
    pub fn validate(&self) -> TrainingResult<()> {
        if self.epochs == 0 {
            return Err(TrainingError::InvalidSpec("epochs must be >= 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(TrainingError::InvalidSpec("batch_size must be >= 1".to_string()));
        }
        if !self.validation_fraction.is_finite()
            || self.validation_fraction <= 0.0
            || self.validation_fraction >= 1.0
        {
            return Err(TrainingError::InvalidSpec(
                "validation_fraction must be strictly between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(TrainingHyperParams::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_epochs = TrainingHyperParams { epochs: 0, ..Default::default() };
        assert!(zero_epochs.validate().is_err());

        let zero_batch = TrainingHyperParams { batch_size: 0, ..Default::default() };
        assert!(zero_batch.validate().is_err());

        let no_validation = TrainingHyperParams { validation_fraction: 0.0, ..Default::default() };
        assert!(no_validation.validate().is_err());

        let all_validation = TrainingHyperParams { validation_fraction: 1.0, ..Default::default() };
        assert!(all_validation.validate().is_err());
    }
}

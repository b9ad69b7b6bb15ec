use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::loss::loss_type::LossType;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`     — total number of full passes over the training data
/// - `batch_size` — samples per update; `1` is online SGD (update after
///                  every example), larger values average the gradients
///                  of each mini-batch before a single update
/// - `loss_type`  — which cost function to minimise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub loss_type: LossType,
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize, loss_type: LossType) -> Self {
        TrainConfig { epochs, batch_size, loss_type }
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NetError::Configuration("epochs must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(NetError::Configuration("batch_size must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for TrainConfig {
    /// A single online pass with the quadratic cost.
    fn default() -> Self {
        TrainConfig::new(1, 1, LossType::Quadratic)
    }
}

use serde::{Deserialize, Serialize};

use crate::loss::{bce::BceLoss, mse::MseLoss};

/// Selects which cost function the trainer minimises.
///
/// - `Quadratic`          — ½ squared error, reported as MSE; the default.
/// - `BinaryCrossEntropy` — pair with a sigmoid output and targets in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    #[default]
    Quadratic,
    BinaryCrossEntropy,
}

impl LossType {
    /// Scalar loss for one sample.
    pub fn loss(self, predicted: &[f64], expected: &[f64]) -> f64 {
        match self {
            LossType::Quadratic          => MseLoss::loss(predicted, expected),
            LossType::BinaryCrossEntropy => BceLoss::loss(predicted, expected),
        }
    }

    /// Gradient of the loss with respect to each output activation.
    pub fn derivative(self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        match self {
            LossType::Quadratic          => MseLoss::derivative(predicted, expected),
            LossType::BinaryCrossEntropy => BceLoss::derivative(predicted, expected),
        }
    }
}

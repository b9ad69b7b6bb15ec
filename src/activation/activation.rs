use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// An element-wise nonlinearity and its derivative.
///
/// Both methods take the pre-activation value `z`. Layers and the trainer
/// only ever talk to this trait, so any implementation can be dropped in.
pub trait Activation: Debug + Send + Sync {
    fn apply(&self, z: f64) -> f64;

    /// d/dz of [`Activation::apply`], evaluated at `z`.
    fn derivative(&self, z: f64) -> f64;

    /// Closed bounds of the output range, when the function has them.
    fn output_range(&self) -> Option<(f64, f64)> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    /// Logistic sigmoid, output in (0, 1).
    #[default]
    Sigmoid,
    Tanh,
    #[serde(rename = "relu")]
    ReLU,
    #[serde(rename = "leaky_relu")]
    LeakyReLU { alpha: f64 },
    Identity,
}

/// Smallest and largest values the sigmoid reports. `SIGMOID_MAX` is the
/// last `f64` below 1.
const SIGMOID_MIN: f64 = f64::MIN_POSITIVE;
const SIGMOID_MAX: f64 = 1.0 - f64::EPSILON / 2.0;

/// Logistic function written so that neither branch overflows `exp`.
///
/// Clamped so that saturated inputs still land strictly inside (0, 1).
fn sigmoid(z: f64) -> f64 {
    let s = if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    };
    s.clamp(SIGMOID_MIN, SIGMOID_MAX)
}

impl Activation for ActivationFunction {
    fn apply(&self, z: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid(z),
            ActivationFunction::Tanh => z.tanh(),
            ActivationFunction::ReLU => if z > 0.0 { z } else { 0.0 },
            ActivationFunction::LeakyReLU { alpha } => if z > 0.0 { z } else { alpha * z },
            ActivationFunction::Identity => z,
        }
    }

    fn derivative(&self, z: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let s = sigmoid(z);
                s * (1.0 - s)
            }
            ActivationFunction::Tanh => {
                let t = z.tanh();
                1.0 - t * t
            }
            ActivationFunction::ReLU => if z > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::LeakyReLU { alpha } => if z > 0.0 { 1.0 } else { *alpha },
            ActivationFunction::Identity => 1.0,
        }
    }

    fn output_range(&self) -> Option<(f64, f64)> {
        match self {
            ActivationFunction::Sigmoid => Some((0.0, 1.0)),
            ActivationFunction::Tanh => Some((-1.0, 1.0)),
            _ => None,
        }
    }
}

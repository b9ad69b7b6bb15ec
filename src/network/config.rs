use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::layers::dense::WeightInit;
use crate::loss::loss_type::LossType;
use crate::train::train_config::TrainConfig;

/// Everything about a session except the topology and learning rate, which
/// arrive with each `init` call.
///
/// `NetworkConfig` can be saved to / loaded from JSON so that a run can be
/// reproduced exactly: with a fixed `seed`, the same topology always starts
/// from the same weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Activation applied after every layer.
    pub activation: ActivationFunction,
    /// Cost function minimised during training.
    pub loss: LossType,
    /// Weight initialisation scheme.
    pub init: WeightInit,
    /// Seed for weight initialisation; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Passes over the training file per `train` call.
    pub epochs: usize,
    /// `1` for online updates.
    pub batch_size: usize,
    /// Fraction of the file (taken from the end) held out for evaluation.
    pub test_fraction: f64,
    /// Whether training files start with a header line to skip.
    pub has_header: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            activation: ActivationFunction::Sigmoid,
            loss: LossType::Quadratic,
            init: WeightInit::ScaledUniform,
            seed: Some(0),
            epochs: 1,
            batch_size: 1,
            test_fraction: 0.0,
            has_header: false,
        }
    }
}

impl NetworkConfig {
    pub fn train_config(&self) -> TrainConfig {
        TrainConfig::new(self.epochs, self.batch_size, self.loss)
    }

    pub fn validate(&self) -> Result<()> {
        self.train_config().validate()?;
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(NetError::Configuration(format!(
                "test_fraction must be in [0, 1), got {}",
                self.test_fraction
            )));
        }
        self.init.validate()
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a `NetworkConfig` from a JSON file. Missing fields take
    /// their defaults.
    pub fn load_json<P: AsRef<Path>>(path: P) -> std::io::Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

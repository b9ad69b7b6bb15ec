use std::path::Path;
use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use crate::activation::Activation;
use crate::data::{dataset::Dataset, loader::DataLoader};
use crate::error::{NetError, Result};
use crate::network::{config::NetworkConfig, network::Network, topology::Topology};
use crate::optim::sgd::Sgd;
use crate::train::{epoch_stats::EpochStats, loop_fn::train_loop};

/// Owns at most one network and drives it through init → train → predict.
///
/// `init` and `train` take `&mut self`, `predict` takes `&self`; callers
/// that share an engine across threads wrap the whole engine in one lock.
#[derive(Debug)]
pub struct Engine {
    config: NetworkConfig,
    activation: Arc<dyn Activation>,
    network: Option<Network>,
    last_stats: Vec<EpochStats>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// An engine with the default configuration: sigmoid, quadratic cost,
    /// seed 0, one online pass per `train`.
    pub fn new() -> Engine {
        let config = NetworkConfig::default();
        Engine {
            activation: Arc::new(config.activation),
            config,
            network: None,
            last_stats: Vec::new(),
        }
    }

    pub fn with_config(config: NetworkConfig) -> Result<Engine> {
        config.validate()?;
        Ok(Engine {
            activation: Arc::new(config.activation),
            config,
            network: None,
            last_stats: Vec::new(),
        })
    }

    /// Replaces the configured activation with a custom one for every
    /// network built afterwards.
    ///
    /// `config().activation` keeps its old value, so a config saved from
    /// this engine rebuilds networks with the built-in activation instead.
    pub fn with_activation(mut self, activation: Arc<dyn Activation>) -> Engine {
        self.activation = activation;
        self
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn network(&self) -> Option<&Network> {
        self.network.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.network.is_some()
    }

    /// Statistics from the most recent successful `train` call.
    pub fn last_stats(&self) -> &[EpochStats] {
        &self.last_stats
    }

    /// Builds a fresh network, discarding any previous one. On error the
    /// previous network is kept as it was.
    pub fn init(&mut self, topology: Topology, learning_rate: f64) -> Result<()> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let network = Network::new(
            topology,
            learning_rate,
            Arc::clone(&self.activation),
            self.config.init,
            &mut rng,
        )?;

        tracing::info!(
            topology = %network.topology(),
            learning_rate,
            layers = network.layers().len(),
            "network initialized"
        );
        self.network = Some(network);
        self.last_stats.clear();
        Ok(())
    }

    /// Loads the whole training file, then trains on it.
    ///
    /// Loading errors (missing file, bad line, empty file) are reported
    /// before any weight changes.
    pub fn train<P: AsRef<Path>>(&mut self, data_path: P) -> Result<&[EpochStats]> {
        let network = self.network.as_ref().ok_or(NetError::Uninitialized)?;
        let loader = DataLoader::new(network.input_size(), network.output_size())
            .with_header(self.config.has_header);
        let dataset = loader.load(data_path.as_ref())?;
        tracing::info!(
            path = %data_path.as_ref().display(),
            examples = dataset.len(),
            "training data loaded"
        );
        self.train_dataset(dataset)
    }

    /// Trains on examples already in memory.
    pub fn train_dataset(&mut self, dataset: Dataset) -> Result<&[EpochStats]> {
        let network = self.network.as_mut().ok_or(NetError::Uninitialized)?;
        if dataset.is_empty() {
            return Err(NetError::EmptyDataset);
        }

        let (train, test) = dataset.split_tail(self.config.test_fraction);
        let test = (!test.is_empty()).then_some(&test);
        let optimizer = Sgd::new(network.learning_rate());

        let stats = train_loop(network, &train, test, &optimizer, &self.config.train_config())?;
        if let Some(last) = stats.last() {
            tracing::info!(
                epochs = stats.len(),
                train_loss = last.train_loss,
                "training finished"
            );
        }
        self.last_stats = stats;
        Ok(&self.last_stats)
    }

    /// Raw forward-pass output for `input`; weights are not touched.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.network.as_ref().ok_or(NetError::Uninitialized)?.predict(input)
    }

    /// Scalar form of [`Engine::predict`] for one-input, one-output networks.
    pub fn predict_scalar(&self, input: f64) -> Result<f64> {
        let network = self.network.as_ref().ok_or(NetError::Uninitialized)?;
        if network.output_size() != 1 {
            return Err(NetError::shape("output", 1, network.output_size()));
        }
        Ok(network.predict(&[input])?[0])
    }

    /// Drops the network, if any.
    pub fn reset(&mut self) {
        self.network = None;
        self.last_stats.clear();
    }
}

pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod engine;
pub mod error;
pub mod api;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::{Activation, ActivationFunction};
pub use layers::dense::{Layer, WeightInit};
pub use network::{Network, NetworkConfig, Topology};
pub use loss::loss_type::LossType;
pub use optim::sgd::Sgd;
pub use train::{train_loop, train_network, EpochStats, TrainConfig};
pub use data::{DataLoader, Dataset, TrainingExample};
pub use engine::Engine;
pub use error::{ErrorKind, NetError, Result};

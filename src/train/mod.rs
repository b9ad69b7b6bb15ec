pub mod epoch_stats;
pub mod loop_fn;
pub mod train_config;
pub mod trainer;

pub use epoch_stats::EpochStats;
pub use loop_fn::{evaluate, train_loop};
pub use train_config::TrainConfig;
pub use trainer::train_network;

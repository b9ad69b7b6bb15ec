pub mod dataset;
pub mod loader;

pub use dataset::{Dataset, TrainingExample};
pub use loader::DataLoader;

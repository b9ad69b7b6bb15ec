//! Error type shared by every layer of the engine.
//!
//! Each variant belongs to one of four caller-visible categories
//! ([`ErrorKind`]); the `api` module turns those categories into integer
//! status codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetError>;

#[derive(Debug, Error)]
pub enum NetError {
    /// Bad topology, learning rate, or trainer/engine setting.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The training file could not be opened or read.
    #[error("cannot read training data '{}': {source}", path.display())]
    DataIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of the training file is malformed. `line` is 1-based.
    #[error("malformed training data at line {line}: {reason}")]
    DataFormat { line: usize, reason: String },

    #[error("training data contains no examples")]
    EmptyDataset,

    /// A vector's length disagrees with the network topology.
    #[error("{what} has length {actual}, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("no network has been initialized")]
    Uninitialized,
}

/// Caller-visible error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    DataFormat,
    ShapeMismatch,
    UninitializedState,
}

impl ErrorKind {
    /// Integer status reported across the binding boundary. `0` is reserved
    /// for success.
    pub fn status_code(self) -> i32 {
        match self {
            ErrorKind::Configuration      => 1,
            ErrorKind::DataFormat         => 2,
            ErrorKind::ShapeMismatch      => 3,
            ErrorKind::UninitializedState => 4,
        }
    }
}

impl NetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetError::Configuration(_) => ErrorKind::Configuration,
            NetError::DataIo { .. }
            | NetError::DataFormat { .. }
            | NetError::EmptyDataset => ErrorKind::DataFormat,
            NetError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            NetError::Uninitialized => ErrorKind::UninitializedState,
        }
    }

    pub fn status_code(&self) -> i32 {
        self.kind().status_code()
    }

    pub(crate) fn shape(what: &'static str, expected: usize, actual: usize) -> NetError {
        NetError::ShapeMismatch { what, expected, actual }
    }
}

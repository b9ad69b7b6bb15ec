//! Status-code surface for a binding layer.
//!
//! One process-wide [`Engine`] sits behind a single mutex; each call holds
//! the lock from start to finish. Every function returns `0` on success or
//! the [`ErrorKind`](crate::error::ErrorKind) status code on failure, and
//! remembers the failure's message for [`last_error`].

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::engine::Engine;
use crate::error::{NetError, Result};
use crate::network::{config::NetworkConfig, topology::Topology};

pub const SUCCESS: i32 = 0;

#[derive(Default)]
struct Session {
    engine: Engine,
    last_error: Option<String>,
}

static SESSION: OnceLock<Mutex<Session>> = OnceLock::new();

fn session() -> MutexGuard<'static, Session> {
    // Every call leaves the engine consistent, so a panic elsewhere while
    // the lock was held does not invalidate it.
    SESSION
        .get_or_init(|| Mutex::new(Session::default()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn report<T>(session: &mut Session, op: &str, result: Result<T>) -> std::result::Result<T, i32> {
    match result {
        Ok(value) => {
            session.last_error = None;
            Ok(value)
        }
        Err(err) => {
            tracing::warn!(op, code = err.status_code(), error = %err, "call failed");
            let code = err.status_code();
            session.last_error = Some(err.to_string());
            Err(code)
        }
    }
}

fn status(result: std::result::Result<(), i32>) -> i32 {
    result.err().unwrap_or(SUCCESS)
}

/// Replaces the session's configuration. Drops the current network.
pub fn configure(config: NetworkConfig) -> i32 {
    let mut s = session();
    let result = Engine::with_config(config).map(|engine| s.engine = engine);
    status(report(&mut s, "configure", result))
}

/// Builds a network for `topology` (neuron counts, input first).
pub fn init(topology: &[i64], learning_rate: f64) -> i32 {
    let mut s = session();
    let result = Topology::from_signed(topology)
        .and_then(|topology| s.engine.init(topology, learning_rate));
    status(report(&mut s, "init", result))
}

/// Trains the current network on the file at `data_path`.
pub fn train(data_path: &str) -> i32 {
    let mut s = session();
    let result = s.engine.train(data_path).map(|_| ());
    status(report(&mut s, "train", result))
}

/// Writes the network's output for `input` into `output`, whose length must
/// equal the output width.
pub fn predict(input: &[f64], output: &mut [f64]) -> i32 {
    let mut s = session();
    let result = s.engine.predict(input).and_then(|values| {
        if values.len() != output.len() {
            return Err(NetError::shape("output buffer", values.len(), output.len()));
        }
        output.copy_from_slice(&values);
        Ok(())
    });
    status(report(&mut s, "predict", result))
}

/// Scalar prediction. On failure the value is `NaN`.
pub fn predict_scalar(input: f64) -> (i32, f64) {
    let mut s = session();
    let result = s.engine.predict_scalar(input);
    match report(&mut s, "predict", result) {
        Ok(value) => (SUCCESS, value),
        Err(code) => (code, f64::NAN),
    }
}

/// Message of the most recent failed call, cleared by the next success.
pub fn last_error() -> Option<String> {
    session().last_error.clone()
}

/// Tears down the network, keeping the configuration.
pub fn reset() {
    let mut s = session();
    s.engine.reset();
    s.last_error = None;
}

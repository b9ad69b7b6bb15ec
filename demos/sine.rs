//! Learns a rescaled sine wave and predicts it at π.
//!
//! Targets are stored as `0.5·(sin x + 1)` so they fit the sigmoid's (0, 1)
//! range; predictions are mapped back with `2y − 1`.

use std::f64::consts::PI;

use cml_nn::{api, Dataset, NetworkConfig, TrainingExample};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SAMPLES: usize = 150;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cml_nn=info")),
        )
        .init();

    let mut rng = StdRng::seed_from_u64(2024);
    let data: Dataset = (0..SAMPLES)
        .map(|_| {
            let x = rng.gen_range(0.0..2.0 * PI);
            TrainingExample::new(vec![x], vec![0.5 * (x.sin() + 1.0)])
        })
        .collect();

    let path = std::env::temp_dir().join("cml_nn_sine.csv");
    if let Err(e) = data.write_delimited(&path, ';') {
        eprintln!("could not write {}: {e}", path.display());
        std::process::exit(1);
    }

    let epochs = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(200);
    let config = NetworkConfig { epochs, test_fraction: 0.1, ..NetworkConfig::default() };

    check("configure", api::configure(config));
    check("init", api::init(&[1, 5, 5, 1], 0.1));
    check("train", api::train(&path.to_string_lossy()));

    println!("\nRESULTS ({epochs} epochs):");
    for x in [PI / 2.0, PI, 3.0 * PI / 2.0, 1.0, 5.0] {
        let (code, y) = api::predict_scalar(x);
        check("predict", code);
        println!("sin({x:.4}) = {:+.4}\tGOT: {:+.4}", x.sin(), 2.0 * y - 1.0);
    }

    let _ = std::fs::remove_file(&path);
}

fn check(step: &str, code: i32) {
    if code != api::SUCCESS {
        eprintln!("{step} failed ({code}): {}", api::last_error().unwrap_or_default());
        std::process::exit(1);
    }
}

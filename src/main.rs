// This binary crate is intentionally minimal.
// All network logic lives in the library (src/lib.rs and its modules); a
// binding layer drives it through `cml_nn::api`.
// Run the sine demo with:
//   cargo run --example sine
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cml_nn=info")),
        )
        .init();

    let config = cml_nn::NetworkConfig::default();
    tracing::info!(
        activation = ?config.activation,
        loss = ?config.loss,
        epochs = config.epochs,
        "cml-nn: fully-connected network engine with init / train / predict"
    );
    println!("Run `cargo run --example sine` to see the sine demo.");
}

use std::time::Instant;

use crate::data::dataset::Dataset;
use crate::error::{NetError, Result};
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::{backward, check_example, train_network};

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` passes over `train`, in file order,
/// and returns the statistics of every completed epoch.
///
/// # Arguments
/// - `network`   — modified in place
/// - `train`     — examples used for updates
/// - `test`      — optional held-out examples, evaluated after each epoch
/// - `optimizer` — SGD optimizer (carries learning rate)
/// - `config`    — epochs, batch size, loss
///
/// # Errors
/// `Configuration` for an invalid `config`, `EmptyDataset` when `train` is
/// empty (nothing is touched in either case), `ShapeMismatch` when an
/// example does not fit the network. A shape error stops training at that
/// example; earlier updates are kept.
pub fn train_loop(
    network: &mut Network,
    train: &Dataset,
    test: Option<&Dataset>,
    optimizer: &Sgd,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    config.validate()?;
    if train.is_empty() {
        return Err(NetError::EmptyDataset);
    }

    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let train_loss = run_one_epoch(network, train, optimizer, config.batch_size, config.loss_type)?;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        // ── Held-out evaluation ───────────────────────────────────────────
        let test_loss = match test {
            Some(ds) if !ds.is_empty() => Some(evaluate(network, ds, config.loss_type)?),
            _ => None,
        };

        match test_loss {
            Some(test_loss) => tracing::info!(
                epoch,
                total = config.epochs,
                train_loss,
                test_loss,
                test_total = test_loss * test.map_or(0, Dataset::len) as f64,
                "epoch finished"
            ),
            None => tracing::info!(epoch, total = config.epochs, train_loss, "epoch finished"),
        }

        history.push(EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            test_loss,
            elapsed_ms,
        });
    }

    Ok(history)
}

/// Mean loss over `dataset` using read-only forward passes.
pub fn evaluate(network: &Network, dataset: &Dataset, loss: LossType) -> Result<f64> {
    if dataset.is_empty() {
        return Err(NetError::EmptyDataset);
    }
    let mut total = 0.0;
    for example in dataset {
        check_example(network, example)?;
        let output = network.predict(&example.input)?;
        total += loss.loss(&output, &example.target);
    }
    Ok(total / dataset.len() as f64)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs one epoch. `batch_size == 1` is the online trainer; larger batches
/// accumulate gradients in file order and apply their mean once per batch.
/// Returns the mean loss over all samples.
fn run_one_epoch(
    network: &mut Network,
    dataset: &Dataset,
    optimizer: &Sgd,
    batch_size: usize,
    loss: LossType,
) -> Result<f64> {
    if batch_size == 1 {
        return train_network(network, dataset, optimizer, loss);
    }

    let mut total_loss = 0.0;

    for batch in dataset.examples().chunks(batch_size) {
        // Zero-initialize accumulated gradient storage.
        let mut acc_grads: Vec<(Matrix, Matrix)> = network.layers().iter()
            .map(|layer| (
                Matrix::zeros(layer.weights.rows, layer.weights.cols),
                Matrix::zeros(layer.biases.rows, layer.biases.cols),
            ))
            .collect();

        // A shape error here drops the partially accumulated batch.
        for example in batch {
            check_example(network, example)?;
            let output = network.forward(&example.input)?;
            total_loss += loss.loss(&output, &example.target);

            let grads = backward(network, loss.derivative(&output, &example.target));
            for ((w_acc, b_acc), (w_grad, b_grad)) in acc_grads.iter_mut().zip(grads.iter()) {
                w_acc.add_scaled(w_grad, 1.0);
                b_acc.add_scaled(b_grad, 1.0);
            }
        }

        // Average and apply.
        let inv_batch = 1.0 / batch.len() as f64;
        for (layer, (w_acc, b_acc)) in network.layers_mut().iter_mut().zip(acc_grads.iter()) {
            let w_avg = w_acc.map(|x| x * inv_batch);
            let b_avg = b_acc.map(|x| x * inv_batch);
            optimizer.step(layer, &w_avg, &b_avg);
        }
    }

    Ok(total_loss / dataset.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        activation::ActivationFunction, data::dataset::TrainingExample, error::ErrorKind,
        layers::dense::WeightInit, network::topology::Topology,
    };
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::Arc;

    fn network(sizes: Vec<usize>, seed: u64) -> Network {
        let mut rng = StdRng::seed_from_u64(seed);
        Network::new(
            Topology::new(sizes).unwrap(),
            0.5,
            Arc::new(ActivationFunction::Sigmoid),
            WeightInit::ScaledUniform,
            &mut rng,
        )
        .unwrap()
    }

    /// Targets produced by a known single sigmoid unit, so a `[2, 1]`
    /// network can represent them exactly.
    fn representable() -> Dataset {
        let sigmoid = |z: f64| 1.0 / (1.0 + (-z).exp());
        let mut ds = Dataset::default();
        for i in 0..5 {
            for j in 0..5 {
                let x = [-1.0 + 0.5 * i as f64, -1.0 + 0.5 * j as f64];
                let y = sigmoid(1.5 * x[0] - 2.0 * x[1] + 0.5);
                ds.push(TrainingExample::new(x.to_vec(), vec![y]));
            }
        }
        ds
    }

    #[test]
    fn converges_on_representable_data() {
        let data = representable();
        let mut net = network(vec![2, 1], 4);
        let config = TrainConfig::new(2000, 1, LossType::Quadratic);

        let history = train_loop(&mut net, &data, None, &Sgd::new(0.5), &config).unwrap();
        assert_eq!(history.len(), 2000);
        assert!(history[history.len() - 1].train_loss < history[0].train_loss);

        let mse = evaluate(&net, &data, LossType::Quadratic).unwrap();
        assert!(mse < 1e-4, "mse = {mse}");
    }

    #[test]
    fn mini_batches_also_converge() {
        let data = representable();
        let mut net = network(vec![2, 1], 4);
        let config = TrainConfig::new(3000, 5, LossType::Quadratic);
        train_loop(&mut net, &data, None, &Sgd::new(2.0), &config).unwrap();
        assert!(evaluate(&net, &data, LossType::Quadratic).unwrap() < 1e-3);
    }

    #[test]
    fn full_batch_equals_mean_of_online_gradients() {
        let data = representable();
        let mut batched = network(vec![2, 1], 8);
        let mut manual = batched.clone();

        run_one_epoch(&mut batched, &data, &Sgd::new(0.3), data.len(), LossType::Quadratic).unwrap();

        let mut w_sum = Matrix::zeros(2, 1);
        let mut b_sum = Matrix::zeros(1, 1);
        for ex in &data {
            let out = manual.forward(&ex.input).unwrap();
            let grads = backward(&manual, LossType::Quadratic.derivative(&out, &ex.target));
            w_sum.add_scaled(&grads[0].0, 1.0);
            b_sum.add_scaled(&grads[0].1, 1.0);
        }
        let n = data.len() as f64;
        manual.layers_mut()[0].apply_gradients(&w_sum, &b_sum, 0.3 / n);

        for (a, b) in batched.layers()[0].weights.data.iter().flatten()
            .zip(manual.layers()[0].weights.data.iter().flatten())
        {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn reports_held_out_loss_each_epoch() {
        let (train, test) = representable().split_tail(0.2);
        let mut net = network(vec![2, 1], 4);
        let history = train_loop(&mut net, &train, Some(&test), &Sgd::new(0.5), &TrainConfig::new(3, 1, LossType::Quadratic))
            .unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.iter().all(|s| s.test_loss.is_some()));
        assert_eq!(history[2].epoch, 3);
        assert_eq!(history[2].total_epochs, 3);
    }

    #[test]
    fn invalid_config_touches_nothing() {
        let data = representable();
        let mut net = network(vec![2, 1], 4);
        let before = net.layers()[0].weights.clone();
        let err = train_loop(&mut net, &data, None, &Sgd::new(0.5), &TrainConfig::new(0, 1, LossType::Quadratic))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(net.layers()[0].weights, before);
    }

    #[test]
    fn cross_entropy_training_lowers_its_loss() {
        let data = representable();
        let mut net = network(vec![2, 3, 1], 12);
        let loss = LossType::BinaryCrossEntropy;
        let before = evaluate(&net, &data, loss).unwrap();
        train_loop(&mut net, &data, None, &Sgd::new(0.2), &TrainConfig::new(200, 1, loss)).unwrap();
        assert!(evaluate(&net, &data, loss).unwrap() < before);
    }
}

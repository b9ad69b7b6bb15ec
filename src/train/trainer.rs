use crate::{
    data::dataset::{Dataset, TrainingExample},
    error::{NetError, Result},
    loss::loss_type::LossType,
    math::matrix::Matrix,
    network::network::Network,
    optim::sgd::Sgd,
};

/// One online pass over `dataset` in order: forward, backpropagate, and
/// update every layer immediately after each example.
///
/// Returns the mean loss over the pass.
///
/// An example whose vectors do not fit the topology aborts the pass with
/// `ShapeMismatch`; updates already made for earlier examples stay applied.
pub fn train_network(
    network: &mut Network,
    dataset: &Dataset,
    optimizer: &Sgd,
    loss: LossType,
) -> Result<f64> {
    if dataset.is_empty() {
        return Err(NetError::EmptyDataset);
    }

    let mut total_loss = 0.0;

    for example in dataset {
        check_example(network, example)?;

        let output = network.forward(&example.input)?;
        total_loss += loss.loss(&output, &example.target);

        let gradients = backward(network, loss.derivative(&output, &example.target));
        for (layer, (w_grad, b_grad)) in network.layers_mut().iter_mut().zip(gradients.iter()) {
            optimizer.step(layer, w_grad, b_grad);
        }
    }

    Ok(total_loss / dataset.len() as f64)
}

/// Confirms both vectors of `example` match the network's ends.
pub(crate) fn check_example(network: &Network, example: &TrainingExample) -> Result<()> {
    if example.input.len() != network.input_size() {
        return Err(NetError::shape("input", network.input_size(), example.input.len()));
    }
    if example.target.len() != network.output_size() {
        return Err(NetError::shape("target", network.output_size(), example.target.len()));
    }
    Ok(())
}

/// Backward pass over the caches left by the last `Network::forward`.
///
/// `output_grad` is ∂L/∂a of the output layer. Returns `(weights_grad,
/// biases_grad)` for every layer, input side first. Nothing is updated here,
/// so every error signal is propagated through the pre-update weights.
pub(crate) fn backward(network: &Network, output_grad: Vec<f64>) -> Vec<(Matrix, Matrix)> {
    let layers = network.layers();
    let mut gradients = Vec::with_capacity(layers.len());
    let mut upstream = Matrix::row(&output_grad);

    for (i, layer) in layers.iter().enumerate().rev() {
        let (w_grad, delta) = layer.compute_gradients(&upstream);
        if i > 0 {
            upstream = layer.back_propagate(&delta);
        }
        gradients.push((w_grad, delta));
    }

    gradients.reverse();
    gradients
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        activation::ActivationFunction, error::ErrorKind, layers::dense::WeightInit,
        network::topology::Topology,
    };
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::Arc;

    fn network(sizes: Vec<usize>, lr: f64) -> Network {
        let mut rng = StdRng::seed_from_u64(21);
        Network::new(
            Topology::new(sizes).unwrap(),
            lr,
            Arc::new(ActivationFunction::Sigmoid),
            WeightInit::ScaledUniform,
            &mut rng,
        )
        .unwrap()
    }

    fn example(input: &[f64], target: &[f64]) -> TrainingExample {
        TrainingExample::new(input.to_vec(), target.to_vec())
    }

    #[test]
    fn empty_dataset_leaves_weights_alone() {
        let mut net = network(vec![2, 2, 1], 0.5);
        let before = net.layers()[0].weights.clone();
        let err = train_network(&mut net, &Dataset::default(), &Sgd::new(0.5), LossType::Quadratic)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataFormat);
        assert_eq!(net.layers()[0].weights, before);
    }

    #[test]
    fn gradients_match_finite_differences() {
        let mut net = network(vec![2, 3, 2], 0.1);
        let ex = example(&[0.4, -0.7], &[0.2, 0.9]);
        let loss = LossType::Quadratic;
        // Quadratic gradient is (o - t), i.e. the derivative of ½‖o - t‖².
        let half_sse = |net: &Network| -> f64 {
            let out = net.predict(&ex.input).unwrap();
            0.5 * out.iter().zip(&ex.target).map(|(o, t)| (o - t).powi(2)).sum::<f64>()
        };

        let out = net.forward(&ex.input).unwrap();
        let grads = backward(&net, loss.derivative(&out, &ex.target));

        let h = 1e-6;
        for layer_idx in 0..2 {
            let (rows, cols) = (net.layers()[layer_idx].weights.rows, net.layers()[layer_idx].weights.cols);
            for r in 0..rows {
                for c in 0..cols {
                    let mut plus = net.clone();
                    plus.layers_mut()[layer_idx].weights.data[r][c] += h;
                    let mut minus = net.clone();
                    minus.layers_mut()[layer_idx].weights.data[r][c] -= h;
                    let numeric = (half_sse(&plus) - half_sse(&minus)) / (2.0 * h);
                    assert_abs_diff_eq!(grads[layer_idx].0.data[r][c], numeric, epsilon = 1e-6);
                }
            }
            for c in 0..cols {
                let mut plus = net.clone();
                plus.layers_mut()[layer_idx].biases.data[0][c] += h;
                let mut minus = net.clone();
                minus.layers_mut()[layer_idx].biases.data[0][c] -= h;
                let numeric = (half_sse(&plus) - half_sse(&minus)) / (2.0 * h);
                assert_abs_diff_eq!(grads[layer_idx].1.data[0][c], numeric, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn online_updates_apply_per_example() {
        // Two identical examples: the second must see the weights the first produced.
        let ds: Dataset = vec![example(&[1.0], &[1.0]), example(&[1.0], &[1.0])].into_iter().collect();
        let mut net = network(vec![1, 1], 1.0);
        let w0 = net.layers()[0].weights.data[0][0];

        let mut reference = net.clone();
        let mut w = w0;
        for ex in &ds {
            let out = reference.forward(&ex.input).unwrap();
            let grads = backward(&reference, LossType::Quadratic.derivative(&out, &ex.target));
            w -= grads[0].0.data[0][0];
            let (gw, gb) = (&grads[0].0, &grads[0].1);
            reference.layers_mut()[0].apply_gradients(gw, gb, 1.0);
        }

        train_network(&mut net, &ds, &Sgd::new(1.0), LossType::Quadratic).unwrap();
        assert_abs_diff_eq!(net.layers()[0].weights.data[0][0], w, epsilon = 1e-12);
        assert!(net.layers()[0].weights.data[0][0] > w0);
    }

    #[test]
    fn shape_error_mid_pass_keeps_earlier_updates() {
        let ds: Dataset = vec![
            example(&[0.5, 0.5], &[1.0]),
            example(&[0.5], &[1.0]),
            example(&[0.1, 0.2], &[0.0]),
        ]
        .into_iter()
        .collect();
        let mut net = network(vec![2, 1], 0.5);
        let before = net.layers()[0].weights.clone();

        let err = train_network(&mut net, &ds, &Sgd::new(0.5), LossType::Quadratic).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert_ne!(net.layers()[0].weights, before);

        // Only the first example was applied.
        let mut expected = network(vec![2, 1], 0.5);
        let first: Dataset = vec![example(&[0.5, 0.5], &[1.0])].into_iter().collect();
        train_network(&mut expected, &first, &Sgd::new(0.5), LossType::Quadratic).unwrap();
        assert_eq!(net.layers()[0].weights, expected.layers()[0].weights);
    }

    #[test]
    fn wrong_target_width_is_rejected_before_update() {
        let ds: Dataset = vec![example(&[0.5, 0.5], &[1.0, 0.0])].into_iter().collect();
        let mut net = network(vec![2, 1], 0.5);
        let before = net.layers()[0].weights.clone();
        let err = train_network(&mut net, &ds, &Sgd::new(0.5), LossType::Quadratic).unwrap_err();
        assert!(matches!(err, NetError::ShapeMismatch { what: "target", expected: 1, actual: 2 }));
        assert_eq!(net.layers()[0].weights, before);
    }
}

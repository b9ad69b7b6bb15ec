use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    activation::Activation,
    error::{NetError, Result},
    math::matrix::Matrix,
};

/// How a layer's weights are drawn at construction. Biases always start at 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    /// Uniform in `[-1/√n, 1/√n]`, n = the layer's input width.
    #[default]
    ScaledUniform,
    /// Uniform in `[-interval, interval]` regardless of width.
    Uniform { interval: f64 },
    /// Normal with std-dev `1/√n`.
    Xavier,
}

impl WeightInit {
    /// `Uniform` needs a finite, positive interval.
    pub fn validate(&self) -> Result<()> {
        if let WeightInit::Uniform { interval } = *self {
            if !(interval.is_finite() && interval > 0.0) {
                return Err(NetError::Configuration(format!(
                    "uniform init interval must be positive, got {interval}"
                )));
            }
        }
        Ok(())
    }
}

/// One fully-connected transition between two topology entries.
///
/// Row-vector convention: `z = x · W + b` where `x` is `1 × inputs`,
/// `W` is `inputs × outputs` and `b` is `1 × outputs`.
#[derive(Debug, Clone)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Matrix,
    input: Matrix,        // x from the last training forward pass
    pre_neurons: Matrix,  // z, the derivative is evaluated here
    neurons: Matrix,      // a = f(z)
    activator: Arc<dyn Activation>,
}

impl Layer {
    /// Panics if `init` fails [`WeightInit::validate`]; `Network::new`
    /// checks it first.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        size: usize,
        activation: Arc<dyn Activation>,
        init: WeightInit,
        rng: &mut R,
    ) -> Layer {
        let weights = match init {
            WeightInit::ScaledUniform => {
                Matrix::uniform(input_size, size, 1.0 / (input_size as f64).sqrt(), rng)
            }
            WeightInit::Uniform { interval } => Matrix::uniform(input_size, size, interval.abs(), rng),
            WeightInit::Xavier => Matrix::xavier(input_size, size, rng),
        };

        Layer {
            weights,
            biases: Matrix::zeros(1, size),
            input: Matrix::zeros(1, input_size),
            pre_neurons: Matrix::zeros(1, size),
            neurons: Matrix::zeros(1, size),
            activator: activation,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn size(&self) -> usize {
        self.weights.cols
    }

    pub fn activation(&self) -> &dyn Activation {
        self.activator.as_ref()
    }

    /// Activations cached by the last [`Layer::feed_from`].
    pub fn neurons(&self) -> &Matrix {
        &self.neurons
    }

    /// Training forward pass: caches input, z and a for backprop.
    pub fn feed_from(&mut self, input: &[f64]) -> Vec<f64> {
        let x = Matrix::row(input);
        let z = &(&x * &self.weights) + &self.biases;
        let a = z.map(|v| self.activator.apply(v));
        let out = a.first_row();
        self.input = x;
        self.pre_neurons = z;
        self.neurons = a;
        out
    }

    /// Forward pass that leaves every cache untouched.
    pub fn evaluate(&self, input: &[f64]) -> Vec<f64> {
        let z = &(&Matrix::row(input) * &self.weights) + &self.biases;
        z.map(|v| self.activator.apply(v)).first_row()
    }

    /// Computes this layer's error signal and parameter gradients from
    /// `upstream`, the loss gradient with respect to this layer's activations.
    ///
    /// Returns `(weights_grad, delta)`; `delta = upstream ⊙ f'(z)` doubles as
    /// the bias gradient.
    pub fn compute_gradients(&self, upstream: &Matrix) -> (Matrix, Matrix) {
        let act_derivative = self.pre_neurons.map(|z| self.activator.derivative(z));
        let delta = upstream.hadamard(&act_derivative);
        let weights_grad = &self.input.transpose() * &delta;
        (weights_grad, delta)
    }

    /// Loss gradient with respect to this layer's input, given its `delta`.
    /// Must be taken before the weights are updated.
    pub fn back_propagate(&self, delta: &Matrix) -> Matrix {
        delta * &self.weights.transpose()
    }

    /// Gradient-descent step: `W -= lr · gW`, `b -= lr · gb`.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, lr: f64) {
        self.weights.add_scaled(weights_grad, -lr);
        self.biases.add_scaled(biases_grad, -lr);
    }
}

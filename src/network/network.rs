use std::sync::Arc;

use rand::Rng;

use crate::{
    activation::Activation,
    error::{NetError, Result},
    layers::dense::{Layer, WeightInit},
    network::topology::Topology,
};

/// An ordered chain of dense layers plus the learning rate used to train it.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    topology: Topology,
    learning_rate: f64,
}

impl Network {
    /// Allocates one layer per adjacent pair in `topology`, drawing the
    /// initial weights from `rng`.
    pub fn new<R: Rng + ?Sized>(
        topology: Topology,
        learning_rate: f64,
        activation: Arc<dyn Activation>,
        init: WeightInit,
        rng: &mut R,
    ) -> Result<Network> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(NetError::Configuration(format!(
                "learning rate must be a positive number, got {learning_rate}"
            )));
        }
        init.validate()?;

        let layers = topology.layer_shapes()
            .map(|(inputs, outputs)| Layer::new(inputs, outputs, Arc::clone(&activation), init, &mut *rng))
            .collect();

        Ok(Network { layers, topology, learning_rate })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn input_size(&self) -> usize {
        self.topology.input_size()
    }

    pub fn output_size(&self) -> usize {
        self.topology.output_size()
    }

    /// Forward pass; stores inputs, pre-activations and activations in each
    /// layer for backprop.
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input(input)?;
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.feed_from(&current);
        }
        Ok(current)
    }

    /// Read-only forward pass. Neither weights nor caches change.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input(input)?;
        Ok(self.layers.iter().fold(input.to_vec(), |current, layer| layer.evaluate(&current)))
    }

    fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.input_size() {
            return Err(NetError::shape("input", self.input_size(), input.len()));
        }
        Ok(())
    }
}

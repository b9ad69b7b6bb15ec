use std::fmt;

use crate::error::{NetError, Result};

/// Neuron count per layer, input first. Always at least two entries, all
/// positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology(Vec<usize>);

impl Topology {
    pub fn new(sizes: Vec<usize>) -> Result<Topology> {
        if sizes.len() < 2 {
            return Err(NetError::Configuration(format!(
                "topology needs at least 2 layers, got {}",
                sizes.len()
            )));
        }
        if let Some(pos) = sizes.iter().position(|&n| n == 0) {
            return Err(NetError::Configuration(format!(
                "layer {pos} has 0 neurons; every layer must have at least one"
            )));
        }
        Ok(Topology(sizes))
    }

    /// Builds a topology from signed counts as handed over by a binding
    /// layer, rejecting anything non-positive.
    pub fn from_signed(sizes: &[i64]) -> Result<Topology> {
        let converted = sizes.iter().enumerate()
            .map(|(i, &n)| {
                usize::try_from(n).ok().filter(|&n| n > 0).ok_or_else(|| {
                    NetError::Configuration(format!("layer {i} has invalid neuron count {n}"))
                })
            })
            .collect::<Result<Vec<usize>>>()?;
        Topology::new(converted)
    }

    pub fn input_size(&self) -> usize {
        self.0[0]
    }

    pub fn output_size(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// `(inputs, outputs)` of each transition, in order.
    pub fn layer_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| n.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

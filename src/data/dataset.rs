use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{NetError, Result};

/// One (input, target) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl TrainingExample {
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> TrainingExample {
        TrainingExample { input, target }
    }
}

/// Training examples in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    examples: Vec<TrainingExample>,
}

impl Dataset {
    pub fn new(examples: Vec<TrainingExample>) -> Dataset {
        Dataset { examples }
    }

    /// Zips parallel input and target lists.
    pub fn from_pairs(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<Dataset> {
        if inputs.len() != targets.len() {
            return Err(NetError::shape("target list", inputs.len(), targets.len()));
        }
        Ok(Dataset {
            examples: inputs.into_iter().zip(targets)
                .map(|(input, target)| TrainingExample { input, target })
                .collect(),
        })
    }

    pub fn push(&mut self, example: TrainingExample) {
        self.examples.push(example);
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrainingExample> {
        self.examples.iter()
    }

    /// Splits off the last `test_fraction` of the examples as a held-out
    /// set, keeping file order in both halves. At least one example always
    /// stays in the training half.
    pub fn split_tail(mut self, test_fraction: f64) -> (Dataset, Dataset) {
        let n = self.examples.len();
        let wanted = (n as f64 * test_fraction.clamp(0.0, 1.0)).floor() as usize;
        let n_test = wanted.min(n.saturating_sub(1));
        let test = self.examples.split_off(n - n_test);
        (self, Dataset { examples: test })
    }

    /// Writes one example per line, inputs then targets, separated by
    /// `delimiter`. This is the format `DataLoader` reads.
    pub fn write_delimited<P: AsRef<Path>>(&self, path: P, delimiter: char) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for example in &self.examples {
            let line: Vec<String> = example.input.iter()
                .chain(example.target.iter())
                .map(|v| v.to_string())
                .collect();
            writeln!(writer, "{}", line.join(&delimiter.to_string()))?;
        }
        writer.flush()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a TrainingExample;
    type IntoIter = std::slice::Iter<'a, TrainingExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}

impl FromIterator<TrainingExample> for Dataset {
    fn from_iter<I: IntoIterator<Item = TrainingExample>>(iter: I) -> Self {
        Dataset { examples: iter.into_iter().collect() }
    }
}

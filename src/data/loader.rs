//! Training-file parsing.
//!
//! Format: one example per line, input values first, then target values.
//! Fields are separated by commas, semicolons, or whitespace. Blank lines
//! are skipped. There is no header row unless the loader is told otherwise.
//!
//! The whole file is parsed before anything is returned, so a bad line
//! anywhere means no training happens at all.

use std::path::Path;

use crate::data::dataset::{Dataset, TrainingExample};
use crate::error::{NetError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLoader {
    input_width: usize,
    target_width: usize,
    has_header: bool,
}

impl DataLoader {
    pub fn new(input_width: usize, target_width: usize) -> DataLoader {
        DataLoader { input_width, target_width, has_header: false }
    }

    /// Skip the first line of the file.
    pub fn with_header(mut self, has_header: bool) -> DataLoader {
        self.has_header = has_header;
        self
    }

    pub fn row_width(&self) -> usize {
        self.input_width + self.target_width
    }

    /// Reads and parses `path` into a dataset.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| NetError::DataIo {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = self.parse(&text)?;
        tracing::debug!(
            path = %path.display(),
            examples = dataset.len(),
            "loaded training data"
        );
        Ok(dataset)
    }

    /// Parses already-read file contents.
    pub fn parse(&self, text: &str) -> Result<Dataset> {
        let mut dataset = Dataset::default();
        let skip = usize::from(self.has_header);

        for (idx, line) in text.lines().enumerate().skip(skip) {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let values = parse_row(line, line_no)?;
            if values.len() != self.row_width() {
                return Err(NetError::DataFormat {
                    line: line_no,
                    reason: format!(
                        "expected {} fields ({} inputs + {} targets), got {}",
                        self.row_width(),
                        self.input_width,
                        self.target_width,
                        values.len()
                    ),
                });
            }

            let mut input = values;
            let target = input.split_off(self.input_width);
            dataset.push(TrainingExample::new(input, target));
        }

        if dataset.is_empty() {
            return Err(NetError::EmptyDataset);
        }
        Ok(dataset)
    }
}

/// Splits a line on its delimiter and parses every field as a finite `f64`.
fn parse_row(line: &str, line_no: usize) -> Result<Vec<f64>> {
    // The first comma or semicolon on the line decides its delimiter.
    let fields: Vec<&str> = match line.chars().find(|&c| c == ',' || c == ';') {
        Some(delimiter) => line.split(delimiter).map(str::trim).collect(),
        None => line.split_whitespace().collect(),
    };

    fields.into_iter()
        .enumerate()
        .map(|(col, field)| parse_field(field, line_no, col + 1))
        .collect()
}

fn parse_field(field: &str, line_no: usize, col: usize) -> Result<f64> {
    if field.is_empty() {
        return Err(NetError::DataFormat {
            line: line_no,
            reason: format!("field {col} is empty"),
        });
    }
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(NetError::DataFormat {
            line: line_no,
            reason: format!("field {col} '{field}' is not a finite number"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn line_of(err: NetError) -> usize {
        match err {
            NetError::DataFormat { line, .. } => line,
            other => panic!("expected DataFormat, got {other:?}"),
        }
    }

    #[test]
    fn parses_every_delimiter_in_file_order() {
        let text = "0.5,0.25\n1;0.75\n  -2   0.1 \n\n3.0, 1e-3\n";
        let ds = DataLoader::new(1, 1).parse(text).unwrap();
        let inputs: Vec<f64> = ds.iter().map(|e| e.input[0]).collect();
        let targets: Vec<f64> = ds.iter().map(|e| e.target[0]).collect();
        assert_eq!(inputs, vec![0.5, 1.0, -2.0, 3.0]);
        assert_eq!(targets, vec![0.25, 0.75, 0.1, 1e-3]);
    }

    #[test]
    fn splits_inputs_from_targets() {
        let ds = DataLoader::new(2, 3).parse("1 2 3 4 5").unwrap();
        assert_eq!(ds.examples()[0].input, vec![1.0, 2.0]);
        assert_eq!(ds.examples()[0].target, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn wrong_field_count_reports_line() {
        let err = DataLoader::new(1, 1).parse("0.1,0.2\n\n0.3\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataFormat);
        assert_eq!(line_of(err), 3);
    }

    #[test]
    fn rejects_non_numeric_and_non_finite_tokens() {
        for bad in ["0.1,abc", "0.1,NaN", "inf 0.2", "0.1,,0.2"] {
            let err = DataLoader::new(1, 1).parse(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DataFormat, "{bad}");
        }
    }

    #[test]
    fn header_only_when_asked() {
        let text = "x,y\n0.5,0.5\n";
        assert!(DataLoader::new(1, 1).parse(text).is_err());
        let ds = DataLoader::new(1, 1).with_header(true).parse(text).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = DataLoader::new(1, 1).parse("\n   \n").unwrap_err();
        assert!(matches!(err, NetError::EmptyDataset));
    }

    #[test]
    fn missing_file_is_a_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::new(1, 1).load(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, NetError::DataIo { .. }));
        assert_eq!(err.kind(), ErrorKind::DataFormat);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0.0;0.5").unwrap();
        writeln!(file, "1.5708;1.0").unwrap();
        let ds = DataLoader::new(1, 1).load(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.examples()[1].target, vec![1.0]);
    }
}

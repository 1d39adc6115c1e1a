//! Loading of per-user activity traces.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{Error, Result};

/// Per-minute 0/1 activity of every user, all traces of the same length.
#[derive(Default)]
pub struct DatasetReader {
    pub user_activity: Vec<Vec<u8>>,
}

impl DatasetReader {
    pub fn new() -> Self {
        Default::default()
    }

    /// Parses `.json` files as an array of traces and anything else as headerless CSV with one
    /// trace per row.
    pub fn parse(&mut self, dataset_filename: &str) -> Result<()> {
        let file = File::open(dataset_filename)?;
        let is_json = Path::new(dataset_filename)
            .extension()
            .map_or(false, |extension| extension.eq_ignore_ascii_case("json"));
        if is_json {
            self.parse_json(file)
        } else {
            self.parse_csv(file)
        }
    }

    pub fn parse_json<R: Read>(&mut self, reader: R) -> Result<()> {
        let traces: Vec<Vec<u8>> = serde_json::from_reader(reader)?;
        self.extend(traces)
    }

    pub fn parse_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut rdr = ReaderBuilder::new().has_headers(false).trim(csv::Trim::All).from_reader(reader);
        let mut traces = Vec::new();
        for record in rdr.deserialize() {
            let trace: Vec<u8> = record?;
            traces.push(trace);
        }
        self.extend(traces)
    }

    fn extend(&mut self, traces: Vec<Vec<u8>>) -> Result<()> {
        let expected_len = self
            .user_activity
            .first()
            .or_else(|| traces.first())
            .map(|trace| trace.len());
        for (offset, trace) in traces.iter().enumerate() {
            let user = self.user_activity.len() + offset;
            if trace.is_empty() {
                return Err(Error::InvalidTrace {
                    user,
                    reason: "trace is empty".to_string(),
                });
            }
            if Some(trace.len()) != expected_len {
                return Err(Error::InvalidTrace {
                    user,
                    reason: format!("expected {} minutes, got {}", expected_len.unwrap_or(0), trace.len()),
                });
            }
            if let Some(minute) = trace.iter().position(|value| *value > 1) {
                return Err(Error::InvalidTrace {
                    user,
                    reason: format!("value {} at minute {} is not 0 or 1", trace[minute], minute),
                });
            }
        }
        self.user_activity.extend(traces);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_rows_are_users() {
        let mut reader = DatasetReader::new();
        reader.parse_csv("0,1,1,0\n1, 1, 0, 0\n".as_bytes()).unwrap();
        assert_eq!(reader.user_activity, vec![vec![0, 1, 1, 0], vec![1, 1, 0, 0]]);
    }

    #[test]
    fn test_json_traces() {
        let mut reader = DatasetReader::new();
        reader.parse_json("[[0, 1], [1, 1]]".as_bytes()).unwrap();
        assert_eq!(reader.user_activity.len(), 2);
    }

    #[test]
    fn test_rejects_uneven_traces() {
        let mut reader = DatasetReader::new();
        let result = reader.parse_json("[[0, 1, 0], [1, 1]]".as_bytes());
        assert!(matches!(result, Err(Error::InvalidTrace { user: 1, .. })));
        assert!(reader.user_activity.is_empty());
    }

    #[test]
    fn test_rejects_non_binary_values() {
        let mut reader = DatasetReader::new();
        let result = reader.parse_csv("0,2,1\n".as_bytes());
        assert!(matches!(result, Err(Error::InvalidTrace { user: 0, .. })));
    }
}

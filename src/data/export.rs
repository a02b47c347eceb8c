// Plain-text export of distinct tag values for the word-cloud generator

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{DataError, DataSet, DataSink, Value};

/// Writes the distinct values of one column as a newline-separated list.
///
/// The downstream word-cloud generator only needs one record per line;
/// values are written in first-appearance order and null cells are skipped.
pub struct TagListSink {
    path: String,
    column: String,
}

impl TagListSink {
    /// Create a new tag list sink for the given column
    pub fn new<P: AsRef<Path>>(path: P, column: &str) -> Self {
        TagListSink {
            path: path.as_ref().to_string_lossy().to_string(),
            column: column.to_string(),
        }
    }
}

impl DataSink for TagListSink {
    fn write(&self, data: &DataSet) -> Result<(), DataError> {
        let idx = data
            .column_index(&self.column)
            .ok_or_else(|| DataError::MissingColumn(self.column.clone()))?;

        let file = File::create(&self.path).map_err(DataError::SourceUnavailable)?;
        let mut writer = BufWriter::new(file);

        let mut seen: HashSet<String> = HashSet::new();

        for row in &data.data {
            let text = match &row.values[idx] {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                Value::Boolean(b) => b.to_string(),
                Value::Integer(i) => i.to_string(),
                Value::Float(f) => f.to_string(),
            };

            if seen.insert(text.clone()) {
                writeln!(writer, "{}", text).map_err(DataError::SourceUnavailable)?;
            }
        }

        writer.flush().map_err(DataError::SourceUnavailable)?;

        Ok(())
    }

    fn name(&self) -> &str {
        &self.path
    }
}

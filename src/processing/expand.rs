// Row expansion for columns holding delimiter-separated tag lists

use crate::data::{DataSet, Row, Value};
use super::{DataProcessor, ProcessingError, ProcessorType};

/// Expands a tag-list column into one row per tag.
///
/// Each source row is replaced by one row per tag in the target cell, with
/// every other column value copied unchanged. Expansion is stable: tags keep
/// their in-cell order and rows keep their source order. Tag text is not
/// trimmed, so rejoining the tags with the same delimiter reproduces the
/// original cell.
///
/// A null cell or a cell with no delimiter (including the cleaner's
/// placeholder and the empty string) expands into exactly one row, so the
/// output can never have fewer rows than the input.
pub struct ExplodeProcessor {
    column: String,
    delimiter: char,
}

impl ExplodeProcessor {
    /// Create a new explode processor for the given column, splitting on commas
    pub fn new(column: &str) -> Self {
        ExplodeProcessor {
            column: column.to_string(),
            delimiter: ',',
        }
    }

    /// Set the tag delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl DataProcessor for ExplodeProcessor {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        let idx = input
            .column_index(&self.column)
            .ok_or_else(|| ProcessingError::MissingColumn(self.column.clone()))?;

        let mut result = DataSet::new(input.schema.clone());

        for row in &input.data {
            match &row.values[idx] {
                Value::String(cell) => {
                    for tag in cell.split(self.delimiter) {
                        let mut values = row.values.clone();
                        values[idx] = Value::String(tag.to_string());
                        result.add_row(Row::new(values))?;
                    }
                }
                // Non-string cells (nulls included) stay a singleton row
                _ => result.add_row(row.clone())?,
            }
        }

        result.metadata.extend_from(&input.metadata);

        Ok(result)
    }

    fn name(&self) -> &str {
        "explode"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Expand
    }
}

// Missing-value substitution for categorical columns

use crate::data::{DataSet, DataType, Row, Schema, Value, DEFAULT_PLACEHOLDER};
use super::{DataProcessor, ProcessingError, ProcessorType};

/// Replaces nulls in string-typed columns with a placeholder literal.
///
/// Numeric columns keep their nulls untouched; only categorical gaps get a
/// placeholder. The asymmetry is intentional, so downstream numeric
/// summaries keep skipping the missing cells.
pub struct FillMissingProcessor {
    placeholder: String,
}

impl FillMissingProcessor {
    /// Create a new fill processor with the given placeholder literal
    pub fn new(placeholder: &str) -> Self {
        FillMissingProcessor {
            placeholder: placeholder.to_string(),
        }
    }
}

impl Default for FillMissingProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

impl DataProcessor for FillMissingProcessor {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        let string_columns: Vec<bool> = input
            .schema
            .fields
            .iter()
            .map(|field| field.data_type == DataType::String)
            .collect();

        // Filled columns can no longer hold nulls
        let mut fields = input.schema.fields.clone();
        for (field, is_string) in fields.iter_mut().zip(&string_columns) {
            if *is_string {
                field.nullable = false;
            }
        }

        let mut result = DataSet::new(Schema::new(fields));

        for row in &input.data {
            let values: Vec<Value> = row
                .values
                .iter()
                .zip(&string_columns)
                .map(|(value, is_string)| {
                    if *is_string && value.is_null() {
                        Value::String(self.placeholder.clone())
                    } else {
                        value.clone()
                    }
                })
                .collect();

            result.add_row(Row::new(values))?;
        }

        result.metadata.extend_from(&input.metadata);

        Ok(result)
    }

    fn name(&self) -> &str {
        "fill_missing"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Clean
    }
}

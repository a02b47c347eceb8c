// Validation utilities

use crate::data::{DataError, DataSet, DataType};

/// Validate that a dataset contains every named column
pub fn require_columns(dataset: &DataSet, columns: &[&str]) -> Result<(), DataError> {
    for name in columns {
        if dataset.column_index(name).is_none() {
            return Err(DataError::MissingColumn((*name).to_string()));
        }
    }

    Ok(())
}

/// Validate that a dataset has the expected columns with the expected types
pub fn validate_schema(
    dataset: &DataSet,
    expected_columns: &[(&str, DataType)],
) -> Result<(), DataError> {
    for (name, data_type) in expected_columns {
        match dataset.schema.get_field_by_name(name) {
            None => return Err(DataError::MissingColumn((*name).to_string())),
            Some(field) if &field.data_type != data_type => {
                return Err(DataError::Parse(format!(
                    "column '{}' has type {:?}, expected {:?}",
                    name, field.data_type, data_type
                )));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

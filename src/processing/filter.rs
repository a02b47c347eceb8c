// Row filtering by predicate

use std::cmp::Ordering;

use crate::data::{DataSet, Row, Value};
use super::{compare_values, DataProcessor, ProcessingError, ProcessorType};

/// Filter rows based on a predicate
pub struct FilterProcessor {
    name: String,
    predicate: Box<dyn Fn(&Row, &DataSet) -> bool>,
}

impl FilterProcessor {
    /// Create a new filter processor with a predicate function
    pub fn new<F>(name: &str, predicate: F) -> Self
    where
        F: Fn(&Row, &DataSet) -> bool + 'static,
    {
        FilterProcessor {
            name: name.to_string(),
            predicate: Box::new(predicate),
        }
    }

    fn comparison(name: &str, column: &str, value: Value, keep: fn(Ordering) -> bool) -> Self {
        let column = column.to_string();
        Self::new(name, move |row, dataset| {
            match dataset.column_index(&column) {
                Some(idx) => {
                    let cell = &row.values[idx];
                    // Nulls never satisfy a comparison
                    !cell.is_null() && keep(compare_values(cell, &value))
                }
                None => false,
            }
        })
    }

    /// Keep rows where a column equals a value
    pub fn equals(column: &str, value: Value) -> Self {
        Self::comparison(&format!("equals_{}", column), column, value, |o| {
            o == Ordering::Equal
        })
    }

    /// Keep rows where a column is greater than a value
    pub fn greater_than(column: &str, value: Value) -> Self {
        Self::comparison(&format!("greater_than_{}", column), column, value, |o| {
            o == Ordering::Greater
        })
    }

    /// Keep rows where a column is less than or equal to a value
    pub fn less_than_or_equal(column: &str, value: Value) -> Self {
        Self::comparison(
            &format!("less_than_or_equal_{}", column),
            column,
            value,
            |o| o != Ordering::Greater,
        )
    }

    /// Keep rows where a column is not null
    pub fn not_null(column: &str) -> Self {
        let column = column.to_string();
        Self::new(&format!("not_null_{}", column.clone()), move |row, dataset| {
            dataset
                .column_index(&column)
                .map(|idx| !row.values[idx].is_null())
                .unwrap_or(false)
        })
    }
}

impl DataProcessor for FilterProcessor {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        let mut result = DataSet::new(input.schema.clone());

        for row in &input.data {
            if (self.predicate)(row, input) {
                result.add_row(row.clone())?;
            }
        }

        result.metadata.extend_from(&input.metadata);

        Ok(result)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Filter
    }
}

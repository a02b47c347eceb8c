// Column selection, derived columns and row ordering

use crate::data::{DataSet, DataType, Field, Row, Schema, Value};
use super::{compare_values, DataProcessor, ProcessingError, ProcessorType, SortOrder};

/// Select specific columns from a dataset
pub struct SelectTransform {
    columns: Vec<String>,
}

impl SelectTransform {
    /// Create a new select transform with the given column names
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectTransform {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl DataProcessor for SelectTransform {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        let mut indices = Vec::new();
        let mut selected_fields = Vec::new();

        for col in &self.columns {
            let idx = input
                .column_index(col)
                .ok_or_else(|| ProcessingError::MissingColumn(col.clone()))?;
            indices.push(idx);
            selected_fields.push(input.schema.fields[idx].clone());
        }

        let mut result = DataSet::new(Schema::new(selected_fields));

        for row in &input.data {
            let values: Vec<Value> = indices.iter().map(|&i| row.values[i].clone()).collect();
            result.add_row(Row::new(values))?;
        }

        result.metadata.extend_from(&input.metadata);

        Ok(result)
    }

    fn name(&self) -> &str {
        "select"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

/// Add a new column to a dataset
pub struct AddColumnTransform {
    name: String,
    data_type: DataType,
    nullable: bool,
    generator: Box<dyn Fn(&Row, &DataSet) -> Value>,
}

impl AddColumnTransform {
    /// Create a new add column transform with a generator function
    pub fn new<F>(name: &str, data_type: DataType, nullable: bool, generator: F) -> Self
    where
        F: Fn(&Row, &DataSet) -> Value + 'static,
    {
        AddColumnTransform {
            name: name.to_string(),
            data_type,
            nullable,
            generator: Box::new(generator),
        }
    }

    /// Create a new add column transform with a constant value
    pub fn with_constant(name: &str, data_type: DataType, nullable: bool, value: Value) -> Self {
        Self::new(name, data_type, nullable, move |_, _| value.clone())
    }
}

impl DataProcessor for AddColumnTransform {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        if input.column_index(&self.name).is_some() {
            return Err(ProcessingError::InvalidArgument(format!(
                "column '{}' already exists",
                self.name
            )));
        }

        let mut fields = input.schema.fields.clone();
        fields.push(Field::new(
            self.name.clone(),
            self.data_type.clone(),
            self.nullable,
        ));

        let mut result = DataSet::new(Schema::new(fields));

        for row in &input.data {
            let mut values = row.values.clone();
            values.push((self.generator)(row, input));
            result.add_row(Row::new(values))?;
        }

        result.metadata.extend_from(&input.metadata);

        Ok(result)
    }

    fn name(&self) -> &str {
        "add_column"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

/// Sort rows by one column. The sort is stable and places nulls first.
pub struct SortProcessor {
    column: String,
    order: SortOrder,
}

impl SortProcessor {
    /// Create an ascending sort on the given column
    pub fn ascending(column: &str) -> Self {
        SortProcessor {
            column: column.to_string(),
            order: SortOrder::Ascending,
        }
    }

    /// Create a descending sort on the given column
    pub fn descending(column: &str) -> Self {
        SortProcessor {
            column: column.to_string(),
            order: SortOrder::Descending,
        }
    }
}

impl DataProcessor for SortProcessor {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        let idx = input
            .column_index(&self.column)
            .ok_or_else(|| ProcessingError::MissingColumn(self.column.clone()))?;

        let mut result = input.clone();

        result.data.sort_by(|a, b| {
            let ordering = compare_values(&a.values[idx], &b.values[idx]);
            match self.order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });

        Ok(result)
    }

    fn name(&self) -> &str {
        "sort"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

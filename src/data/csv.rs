// CSV source and sink with sentinel-aware missing value handling

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::{
    DataError, DataSet, DataSink, DataSource, DataType, Field, Row, Schema, Value,
    DEFAULT_MISSING_VALUES,
};

/// CSV data source.
///
/// Cells that are empty or match one of the configured sentinel strings load
/// as [`Value::Null`]. When a schema is attached, cells in declared columns
/// are coerced to the declared type and a failed coercion is fatal; columns
/// not covered by the schema load as strings.
pub struct CsvSource {
    path: String,
    delimiter: char,
    missing_values: Vec<String>,
    schema: Option<Schema>,
}

impl CsvSource {
    /// Create a new CSV data source with the default sentinel set
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CsvSource {
            path: path.as_ref().to_string_lossy().to_string(),
            delimiter: ',',
            missing_values: DEFAULT_MISSING_VALUES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            schema: None,
        }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Replace the set of strings recognised as missing values
    pub fn with_missing_values<I, S>(mut self, sentinels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_values = sentinels.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a schema used for column-presence checks and type coercion
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    fn coerce(&self, column: &str, raw: &str, data_type: &DataType) -> Result<Value, DataError> {
        let coercion_error = || DataError::TypeCoercion {
            column: column.to_string(),
            value: raw.to_string(),
            expected: data_type.clone(),
        };

        match data_type {
            DataType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| coercion_error()),
            DataType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| coercion_error()),
            DataType::Boolean => match raw.trim().to_lowercase().as_str() {
                "true" | "1" => Ok(Value::Boolean(true)),
                "false" | "0" => Ok(Value::Boolean(false)),
                _ => Err(coercion_error()),
            },
            DataType::String => Ok(Value::String(raw.to_string())),
        }
    }
}

impl DataSource for CsvSource {
    fn read(&self) -> Result<DataSet, DataError> {
        let file = File::open(&self.path).map_err(DataError::SourceUnavailable)?;
        let reader = BufReader::new(file);

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter as u8)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| DataError::Parse(e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect();

        // Every declared column must be present in the file
        if let Some(schema) = &self.schema {
            for field in &schema.fields {
                if !headers.iter().any(|h| h == &field.name) {
                    return Err(DataError::MissingColumn(field.name.clone()));
                }
            }
        }

        // Column types follow the declared schema; unknown columns are strings
        let fields: Vec<Field> = headers
            .iter()
            .map(|name| {
                let data_type = self
                    .schema
                    .as_ref()
                    .and_then(|s| s.get_field_by_name(name))
                    .map(|f| f.data_type.clone())
                    .unwrap_or(DataType::String);

                Field::new(name.clone(), data_type, true)
            })
            .collect();

        let sentinels: HashSet<&str> = self.missing_values.iter().map(String::as_str).collect();

        let mut dataset = DataSet::new(Schema::new(fields));

        for result in csv_reader.records() {
            let record = result.map_err(|e| DataError::Parse(e.to_string()))?;

            if record.len() != dataset.schema.fields.len() {
                return Err(DataError::Parse(format!(
                    "record has {} fields, header has {}",
                    record.len(),
                    dataset.schema.fields.len()
                )));
            }

            let mut values = Vec::with_capacity(record.len());
            for (cell, field) in record.iter().zip(&dataset.schema.fields) {
                let value = if cell.is_empty() || sentinels.contains(cell) {
                    Value::Null
                } else {
                    self.coerce(&field.name, cell, &field.data_type)?
                };
                values.push(value);
            }

            dataset.add_row(Row::new(values))?;
        }

        dataset.metadata.add("source".to_string(), "csv".to_string());
        dataset.metadata.add("path".to_string(), self.path.clone());

        Ok(dataset)
    }

    fn name(&self) -> &str {
        &self.path
    }
}

/// CSV data sink; nulls are written as empty cells
pub struct CsvSink {
    path: String,
    delimiter: char,
}

impl CsvSink {
    /// Create a new CSV data sink
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CsvSink {
            path: path.as_ref().to_string_lossy().to_string(),
            delimiter: ',',
        }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl DataSink for CsvSink {
    fn write(&self, data: &DataSet) -> Result<(), DataError> {
        let file = File::create(&self.path).map_err(DataError::SourceUnavailable)?;
        let writer = BufWriter::new(file);

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter as u8)
            .from_writer(writer);

        let headers: Vec<&str> = data
            .schema
            .fields
            .iter()
            .map(|field| field.name.as_str())
            .collect();

        csv_writer
            .write_record(&headers)
            .map_err(|e| DataError::Parse(e.to_string()))?;

        for row in &data.data {
            let record: Vec<String> = row
                .values
                .iter()
                .map(|value| match value {
                    Value::Null => String::new(),
                    Value::Boolean(b) => b.to_string(),
                    Value::Integer(i) => i.to_string(),
                    Value::Float(f) => f.to_string(),
                    Value::String(s) => s.clone(),
                })
                .collect();

            csv_writer
                .write_record(&record)
                .map_err(|e| DataError::Parse(e.to_string()))?;
        }

        csv_writer.flush().map_err(DataError::SourceUnavailable)?;

        Ok(())
    }

    fn name(&self) -> &str {
        &self.path
    }
}

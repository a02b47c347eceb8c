// Group-by aggregation and period-over-period change derivation

use std::collections::HashMap;

use crate::data::{DataSet, DataType, Field, Row, Schema, Value};
use super::{
    compare_values, mean, DataProcessor, FilterProcessor, ProcessingError, ProcessorType,
    ValueKey,
};

/// Represents an aggregation function
pub trait AggregateFunction {
    /// Get the name of the aggregation function
    fn name(&self) -> &str;

    /// Get the output data type of the aggregation function
    fn output_type(&self, input_type: &DataType) -> DataType;

    /// Create a fresh accumulator for one group
    fn accumulator(&self) -> Box<dyn Accumulator>;
}

/// Per-group aggregation state
pub trait Accumulator {
    /// Fold one value into the state
    fn update(&mut self, value: &Value);

    /// Produce the aggregated value
    fn finalize(&self) -> Value;
}

/// Count aggregation function; nulls are not counted
pub struct CountFunction;

struct CountState {
    count: i64,
}

impl AggregateFunction for CountFunction {
    fn name(&self) -> &str {
        "count"
    }

    fn output_type(&self, _input_type: &DataType) -> DataType {
        DataType::Integer
    }

    fn accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(CountState { count: 0 })
    }
}

impl Accumulator for CountState {
    fn update(&mut self, value: &Value) {
        if !value.is_null() {
            self.count += 1;
        }
    }

    fn finalize(&self) -> Value {
        Value::Integer(self.count)
    }
}

/// Sum aggregation function; stays integer until a float value appears
pub struct SumFunction;

struct SumState {
    int_sum: i64,
    float_sum: f64,
    is_float: bool,
}

impl AggregateFunction for SumFunction {
    fn name(&self) -> &str {
        "sum"
    }

    fn output_type(&self, input_type: &DataType) -> DataType {
        match input_type {
            DataType::Integer => DataType::Integer,
            _ => DataType::Float,
        }
    }

    fn accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(SumState {
            int_sum: 0,
            float_sum: 0.0,
            is_float: false,
        })
    }
}

impl Accumulator for SumState {
    fn update(&mut self, value: &Value) {
        match value {
            Value::Integer(i) => {
                if self.is_float {
                    self.float_sum += *i as f64;
                } else {
                    self.int_sum += *i;
                }
            }
            Value::Float(f) => {
                if !self.is_float {
                    self.float_sum = self.int_sum as f64;
                    self.is_float = true;
                }
                self.float_sum += *f;
            }
            _ => {}
        }
    }

    fn finalize(&self) -> Value {
        if self.is_float {
            Value::Float(self.float_sum)
        } else {
            Value::Integer(self.int_sum)
        }
    }
}

/// Mean aggregation function; null over an all-null group
pub struct MeanFunction;

struct MeanState {
    sum: f64,
    count: i64,
}

impl AggregateFunction for MeanFunction {
    fn name(&self) -> &str {
        "mean"
    }

    fn output_type(&self, _input_type: &DataType) -> DataType {
        DataType::Float
    }

    fn accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(MeanState { sum: 0.0, count: 0 })
    }
}

impl Accumulator for MeanState {
    fn update(&mut self, value: &Value) {
        if let Some(f) = value.as_f64() {
            self.sum += f;
            self.count += 1;
        }
    }

    fn finalize(&self) -> Value {
        if self.count > 0 {
            Value::Float(self.sum / self.count as f64)
        } else {
            Value::Null
        }
    }
}

/// Min aggregation function
pub struct MinFunction;

/// Max aggregation function
pub struct MaxFunction;

struct ExtremumState {
    best: Value,
    want_greater: bool,
}

impl AggregateFunction for MinFunction {
    fn name(&self) -> &str {
        "min"
    }

    fn output_type(&self, input_type: &DataType) -> DataType {
        input_type.clone()
    }

    fn accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(ExtremumState {
            best: Value::Null,
            want_greater: false,
        })
    }
}

impl AggregateFunction for MaxFunction {
    fn name(&self) -> &str {
        "max"
    }

    fn output_type(&self, input_type: &DataType) -> DataType {
        input_type.clone()
    }

    fn accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(ExtremumState {
            best: Value::Null,
            want_greater: true,
        })
    }
}

impl Accumulator for ExtremumState {
    fn update(&mut self, value: &Value) {
        if value.is_null() {
            return;
        }

        if self.best.is_null() {
            self.best = value.clone();
            return;
        }

        let ordering = compare_values(value, &self.best);
        let better = if self.want_greater {
            ordering == std::cmp::Ordering::Greater
        } else {
            ordering == std::cmp::Ordering::Less
        };

        if better {
            self.best = value.clone();
        }
    }

    fn finalize(&self) -> Value {
        self.best.clone()
    }
}

/// Output ordering for grouped results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Group by processor for aggregating data.
///
/// Output holds one row per distinct key, ordered by ascending key unless
/// descending order is requested. Rows with a null in any key column are
/// dropped before grouping, so a missing key never forms a group of its
/// own.
pub struct GroupByProcessor {
    group_by_columns: Vec<String>,
    aggregations: Vec<(String, String, Box<dyn AggregateFunction>)>, // (output_name, input_column, function)
    order: SortOrder,
}

impl GroupByProcessor {
    /// Create a new group by processor
    pub fn new() -> Self {
        GroupByProcessor {
            group_by_columns: Vec::new(),
            aggregations: Vec::new(),
            order: SortOrder::Ascending,
        }
    }

    /// Add a column to group by
    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by_columns.push(column.to_string());
        self
    }

    /// Add an aggregation
    pub fn aggregate<F: AggregateFunction + 'static>(
        mut self,
        output_name: &str,
        input_column: &str,
        function: F,
    ) -> Self {
        self.aggregations.push((
            output_name.to_string(),
            input_column.to_string(),
            Box::new(function),
        ));
        self
    }

    /// Add a count aggregation
    pub fn count(self, output_name: &str, input_column: &str) -> Self {
        self.aggregate(output_name, input_column, CountFunction)
    }

    /// Add a sum aggregation
    pub fn sum(self, output_name: &str, input_column: &str) -> Self {
        self.aggregate(output_name, input_column, SumFunction)
    }

    /// Add a mean aggregation
    pub fn mean(self, output_name: &str, input_column: &str) -> Self {
        self.aggregate(output_name, input_column, MeanFunction)
    }

    /// Add a min aggregation
    pub fn min(self, output_name: &str, input_column: &str) -> Self {
        self.aggregate(output_name, input_column, MinFunction)
    }

    /// Add a max aggregation
    pub fn max(self, output_name: &str, input_column: &str) -> Self {
        self.aggregate(output_name, input_column, MaxFunction)
    }

    /// Order output rows by descending key
    pub fn descending(mut self) -> Self {
        self.order = SortOrder::Descending;
        self
    }
}

impl Default for GroupByProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProcessor for GroupByProcessor {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        if self.group_by_columns.is_empty() {
            return Err(ProcessingError::InvalidArgument(
                "group by requires at least one key column".to_string(),
            ));
        }

        let mut group_by_indices = Vec::new();
        let mut group_by_fields = Vec::new();

        for col in &self.group_by_columns {
            let idx = input
                .column_index(col)
                .ok_or_else(|| ProcessingError::MissingColumn(col.clone()))?;
            group_by_indices.push(idx);
            group_by_fields.push(input.schema.fields[idx].clone());
        }

        let mut agg_indices = Vec::new();
        let mut agg_output_fields = Vec::new();

        for (output_name, input_column, function) in &self.aggregations {
            let idx = input
                .column_index(input_column)
                .ok_or_else(|| ProcessingError::MissingColumn(input_column.clone()))?;
            agg_indices.push(idx);

            let output_type = function.output_type(&input.schema.fields[idx].data_type);
            agg_output_fields.push(Field::new(output_name.clone(), output_type, true));
        }

        let mut output_fields = group_by_fields;
        output_fields.extend(agg_output_fields);
        let output_schema = Schema::new(output_fields);

        // Accumulate group states in a single pass over the rows
        let mut groups: HashMap<Vec<ValueKey>, (Vec<Value>, Vec<Box<dyn Accumulator>>)> =
            HashMap::new();

        for row in &input.data {
            let key_values: Vec<Value> = group_by_indices
                .iter()
                .map(|&i| row.values[i].clone())
                .collect();
            if key_values.iter().any(Value::is_null) {
                continue;
            }
            let key: Vec<ValueKey> = key_values.iter().map(ValueKey::from_value).collect();

            let entry = groups.entry(key).or_insert_with(|| {
                let states = self
                    .aggregations
                    .iter()
                    .map(|(_, _, function)| function.accumulator())
                    .collect();
                (key_values, states)
            });

            for (state, &col_idx) in entry.1.iter_mut().zip(&agg_indices) {
                state.update(&row.values[col_idx]);
            }
        }

        let mut finished: Vec<(Vec<Value>, Vec<Value>)> = groups
            .into_values()
            .map(|(key_values, states)| {
                let agg_results: Vec<Value> = states.iter().map(|s| s.finalize()).collect();
                (key_values, agg_results)
            })
            .collect();

        finished.sort_by(|(a, _), (b, _)| {
            let ordering = a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| compare_values(x, y))
                .find(|o| *o != std::cmp::Ordering::Equal)
                .unwrap_or(std::cmp::Ordering::Equal);

            match self.order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });

        let mut result = DataSet::new(output_schema);

        for (key_values, agg_results) in finished {
            let mut output_values = key_values;
            output_values.extend(agg_results);
            result.add_row(Row::new(output_values))?;
        }

        result.metadata.extend_from(&input.metadata);

        Ok(result)
    }

    fn name(&self) -> &str {
        "group_by"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Aggregate
    }
}

/// Fractional change of each value relative to its predecessor.
///
/// The first element has no prior value, so its change is `None` rather
/// than zero.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if i == 0 {
                None
            } else {
                Some((v - values[i - 1]) / values[i - 1])
            }
        })
        .collect()
}

/// Running sum of per-step percentage changes.
///
/// Growth is accumulated additively (percentage points), not compounded;
/// undefined entries stay undefined and do not contribute to the sum.
pub fn cumulative_change(changes: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut total = 0.0;

    changes
        .iter()
        .map(|change| {
            change.map(|c| {
                total += c;
                total
            })
        })
        .collect()
}

/// Mean of a numeric column for rows keyed at or before a split value
/// versus rows keyed after it.
///
/// Output holds one `era` row per side of the split, earlier side first.
/// Null cells contribute to neither the filter nor the mean; a side with
/// no usable values gets a null mean.
pub fn split_mean(
    input: &DataSet,
    key: &str,
    column: &str,
    split: i64,
) -> Result<DataSet, ProcessingError> {
    let early = FilterProcessor::less_than_or_equal(key, Value::Integer(split)).process(input)?;
    let late = FilterProcessor::greater_than(key, Value::Integer(split)).process(input)?;

    let mut result = DataSet::new(Schema::new(vec![
        Field::new("era".to_string(), DataType::String, false),
        Field::new(format!("mean_{}", column), DataType::Float, true),
    ]));

    for (label, subset) in [
        (format!("{}_and_earlier", split), early),
        (format!("after_{}", split), late),
    ] {
        let values: Vec<f64> = subset
            .column_values(column)
            .map_err(|_| ProcessingError::MissingColumn(column.to_string()))?
            .iter()
            .filter_map(|v| v.as_f64())
            .collect();

        let side_mean = if values.is_empty() {
            Value::Null
        } else {
            Value::Float(mean(&values))
        };

        result.add_row(Row::new(vec![Value::String(label), side_mean]))?;
    }

    Ok(result)
}

/// Appends a percentage-change column computed over the existing row order.
///
/// The first row gets a null change. An optional second column holds the
/// additive cumulative change.
pub struct PctChangeTransform {
    column: String,
    output: String,
    cumulative: Option<String>,
}

impl PctChangeTransform {
    /// Create a transform deriving `pct_change` from the given column
    pub fn new(column: &str) -> Self {
        PctChangeTransform {
            column: column.to_string(),
            output: "pct_change".to_string(),
            cumulative: None,
        }
    }

    /// Rename the output column
    pub fn with_output(mut self, output: &str) -> Self {
        self.output = output.to_string();
        self
    }

    /// Also append the additive cumulative change under the given name
    pub fn with_cumulative(mut self, name: &str) -> Self {
        self.cumulative = Some(name.to_string());
        self
    }
}

impl DataProcessor for PctChangeTransform {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        let idx = input
            .column_index(&self.column)
            .ok_or_else(|| ProcessingError::MissingColumn(self.column.clone()))?;

        for name in std::iter::once(&self.output).chain(self.cumulative.iter()) {
            if input.column_index(name).is_some() {
                return Err(ProcessingError::InvalidArgument(format!(
                    "column '{}' already exists",
                    name
                )));
            }
        }

        let values: Vec<f64> = input
            .data
            .iter()
            .map(|row| {
                row.values[idx].as_f64().ok_or_else(|| {
                    ProcessingError::InvalidOperation(format!(
                        "column '{}' must be numeric and non-null for pct_change",
                        self.column
                    ))
                })
            })
            .collect::<Result<_, _>>()?;

        let changes = pct_change(&values);
        let cumulative = self
            .cumulative
            .as_ref()
            .map(|_| cumulative_change(&changes));

        let mut fields = input.schema.fields.clone();
        fields.push(Field::new(self.output.clone(), DataType::Float, true));
        if let Some(name) = &self.cumulative {
            fields.push(Field::new(name.clone(), DataType::Float, true));
        }

        let mut result = DataSet::new(Schema::new(fields));

        for (i, row) in input.data.iter().enumerate() {
            let mut values = row.values.clone();
            values.push(changes[i].map(Value::Float).unwrap_or(Value::Null));
            if let Some(cumulative) = &cumulative {
                values.push(cumulative[i].map(Value::Float).unwrap_or(Value::Null));
            }
            result.add_row(Row::new(values))?;
        }

        result.metadata.extend_from(&input.metadata);

        Ok(result)
    }

    fn name(&self) -> &str {
        "pct_change"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Aggregate
    }
}

// Descriptive statistics, null accounting and duplicate detection

use std::collections::HashMap;
use std::collections::HashSet;

use serde::Serialize;

use crate::data::DataSet;
use super::{row_key, ProcessingError, ValueKey};

/// Null count for a single column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnNulls {
    pub column: String,
    pub nulls: usize,
}

/// Summary statistics for a numeric column.
///
/// Quartiles use linear interpolation between order statistics at position
/// `q * (n - 1)`, and the standard deviation is the sample deviation
/// (divisor `n - 1`), matching the conventions of the reference analysis.
#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Summary statistics for a categorical column
#[derive(Debug, Clone, Serialize)]
pub struct CategoricalSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

/// Full profile of a dataset
#[derive(Debug, Clone, Serialize)]
pub struct DataProfile {
    pub rows: usize,
    pub columns: usize,
    pub null_counts: Vec<ColumnNulls>,
    pub numeric: Vec<NumericSummary>,
    pub categorical: Vec<CategoricalSummary>,
    pub duplicate_rows: usize,
    pub duplicate_columns: Vec<(String, String)>,
}

/// Profile a dataset: shape, nulls, per-column summaries and duplicates
pub fn profile(input: &DataSet) -> DataProfile {
    DataProfile {
        rows: input.len(),
        columns: input.schema.fields.len(),
        null_counts: null_counts(input),
        numeric: describe_numeric(input),
        categorical: describe_categorical(input),
        duplicate_rows: duplicate_rows(input),
        duplicate_columns: duplicate_columns(input),
    }
}

/// Count nulls per column
pub fn null_counts(input: &DataSet) -> Vec<ColumnNulls> {
    input
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| ColumnNulls {
            column: field.name.clone(),
            nulls: input
                .data
                .iter()
                .filter(|row| row.values[idx].is_null())
                .count(),
        })
        .collect()
}

/// Summarise every numeric column, skipping null cells
pub fn describe_numeric(input: &DataSet) -> Vec<NumericSummary> {
    input
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.data_type.is_numeric())
        .map(|(idx, field)| {
            let mut values: Vec<f64> = input
                .data
                .iter()
                .filter_map(|row| row.values[idx].as_f64())
                .collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            NumericSummary {
                column: field.name.clone(),
                count: values.len(),
                mean: mean(&values),
                std_dev: std_dev(&values),
                min: values.first().copied().unwrap_or(f64::NAN),
                q1: quantile(&values, 0.25).unwrap_or(f64::NAN),
                median: quantile(&values, 0.5).unwrap_or(f64::NAN),
                q3: quantile(&values, 0.75).unwrap_or(f64::NAN),
                max: values.last().copied().unwrap_or(f64::NAN),
            }
        })
        .collect()
}

/// Summarise every categorical column: non-null count, distinct values,
/// most frequent value and its frequency
pub fn describe_categorical(input: &DataSet) -> Vec<CategoricalSummary> {
    input
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| !field.data_type.is_numeric())
        .map(|(idx, field)| {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            let mut order: Vec<&str> = Vec::new();
            let mut count = 0usize;

            for row in &input.data {
                if let Some(text) = row.values[idx].as_str() {
                    count += 1;
                    let entry = counts.entry(text).or_insert(0);
                    if *entry == 0 {
                        order.push(text);
                    }
                    *entry += 1;
                }
            }

            // Ties resolve to the first value encountered
            let mut top: Option<&str> = None;
            let mut freq = 0usize;
            for &text in &order {
                let n = counts[text];
                if n > freq {
                    top = Some(text);
                    freq = n;
                }
            }

            CategoricalSummary {
                column: field.name.clone(),
                count,
                unique: order.len(),
                top: top.map(str::to_string),
                freq,
            }
        })
        .collect()
}

/// Count rows that exactly duplicate an earlier row
pub fn duplicate_rows(input: &DataSet) -> usize {
    let mut seen: HashSet<Vec<ValueKey>> = HashSet::new();
    let mut duplicates = 0usize;

    for row in &input.data {
        if !seen.insert(row_key(&row.values)) {
            duplicates += 1;
        }
    }

    duplicates
}

/// Find every pair of columns whose values are equal in all rows
pub fn duplicate_columns(input: &DataSet) -> Vec<(String, String)> {
    let fields = &input.schema.fields;
    let mut pairs = Vec::new();

    for a in 0..fields.len() {
        for b in (a + 1)..fields.len() {
            let equal = input
                .data
                .iter()
                .all(|row| row.values[a] == row.values[b]);

            if equal {
                pairs.push((fields[a].name.clone(), fields[b].name.clone()));
            }
        }
    }

    pairs
}

/// Check whether two named columns hold equal values in every row
pub fn columns_equal(input: &DataSet, a: &str, b: &str) -> Result<bool, ProcessingError> {
    let idx_a = input
        .column_index(a)
        .ok_or_else(|| ProcessingError::MissingColumn(a.to_string()))?;
    let idx_b = input
        .column_index(b)
        .ok_or_else(|| ProcessingError::MissingColumn(b.to_string()))?;

    Ok(input
        .data
        .iter()
        .all(|row| row.values[idx_a] == row.values[idx_b]))
}

/// Mean of a slice of values
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (divisor `n - 1`)
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }

    let m = mean(values);
    let variance = values.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}

/// Quantile of a sorted slice with linear interpolation between order
/// statistics. Returns `None` on an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let pos = q * (sorted.len() - 1) as f64;
    let idx = pos.floor() as usize;
    let frac = pos - idx as f64;

    if idx + 1 < sorted.len() {
        Some(sorted[idx] + frac * (sorted[idx + 1] - sorted[idx]))
    } else {
        Some(sorted[idx])
    }
}

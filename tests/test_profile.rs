// Profiler tests: summaries, quartiles and duplicate detection

use board_game_analytics::{
    data::{DataSet, DataType, Field, Row, Schema, Value},
    processing::{
        columns_equal, describe_categorical, describe_numeric, duplicate_columns, duplicate_rows,
        null_counts, profile, quantile,
    },
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn playtimes_fixture() -> DataSet {
    let schema = Schema::new(vec![
        Field::new("game_id".to_string(), DataType::Integer, false),
        Field::new("playing_time".to_string(), DataType::Integer, true),
        Field::new("min_playtime".to_string(), DataType::Integer, true),
        Field::new("max_playtime".to_string(), DataType::Integer, true),
        Field::new("designer".to_string(), DataType::String, true),
    ]);

    let mut dataset = DataSet::new(schema);
    let rows = [
        (1, 90, 60, 90, Some("John Doe")),
        (2, 30, 30, 30, Some("Jane Roe")),
        (3, 120, 90, 120, None),
        (4, 45, 45, 45, Some("John Doe")),
    ];

    for (id, playing, min, max, designer) in rows {
        dataset.add_row(Row::new(vec![
            Value::Integer(id),
            Value::Integer(playing),
            Value::Integer(min),
            Value::Integer(max),
            designer.map(|d| Value::String(d.to_string())).unwrap_or(Value::Null),
        ])).unwrap();
    }

    dataset
}

#[test]
fn test_quartiles_use_linear_interpolation() {
    let values: Vec<f64> = (1..=10).map(f64::from).collect();

    assert_close(quantile(&values, 0.25).unwrap(), 3.25);
    assert_close(quantile(&values, 0.5).unwrap(), 5.5);
    assert_close(quantile(&values, 0.75).unwrap(), 7.75);
    assert_close(quantile(&values, 0.0).unwrap(), 1.0);
    assert_close(quantile(&values, 1.0).unwrap(), 10.0);
}

#[test]
fn test_quantile_empty_slice() {
    assert!(quantile(&[], 0.5).is_none());
}

#[test]
fn test_numeric_summary() {
    let dataset = playtimes_fixture();
    let summaries = describe_numeric(&dataset);

    let playing = summaries
        .iter()
        .find(|s| s.column == "playing_time")
        .unwrap();

    assert_eq!(playing.count, 4);
    assert_close(playing.mean, 71.25);
    assert_close(playing.min, 30.0);
    assert_close(playing.max, 120.0);
    assert_close(playing.median, 67.5);

    // Sample standard deviation over [90, 30, 120, 45]: sqrt(5118.75 / 3)
    assert_close(playing.std_dev, 1706.25_f64.sqrt());

    // String columns are not profiled as numeric
    assert!(summaries.iter().all(|s| s.column != "designer"));
}

#[test]
fn test_numeric_summary_skips_nulls() {
    let schema = Schema::new(vec![Field::new(
        "users_rated".to_string(),
        DataType::Integer,
        true,
    )]);
    let mut dataset = DataSet::new(schema);
    for value in [Value::Integer(10), Value::Null, Value::Integer(20)] {
        dataset.add_row(Row::new(vec![value])).unwrap();
    }

    let summary = &describe_numeric(&dataset)[0];
    assert_eq!(summary.count, 2);
    assert_close(summary.mean, 15.0);
}

#[test]
fn test_categorical_summary() {
    let dataset = playtimes_fixture();
    let summaries = describe_categorical(&dataset);

    assert_eq!(summaries.len(), 1);
    let designer = &summaries[0];

    assert_eq!(designer.column, "designer");
    assert_eq!(designer.count, 3);
    assert_eq!(designer.unique, 2);
    assert_eq!(designer.top.as_deref(), Some("John Doe"));
    assert_eq!(designer.freq, 2);
}

#[test]
fn test_null_counts() {
    let dataset = playtimes_fixture();
    let counts = null_counts(&dataset);

    let designer = counts.iter().find(|c| c.column == "designer").unwrap();
    assert_eq!(designer.nulls, 1);

    let playing = counts.iter().find(|c| c.column == "playing_time").unwrap();
    assert_eq!(playing.nulls, 0);
}

#[test]
fn test_duplicate_rows() {
    let mut dataset = playtimes_fixture();
    assert_eq!(duplicate_rows(&dataset), 0);

    let copy = dataset.data[1].clone();
    dataset.add_row(copy).unwrap();
    assert_eq!(duplicate_rows(&dataset), 1);
}

#[test]
fn test_duplicate_columns_reports_playing_time_pair() {
    let dataset = playtimes_fixture();

    // playing_time mirrors max_playtime in every row; min_playtime differs
    assert_eq!(
        duplicate_columns(&dataset),
        vec![("playing_time".to_string(), "max_playtime".to_string())]
    );

    assert!(columns_equal(&dataset, "playing_time", "max_playtime").unwrap());
    assert!(!columns_equal(&dataset, "playing_time", "min_playtime").unwrap());
}

#[test]
fn test_columns_equal_missing_column() {
    let dataset = playtimes_fixture();
    assert!(columns_equal(&dataset, "playing_time", "publisher").is_err());
}

#[test]
fn test_full_profile_shape() {
    let dataset = playtimes_fixture();
    let profile = profile(&dataset);

    assert_eq!(profile.rows, 4);
    assert_eq!(profile.columns, 5);
    assert_eq!(profile.numeric.len(), 4);
    assert_eq!(profile.categorical.len(), 1);
    assert_eq!(profile.duplicate_rows, 0);
    assert_eq!(profile.duplicate_columns.len(), 1);
}

// Loader, cleaner and expander tests

use std::io::Write;

use board_game_analytics::{
    data::{
        CsvSource, DataError, DataSet, DataSink, DataSource, DataType, Field, Row, Schema,
        TagListSink, Value,
    },
    processing::{
        null_counts, DataProcessor, ExplodeProcessor, FillMissingProcessor, FilterProcessor,
        Pipeline, ProcessingError, SelectTransform,
    },
};

fn games_schema() -> Schema {
    Schema::new(vec![
        Field::new("game_id".to_string(), DataType::Integer, false),
        Field::new("name".to_string(), DataType::String, true),
        Field::new("year_published".to_string(), DataType::Integer, true),
        Field::new("average_rating".to_string(), DataType::Float, true),
        Field::new("category".to_string(), DataType::String, true),
        Field::new("designer".to_string(), DataType::String, true),
    ])
}

// Four games; tag-list lengths 1, 3, 2, 1 and one missing designer cell
fn games_fixture() -> DataSet {
    let mut dataset = DataSet::new(games_schema());

    dataset.add_row(Row::new(vec![
        Value::Integer(1),
        Value::String("Alpha".to_string()),
        Value::Integer(2004),
        Value::Float(7.5),
        Value::String("Strategy".to_string()),
        Value::String("John Doe".to_string()),
    ])).unwrap();

    dataset.add_row(Row::new(vec![
        Value::Integer(2),
        Value::String("Beta".to_string()),
        Value::Integer(2005),
        Value::Null,
        Value::String("Strategy,Economic,Negotiation".to_string()),
        Value::String("uncredited".to_string()),
    ])).unwrap();

    dataset.add_row(Row::new(vec![
        Value::Integer(3),
        Value::String("Gamma".to_string()),
        Value::Integer(2005),
        Value::Float(6.5),
        Value::String("Party,Deduction".to_string()),
        Value::Null,
    ])).unwrap();

    dataset.add_row(Row::new(vec![
        Value::Integer(4),
        Value::String("Delta".to_string()),
        Value::Integer(2006),
        Value::Float(8.0),
        Value::String("Wargame".to_string()),
        Value::String("Jane Roe".to_string()),
    ])).unwrap();

    dataset
}

fn nulls_for(dataset: &DataSet, column: &str) -> usize {
    null_counts(dataset)
        .into_iter()
        .find(|c| c.column == column)
        .map(|c| c.nulls)
        .unwrap()
}

#[test]
fn test_fill_missing_only_touches_string_columns() {
    let games = games_fixture();
    let cleaned = FillMissingProcessor::new("Unknown").process(&games).unwrap();

    // Every string column is fully filled
    assert_eq!(nulls_for(&cleaned, "designer"), 0);
    assert_eq!(nulls_for(&cleaned, "category"), 0);
    assert_eq!(
        cleaned.data[2].values[5],
        Value::String("Unknown".to_string())
    );

    // The numeric gap survives untouched
    assert_eq!(nulls_for(&games, "average_rating"), 1);
    assert_eq!(nulls_for(&cleaned, "average_rating"), 1);

    // The explicit "uncredited" literal is data, not a missing value
    assert_eq!(
        cleaned.data[1].values[5],
        Value::String("uncredited".to_string())
    );
}

#[test]
fn test_fill_missing_drops_designer_null_count() {
    let games = games_fixture();
    assert_eq!(nulls_for(&games, "designer"), 1);

    let cleaned = FillMissingProcessor::default().process(&games).unwrap();
    assert_eq!(nulls_for(&cleaned, "designer"), 0);
}

#[test]
fn test_explode_row_count_matches_tag_list_lengths() {
    let games = games_fixture();

    // List lengths 1 + 3 + 2 + 1
    let expanded = ExplodeProcessor::new("category").process(&games).unwrap();
    assert_eq!(expanded.len(), 7);
}

#[test]
fn test_explode_is_stable() {
    let games = games_fixture();
    let expanded = ExplodeProcessor::new("category").process(&games).unwrap();

    let tags: Vec<&str> = expanded
        .column_values("category")
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();

    assert_eq!(
        tags,
        vec![
            "Strategy",
            "Strategy",
            "Economic",
            "Negotiation",
            "Party",
            "Deduction",
            "Wargame",
        ]
    );

    // Other columns are copied unchanged into each expanded row
    let ids: Vec<&Value> = expanded.column_values("game_id").unwrap();
    assert_eq!(
        ids,
        vec![
            &Value::Integer(1),
            &Value::Integer(2),
            &Value::Integer(2),
            &Value::Integer(2),
            &Value::Integer(3),
            &Value::Integer(3),
            &Value::Integer(4),
        ]
    );
}

#[test]
fn test_explode_never_shrinks() {
    let mut dataset = DataSet::new(games_schema());
    dataset.add_row(Row::new(vec![
        Value::Integer(1),
        Value::String("Alpha".to_string()),
        Value::Integer(2004),
        Value::Float(7.5),
        Value::Null,
        Value::String("John Doe".to_string()),
    ])).unwrap();
    dataset.add_row(Row::new(vec![
        Value::Integer(2),
        Value::String("Beta".to_string()),
        Value::Integer(2005),
        Value::Float(6.0),
        Value::String(String::new()),
        Value::String("Jane Roe".to_string()),
    ])).unwrap();

    let expanded = ExplodeProcessor::new("category").process(&dataset).unwrap();

    // A null cell and an empty cell each stay a singleton row
    assert_eq!(expanded.len(), 2);
    assert_eq!(expanded.data[0].values[4], Value::Null);
    assert_eq!(expanded.data[1].values[4], Value::String(String::new()));
}

#[test]
fn test_explode_round_trip() {
    use std::collections::{HashMap, HashSet};

    let games = games_fixture();
    let expanded = ExplodeProcessor::new("category").process(&games).unwrap();

    // Regroup tags by game and rejoin with the same delimiter
    let mut regrouped: HashMap<i64, Vec<String>> = HashMap::new();
    for row in &expanded.data {
        if let (Value::Integer(id), Value::String(tag)) = (&row.values[0], &row.values[4]) {
            regrouped.entry(*id).or_default().push(tag.clone());
        }
    }

    for row in &games.data {
        if let (Value::Integer(id), Value::String(cell)) = (&row.values[0], &row.values[4]) {
            let original: HashSet<&str> = cell.split(',').collect();
            let rebuilt: HashSet<&str> =
                regrouped[id].iter().map(String::as_str).collect();
            assert_eq!(rebuilt, original, "tag set mismatch for game {}", id);
        }
    }
}

#[test]
fn test_explode_missing_column() {
    let games = games_fixture();
    let result = ExplodeProcessor::new("publisher").process(&games);

    assert!(matches!(
        result,
        Err(ProcessingError::MissingColumn(col)) if col == "publisher"
    ));
}

#[test]
fn test_filter_and_select_pipeline() {
    let games = games_fixture();

    let recent = Pipeline::new("recent")
        .add(FilterProcessor::greater_than(
            "year_published",
            Value::Integer(2004),
        ))
        .add(SelectTransform::new(["name", "year_published"]))
        .process(&games)
        .unwrap();

    assert_eq!(recent.len(), 3);
    assert_eq!(recent.schema.fields.len(), 2);
    assert_eq!(recent.data[0].values[0], Value::String("Beta".to_string()));
}

#[test]
fn test_rating_split_filters() {
    let games = games_fixture();

    // Ratings are only comparable where they exist
    let rated = FilterProcessor::not_null("average_rating")
        .process(&games)
        .unwrap();
    assert_eq!(rated.len(), 3);

    let older = FilterProcessor::less_than_or_equal("year_published", Value::Integer(2005))
        .process(&rated)
        .unwrap();
    assert_eq!(older.len(), 2);

    let alpha = FilterProcessor::equals("name", Value::String("Alpha".to_string()))
        .process(&games)
        .unwrap();
    assert_eq!(alpha.len(), 1);
}

#[test]
fn test_csv_loader_normalizes_sentinels() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "game_id,name,year_published,average_rating,category,designer").unwrap();
    writeln!(file, "1,Alpha,2004,7.5,Strategy,John Doe").unwrap();
    writeln!(file, "2,Beta,2005,n.a.,\"Strategy,Economic\",uncredited").unwrap();
    writeln!(file, "3,Gamma,2005,6.5,Party,").unwrap();
    writeln!(file, "4,Delta,2006,8.0,Wargame,--").unwrap();
    file.flush().unwrap();

    let loaded = CsvSource::new(file.path())
        .with_schema(games_schema())
        .read()
        .unwrap();

    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded.data[0].values[0], Value::Integer(1));
    assert_eq!(loaded.data[0].values[3], Value::Float(7.5));

    // "n.a." sentinel, empty cell and "--" sentinel all load as null
    assert_eq!(loaded.data[1].values[3], Value::Null);
    assert_eq!(loaded.data[2].values[5], Value::Null);
    assert_eq!(loaded.data[3].values[5], Value::Null);

    // Quoted multi-tag cell survives as one string
    assert_eq!(
        loaded.data[1].values[4],
        Value::String("Strategy,Economic".to_string())
    );

    // Declared types carry through to the loaded schema
    board_game_analytics::utils::validate_schema(
        &loaded,
        &[
            ("game_id", DataType::Integer),
            ("average_rating", DataType::Float),
            ("category", DataType::String),
        ],
    )
    .unwrap();
}

#[test]
fn test_csv_loader_missing_file() {
    let result = CsvSource::new("does_not_exist.csv").read();
    assert!(matches!(result, Err(DataError::SourceUnavailable(_))));
}

#[test]
fn test_csv_loader_missing_declared_column() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "game_id,name").unwrap();
    writeln!(file, "1,Alpha").unwrap();
    file.flush().unwrap();

    let result = CsvSource::new(file.path()).with_schema(games_schema()).read();

    assert!(matches!(
        result,
        Err(DataError::MissingColumn(col)) if col == "year_published"
    ));
}

#[test]
fn test_csv_loader_rejects_bad_numeric_cell() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "game_id,name,year_published,average_rating,category,designer").unwrap();
    writeln!(file, "one,Alpha,2004,7.5,Strategy,John Doe").unwrap();
    file.flush().unwrap();

    let result = CsvSource::new(file.path()).with_schema(games_schema()).read();

    assert!(matches!(
        result,
        Err(DataError::TypeCoercion { column, .. }) if column == "game_id"
    ));
}

#[test]
fn test_tag_list_export() {
    let games = games_fixture();
    let expanded = Pipeline::new("tags")
        .add(FillMissingProcessor::default())
        .add(ExplodeProcessor::new("category"))
        .process(&games)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unique_category_list.txt");
    TagListSink::new(&path, "category").write(&expanded).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    // Distinct tags in first-appearance order
    assert_eq!(
        lines,
        vec![
            "Strategy",
            "Economic",
            "Negotiation",
            "Party",
            "Deduction",
            "Wargame",
        ]
    );
}

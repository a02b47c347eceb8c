// Small end-to-end demo over an inline board game table

use board_game_analytics::{
    data::{DataSet, DataType, Field, Row, Schema, Value},
    processing::{
        pct_change, DataProcessor, ExplodeProcessor, FillMissingProcessor, GroupByProcessor,
        Pipeline,
    },
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create a schema
    let schema = Schema::new(vec![
        Field::new("game_id".to_string(), DataType::Integer, false),
        Field::new("name".to_string(), DataType::String, true),
        Field::new("year_published".to_string(), DataType::Integer, true),
        Field::new("average_rating".to_string(), DataType::Float, true),
        Field::new("category".to_string(), DataType::String, true),
    ]);

    // Create a dataset
    let mut games = DataSet::new(schema);

    games.add_row(Row::new(vec![
        Value::Integer(1),
        Value::String("Caverna".to_string()),
        Value::Integer(2013),
        Value::Float(8.1),
        Value::String("Strategy,Economic".to_string()),
    ]))?;

    games.add_row(Row::new(vec![
        Value::Integer(2),
        Value::String("Codenames".to_string()),
        Value::Integer(2015),
        Value::Float(7.8),
        Value::String("Party,Deduction".to_string()),
    ]))?;

    games.add_row(Row::new(vec![
        Value::Integer(3),
        Value::String("Obscure Prototype".to_string()),
        Value::Integer(2015),
        Value::Float(6.2),
        Value::Null,
    ]))?;

    // Fill missing categories, then expand the tag lists
    let expanded = Pipeline::new("prepare")
        .add(FillMissingProcessor::new("Unknown"))
        .add(ExplodeProcessor::new("category"))
        .process(&games)?;

    println!("Expanded rows:");
    for row in &expanded.data {
        println!("  {:?}", row.values);
    }

    // Count games per category
    let counts = GroupByProcessor::new()
        .group_by("category")
        .count("count", "category")
        .process(&expanded)?;

    println!("\nGames per category:");
    for row in &counts.data {
        println!("  {:?} -> {:?}", row.values[0], row.values[1]);
    }

    // Yearly publication counts and their relative change
    let per_year = GroupByProcessor::new()
        .group_by("year_published")
        .count("count", "game_id")
        .process(&games)?;

    let counts: Vec<f64> = per_year
        .data
        .iter()
        .filter_map(|row| row.values[1].as_f64())
        .collect();

    println!("\nYearly change in publications: {:?}", pct_change(&counts));

    Ok(())
}

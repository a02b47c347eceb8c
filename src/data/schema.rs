// Fixed column schema and missing-value conventions for the board games dataset

use super::{DataType, Field, Schema};

/// Sentinel strings that the source data uses for "missing"
pub const DEFAULT_MISSING_VALUES: [&str; 6] = ["n.a.", "?", "NA", "n/a", "na", "--"];

/// Literal substituted for missing values in categorical columns
pub const DEFAULT_PLACEHOLDER: &str = "Unknown";

/// Comma-separated tag columns that get expanded into one row per tag
pub const TAG_COLUMNS: [&str; 2] = ["category", "mechanic"];

/// Schema of the board games dataset, one row per game listing.
///
/// `playing_time` duplicates `max_playtime` in the source data. The
/// redundancy is kept as-is; duplicate-column detection is expected to
/// report the pair, not repair it.
pub fn board_games_schema() -> Schema {
    Schema::new(vec![
        Field::new("game_id".to_string(), DataType::Integer, false),
        Field::new("name".to_string(), DataType::String, true),
        Field::new("description".to_string(), DataType::String, true),
        Field::new("year_published".to_string(), DataType::Integer, true),
        Field::new("min_players".to_string(), DataType::Integer, true),
        Field::new("max_players".to_string(), DataType::Integer, true),
        Field::new("playing_time".to_string(), DataType::Integer, true),
        Field::new("min_playtime".to_string(), DataType::Integer, true),
        Field::new("max_playtime".to_string(), DataType::Integer, true),
        Field::new("min_age".to_string(), DataType::Integer, true),
        Field::new("users_rated".to_string(), DataType::Integer, true),
        Field::new("average_rating".to_string(), DataType::Float, true),
        Field::new("category".to_string(), DataType::String, true),
        Field::new("mechanic".to_string(), DataType::String, true),
        Field::new("designer".to_string(), DataType::String, true),
    ])
}

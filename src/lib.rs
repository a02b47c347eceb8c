//! # Board Game Analytics
//!
//! A one-shot data preparation and aggregation pipeline for the
//! BoardGameGeek dataset.
//!
//! ## Features
//!
//! - CSV loading with sentinel-aware missing value handling and schema-driven
//!   type coercion
//! - Dataset profiling: shape, null counts, numeric and categorical
//!   summaries, duplicate row and duplicate column detection
//! - Missing-value substitution in categorical columns
//! - Expansion of comma-separated tag columns into one row per tag
//! - Group-by aggregation with percentage-change and additive cumulative
//!   growth derivation
//! - CSV and plain-text exports for downstream chart and word-cloud
//!   consumers
//!
//! ## Example
//!
//! ```rust
//! use board_game_analytics::{
//!     data::{DataSet, DataType, Field, Row, Schema, Value},
//!     processing::{DataProcessor, ExplodeProcessor, FillMissingProcessor, Pipeline},
//! };
//!
//! // A tiny table with one multi-valued category cell and one missing cell
//! let schema = Schema::new(vec![
//!     Field::new("game_id".to_string(), DataType::Integer, false),
//!     Field::new("category".to_string(), DataType::String, true),
//! ]);
//!
//! let mut games = DataSet::new(schema);
//! games.add_row(Row::new(vec![
//!     Value::Integer(1),
//!     Value::String("Strategy,Economic".to_string()),
//! ])).unwrap();
//! games.add_row(Row::new(vec![Value::Integer(2), Value::Null])).unwrap();
//!
//! // Fill missing categories, then expand tags into one row per tag
//! let pipeline = Pipeline::new("prepare")
//!     .add(FillMissingProcessor::new("Unknown"))
//!     .add(ExplodeProcessor::new("category"));
//!
//! let expanded = pipeline.process(&games).unwrap();
//! assert_eq!(expanded.len(), 3);
//! ```

pub mod data;
pub mod processing;
pub mod utils;

// Re-export main types
pub use data::{DataSet, DataType, Field, Row, Schema, Value};
pub use processing::Pipeline;
pub use utils::Config;

// Board Game Analytics - Main executable

use std::fs;
use std::path::Path;

use clap::{Arg, Command};
use log::{error, info};

use board_game_analytics::{
    data::{
        board_games_schema, CsvSink, CsvSource, DataSet, DataSink, DataSource, DataType,
        TagListSink, Value,
    },
    processing::{
        profile, split_mean, AddColumnTransform, DataProcessor, ExplodeProcessor,
        FillMissingProcessor, FilterProcessor, GroupByProcessor, PctChangeTransform, Pipeline,
        SelectTransform, SortProcessor,
    },
    utils::{init_logging, require_columns, AppResult, Config},
};

fn main() -> anyhow::Result<()> {
    let matches = Command::new("board-game-analytics")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Data preparation and yearly trend aggregation for the BoardGameGeek dataset")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .subcommand(
            Command::new("report")
                .about("Run the preparation pipeline and write the derived tables")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("CSV")
                        .help("Sets the input dataset path")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("out-dir")
                        .short('o')
                        .long("out-dir")
                        .value_name("DIR")
                        .help("Sets the output directory for derived tables")
                        .takes_value(true),
                ),
        )
        .get_matches();

    // Load configuration
    let mut config = if let Some(config_path) = matches.value_of("config") {
        match Config::from_file(config_path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error loading config file: {}", err);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Initialize logging
    if let Err(err) = init_logging(config.log_level_filter()) {
        eprintln!("Error initializing logger: {}", err);
    }

    if let Some(matches) = matches.subcommand_matches("report") {
        // Override config with command line arguments
        if let Some(input) = matches.value_of("input") {
            config.input.path = input.to_string();
        }
        if let Some(out_dir) = matches.value_of("out-dir") {
            config.export.out_dir = out_dir.to_string();
        }

        if let Err(err) = run_report(&config) {
            error!("Report aborted: {}", err);
            return Err(err.into());
        }
    } else {
        println!("No subcommand specified. Use --help for usage information.");
    }

    Ok(())
}

/// Run the whole preparation pipeline: load, profile, clean, expand tags,
/// aggregate per year, and write the derived tables.
fn run_report(config: &Config) -> AppResult<()> {
    let out_dir = Path::new(&config.export.out_dir);
    fs::create_dir_all(out_dir)?;

    // Load
    let source = CsvSource::new(&config.input.path)
        .with_delimiter(config.input.delimiter)
        .with_missing_values(config.input.missing_values.iter().cloned())
        .with_schema(board_games_schema());
    let games = source.read()?;
    info!(
        "Loaded {} rows x {} columns from {}",
        games.len(),
        games.schema.fields.len(),
        config.input.path
    );

    // Profile
    let data_profile = profile(&games);
    info!(
        "Profile: {} duplicate rows, duplicate column pairs: {:?}",
        data_profile.duplicate_rows, data_profile.duplicate_columns
    );
    let profile_json = serde_json::to_string_pretty(&data_profile)?;
    fs::write(out_dir.join("profile.json"), profile_json)?;

    // Clean
    let cleaned = FillMissingProcessor::new(&config.cleaning.placeholder).process(&games)?;
    let filled: usize = data_profile
        .null_counts
        .iter()
        .filter(|c| {
            cleaned
                .schema
                .get_field_by_name(&c.column)
                .map(|f| f.data_type == DataType::String)
                .unwrap_or(false)
        })
        .map(|c| c.nulls)
        .sum();
    info!(
        "Filled {} missing categorical values with '{}'",
        filled, config.cleaning.placeholder
    );

    // Expand each tag column and export its counts and distinct-tag list
    for column in &config.tags.columns {
        let expanded = ExplodeProcessor::new(column).process(&cleaned)?;
        info!(
            "Expanded '{}': {} rows -> {} rows",
            column,
            cleaned.len(),
            expanded.len()
        );

        TagListSink::new(out_dir.join(format!("unique_{}_list.txt", column)), column)
            .write(&expanded)?;

        let counts = Pipeline::new("tag_counts")
            .add(GroupByProcessor::new().group_by(column).count("count", column))
            .add(SortProcessor::descending("count"))
            .process(&expanded)?;
        write_csv(&counts, &out_dir.join(format!("{}_counts.csv", column)))?;
    }

    // Mean rating per publication year
    let key = config.aggregation.key.as_str();
    let rating = config.aggregation.rating_column.as_str();
    require_columns(&cleaned, &[key, rating])?;

    let yearly_rating = Pipeline::new("yearly_rating")
        .add(SelectTransform::new([key, rating]))
        .add(GroupByProcessor::new().group_by(key).mean(rating, rating))
        .process(&cleaned)?;
    info!("Yearly mean rating: {} groups", yearly_rating.len());
    write_csv(&yearly_rating, &out_dir.join("year_avg_rating.csv"))?;

    // Mean rating on either side of the era boundary
    let era_rating = split_mean(&cleaned, key, rating, config.aggregation.era_split_year)?;
    info!(
        "Mean rating split at {}: {:?} vs {:?}",
        config.aggregation.era_split_year,
        era_rating.data[0].values[1],
        era_rating.data[1].values[1]
    );
    write_csv(&era_rating, &out_dir.join("rating_by_era.csv"))?;

    // Games published per year with period-over-period change. Each row of
    // the raw table is one game listing, so a constant count column summed
    // per year gives the publication counts.
    let games_per_year = Pipeline::new("games_per_year")
        .add(AddColumnTransform::with_constant(
            "count",
            DataType::Integer,
            false,
            Value::Integer(1),
        ))
        .add(SelectTransform::new([key, "count"]))
        .add(GroupByProcessor::new().group_by(key).sum("count", "count"))
        .add(PctChangeTransform::new("count").with_cumulative("cum_change"))
        .process(&games)?;
    info!("Games per year: {} groups", games_per_year.len());
    write_csv(&games_per_year, &out_dir.join("games_per_year.csv"))?;

    // Recent games with both tag columns expanded
    let mut recent_tags = Pipeline::new("recent_tags");
    for column in &config.tags.columns {
        recent_tags = recent_tags.add(ExplodeProcessor::new(column));
    }
    let mut select_columns = vec![key.to_string()];
    select_columns.extend(config.tags.columns.iter().cloned());
    let recent = recent_tags
        .add(FilterProcessor::greater_than(
            key,
            Value::Integer(config.aggregation.recent_year_floor),
        ))
        .add(SelectTransform::new(select_columns))
        .process(&cleaned)?;
    info!(
        "Recent tag rows (year > {}): {}",
        config.aggregation.recent_year_floor,
        recent.len()
    );
    write_csv(&recent, &out_dir.join("recent_tags.csv"))?;

    info!("Report written to {}", out_dir.display());

    Ok(())
}

fn write_csv(data: &DataSet, path: &Path) -> AppResult<()> {
    CsvSink::new(path).write(data)?;
    Ok(())
}

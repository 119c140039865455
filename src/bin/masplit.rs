//! masplit - split matrices of delimited strings
//!
//! Command-line interface for turning delimited cell matrices (e.g. allelic
//! depths) into numeric matrices.

use clap::{Parser, Subcommand, ValueEnum};
use masplit::data::{missing_markers, CellMatrix};
use masplit::error::Result;
use masplit::profile::profile_records;
use masplit::split::{masplit, ParseFailure, SortOrder, SplitConfig, SplitMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// CLI-friendly sort order
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOrder {
    /// Largest value first
    Decreasing,
    /// Smallest value first
    Increasing,
}

impl From<CliOrder> for SortOrder {
    fn from(order: CliOrder) -> Self {
        match order {
            CliOrder::Decreasing => SortOrder::Decreasing,
            CliOrder::Increasing => SortOrder::Increasing,
        }
    }
}

/// CLI-friendly handling of unparseable records
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliParseFailure {
    /// Replace the record with 0
    Zero,
    /// Remove the record from the cell
    Drop,
    /// Make the whole cell missing
    Missing,
}

impl From<CliParseFailure> for ParseFailure {
    fn from(policy: CliParseFailure) -> Self {
        match policy {
            CliParseFailure::Zero => ParseFailure::Zero,
            CliParseFailure::Drop => ParseFailure::Drop,
            CliParseFailure::Missing => ParseFailure::Missing,
        }
    }
}

/// Split matrices of delimited strings
#[derive(Parser)]
#[command(name = "masplit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a TSV matrix of delimited cells into a numeric matrix
    Split {
        /// Path to the cell matrix TSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the numeric TSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Split configuration YAML; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Character separating records within a cell
        #[arg(short, long)]
        delim: Option<char>,

        /// Return the number of records per cell
        #[arg(long)]
        count: bool,

        /// 1-based record to return
        #[arg(short, long, allow_hyphen_values = true)]
        record: Option<i64>,

        /// Keep records in their original order
        #[arg(long)]
        no_sort: bool,

        /// Sort records in this order before selecting one
        #[arg(long, value_enum, conflicts_with = "no_sort")]
        order: Option<CliOrder>,

        /// Handling of records that are not numbers
        #[arg(long, value_enum)]
        on_parse_error: Option<CliParseFailure>,

        /// Extra cell value treated as missing, in addition to NA (repeatable)
        #[arg(long = "na")]
        na: Vec<String>,
    },

    /// Profile the record counts of a cell matrix
    Profile {
        /// Path to the cell matrix TSV
        #[arg(short, long)]
        input: PathBuf,

        /// Character separating records within a cell
        #[arg(short, long, default_value = ",")]
        delim: char,

        /// Extra cell value treated as missing, in addition to NA (repeatable)
        #[arg(long = "na")]
        na: Vec<String>,

        /// Output format: text, json, or yaml
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Generate an example split configuration
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "masplit.yaml")]
        output: PathBuf,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Split {
            input,
            output,
            config,
            delim,
            count,
            record,
            no_sort,
            order,
            on_parse_error,
            na,
        } => {
            let overrides = Overrides {
                delim,
                count,
                record,
                no_sort,
                order: order.map(SortOrder::from),
                on_parse_error: on_parse_error.map(ParseFailure::from),
            };
            cmd_split(&input, output.as_ref(), config.as_ref(), overrides, &na)
        }

        Commands::Profile {
            input,
            delim,
            na,
            format,
        } => cmd_profile(&input, delim, &na, &format),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        if e.is_config_error() {
            eprintln!("Configuration error: {}", e);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Command-line settings layered over the configuration file.
struct Overrides {
    delim: Option<char>,
    count: bool,
    record: Option<i64>,
    no_sort: bool,
    order: Option<SortOrder>,
    on_parse_error: Option<ParseFailure>,
}

impl Overrides {
    fn apply(self, mut config: SplitConfig) -> SplitConfig {
        if let Some(delim) = self.delim {
            config.delimiter = delim;
        }
        if let Some(record) = self.record {
            config.record = record;
        }
        if self.count {
            config.mode = SplitMode::Count;
        }
        if self.no_sort {
            config.sort = false;
        }
        if let Some(order) = self.order {
            config = config.sorted(order);
        }
        if let Some(policy) = self.on_parse_error {
            config.on_parse_error = policy;
        }
        config
    }
}

/// Split a cell matrix
fn cmd_split(
    input_path: &PathBuf,
    output_path: Option<&PathBuf>,
    config_path: Option<&PathBuf>,
    overrides: Overrides,
    na: &[String],
) -> Result<()> {
    let base = match config_path {
        Some(path) => {
            eprintln!("Loading split configuration from {:?}...", path);
            SplitConfig::from_yaml(&std::fs::read_to_string(path)?)?
        }
        None => SplitConfig::default(),
    };
    let config = overrides.apply(base);

    eprintln!("Loading cells from {:?}...", input_path);
    let cells = CellMatrix::from_tsv_with_missing(input_path, &missing_markers(na))?;
    eprintln!(
        "Loaded {} rows x {} columns ({} missing)",
        cells.n_rows(),
        cells.n_cols(),
        cells.n_missing()
    );

    match config.mode {
        SplitMode::Count => eprintln!("Counting records (delimiter '{}')...", config.delimiter),
        SplitMode::Select => eprintln!(
            "Selecting record {} (delimiter '{}', {})...",
            config.record,
            config.delimiter,
            if config.sort {
                format!("sorted {:?}", config.order).to_lowercase()
            } else {
                "unsorted".to_string()
            }
        ),
    }
    let result = masplit(&cells, &config)?;

    match output_path {
        Some(path) => {
            eprintln!("Writing results to {:?}...", path);
            result.to_tsv(path)?;
        }
        None => result.to_writer(std::io::stdout().lock())?,
    }

    eprintln!("Done! {} missing values in output", result.n_missing());
    Ok(())
}

/// Profile a cell matrix
fn cmd_profile(input_path: &PathBuf, delim: char, na: &[String], format: &str) -> Result<()> {
    let cells = CellMatrix::from_tsv_with_missing(input_path, &missing_markers(na))?;
    let profile = profile_records(&cells, delim);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&profile)?),
        "yaml" => print!("{}", serde_yaml::to_string(&profile)?),
        _ => print!("{}", profile),
    }

    Ok(())
}

/// Generate an example configuration
fn cmd_example(output_path: &PathBuf) -> Result<()> {
    let config = SplitConfig::default();

    let mut yaml = String::new();
    yaml.push_str("# masplit configuration\n");
    yaml.push_str("# mode: select | count\n");
    yaml.push_str("# order: decreasing | increasing\n");
    yaml.push_str("# on_parse_error: zero | drop | missing\n");
    yaml.push_str(&config.to_yaml()?);

    std::fs::write(output_path, yaml)?;
    eprintln!("Example configuration written to {:?}", output_path);

    Ok(())
}

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use forest_cover_analyzer::{
    analysis::{ModelKind, TopDirection, FIRST_YEAR, LAST_YEAR},
    io,
    visualization::{
        print_metrics_table, print_series_chart, print_series_table, print_snapshot_table,
        print_top_table,
    },
    CountryTimeSeries, CsvSource, DataContext, ForestError, PredictionService, Settings,
};

/// Exit status for mistakes in the request: unknown country, year out of range, bad input.
const EXIT_CLIENT_ERROR: u8 = 2;
/// Exit status for faults in the data files, settings or environment.
const EXIT_SERVER_ERROR: u8 = 1;

#[derive(Parser)]
#[command(
    name = "forest-cover",
    about = "Forest Cover Analyzer - country forest cover trends, 2000 to 2075",
    version,
    author
)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot table CSV (overrides the settings file)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Long-range prediction table CSV (overrides the settings file)
    #[arg(long, global = true)]
    long_range: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every country in the snapshot table
    Countries,

    /// Show the 2000/2010 snapshot of one country
    Snapshot {
        country: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rank countries by forest loss or gain between 2000 and 2010
    Top {
        /// Number of countries to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Ranking direction: loss or gain
        #[arg(short, long, default_value = "loss")]
        direction: TopDirection,
    },

    /// Show the classified forest cover series of one country
    Series {
        country: String,

        /// First year (inclusive)
        #[arg(long, default_value_t = FIRST_YEAR)]
        start: i32,

        /// Last year (inclusive)
        #[arg(long, default_value_t = LAST_YEAR)]
        end: i32,

        /// Show a bar chart after the table
        #[arg(long)]
        chart: bool,

        /// Export the series to a .csv or .json file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the forest cover of one country in one year
    Year { country: String, year: i32 },

    /// Predict 2010 forest cover from 2000 cover and land area
    Predict {
        /// Forest cover in 2000 (percent)
        #[arg(long = "forest-2000")]
        forest_2000: f64,

        /// Land area (km²)
        #[arg(long)]
        area: f64,

        /// Model: linear_regression or mean_change
        #[arg(short, long)]
        model: Option<ModelKind>,
    },

    /// Show predictor goodness of fit on the training data
    Performance,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(path) = &cli.snapshot {
        settings.data.snapshot_path = Some(path.clone());
    }
    if let Some(path) = &cli.long_range {
        settings.data.long_range_path = Some(path.clone());
    }
    Ok(settings)
}

fn open_context(settings: &Settings) -> Result<DataContext> {
    let Some(snapshot_path) = settings.data.snapshot_path.clone() else {
        anyhow::bail!("No snapshot table: pass --snapshot or set data.snapshot_path in --config");
    };
    let source = CsvSource::new(snapshot_path, settings.data.long_range_path.clone());
    Ok(DataContext::new(source, settings.interpolation.clone())?)
}

fn export_series(series: &CountryTimeSeries, output: &Path) -> Result<()> {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => io::write_series_csv(series, output)?,
        "json" => io::write_json(series, output, true)?,
        _ => {
            return Err(ForestError::ValidationError(format!(
                "Unsupported output format: .{ext}. Use .csv or .json"
            ))
            .into())
        }
    }

    println!(
        "{} Wrote {} years to {}",
        "Success:".green().bold(),
        series.len(),
        output.display()
    );
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ForestError>() {
        Some(e) if e.is_client_error() => EXIT_CLIENT_ERROR,
        _ => EXIT_SERVER_ERROR,
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "Error:".red().bold());
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    let context = open_context(&settings)?;

    match cli.command {
        Commands::Countries => {
            let analyzer = context.analyzer()?;
            for country in analyzer.countries() {
                println!("{country}");
            }
        }

        Commands::Snapshot { country, json } => {
            let snapshot = context.analyzer()?.get_snapshot(&country)?;
            if json {
                println!("{}", io::to_json(&snapshot, true)?);
            } else {
                print_snapshot_table(&snapshot);
                println!();
            }
        }

        Commands::Top { count, direction } => {
            let top = context.analyzer()?.get_top(count, direction);
            print_top_table(&top, direction);
            println!();
        }

        Commands::Series {
            country,
            start,
            end,
            chart,
            output,
        } => {
            let series = context.analyzer()?.get_series(&country, start, end)?;
            if !context.dataset()?.has_long_range() && end > settings.interpolation.horizon_end {
                eprintln!(
                    "{}: no long-range table loaded, series ends at {}",
                    "Warning".yellow(),
                    settings.interpolation.horizon_end
                );
            }
            print_series_table(&series);
            println!();
            if chart {
                print_series_chart(&series);
            }
            if let Some(path) = output {
                export_series(&series, &path)?;
            }
        }

        Commands::Year { country, year } => {
            let entry = context.analyzer()?.get_year(&country, year)?;
            println!(
                "{} {}: {:.2}% forest cover ({}), {:.1} km² of forest",
                country.bold(),
                entry.year,
                entry.forest_cover_percent,
                entry.data_type,
                entry.forest_area_km2
            );
        }

        Commands::Predict {
            forest_2000,
            area,
            model,
        } => {
            let model = model.unwrap_or(settings.predictor.default_model);
            let service: PredictionService = PredictionService::default();
            let predicted = service.predict(&context, forest_2000, area, model)?;
            println!(
                "Predicted 2010 forest cover ({model}): {}",
                format!("{predicted:.2}%").bold()
            );
        }

        Commands::Performance => {
            let service: PredictionService = PredictionService::default();
            let metrics = service.metrics(&context)?;
            print_metrics_table(&metrics);
            println!();
        }
    }

    Ok(())
}

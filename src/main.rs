//! CLI entry point for the NYC trends scraper.
//!
//! Provides subcommands for rebuilding the StreetEasy housing-index CSV
//! and the Times Square pedestrian-counts CSV from their public sources.

use anyhow::Result;
use clap::{Parser, Subcommand};
use nyc_trends::{
    archive::read_first_csv,
    chart::{chart_table, parse_payload},
    fetch::{BasicClient, fetch_bytes, fetch_text_with_retry},
    housing, output, pedestrian,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// StreetEasy publishes each index as a ZIP holding one wide CSV.
const SALES_URL: &str = "https://cdn-charts.streeteasy.com/sales/All/priceIndex_All.zip";
const RENTALS_URL: &str = "https://cdn-charts.streeteasy.com/rentals/All/rentalIndex_All.zip";

/// Infogram page embedding the Times Square pedestrian counts chart.
const PEDESTRIAN_URL: &str = "https://e.infogram.com/4f23de5e-61de-4702-96f8-ab86d5e8bb2b";

/// Download attempts for the pedestrian page before giving up.
const FETCH_ATTEMPTS: u32 = 3;

#[derive(Parser)]
#[command(name = "nyc_trends")]
#[command(about = "Rebuilds NYC housing and pedestrian trend CSVs from public sources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the StreetEasy sales and rental indices and write the combined CSV
    HousingIndex {
        /// CSV file to write
        #[arg(short, long, default_value = "data/streeteasy_index.csv")]
        output: String,

        /// Sales index ZIP: URL or local file path
        #[arg(long, default_value = SALES_URL)]
        sales: String,

        /// Rental index ZIP: URL or local file path
        #[arg(long, default_value = RENTALS_URL)]
        rentals: String,
    },
    /// Fetch the Times Square pedestrian counts and write the CSV
    Pedestrian {
        /// CSV file to write
        #[arg(short, long, default_value = "data/timessquare_pedestrian.csv")]
        output: String,

        /// Counts page: URL or local file path
        #[arg(long, default_value = PEDESTRIAN_URL)]
        source: String,

        /// Emit the plain Month,Count schema instead of the baseline comparison
        #[arg(long, default_value_t = false)]
        counts_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/nyc_trends.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("nyc_trends.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::HousingIndex {
            output,
            sales,
            rentals,
        } => run_housing_index(&output, &sales, &rentals).await,
        Commands::Pedestrian {
            output,
            source,
            counts_only,
        } => run_pedestrian(&output, &source, counts_only).await,
    }
}

/// Downloads both index datasets, reshapes and joins them, and writes the
/// combined CSV.
#[tracing::instrument(skip_all, fields(output))]
async fn run_housing_index(output: &str, sales: &str, rentals: &str) -> Result<()> {
    let client = BasicClient::new();

    info!(source = sales, "Downloading sales index");
    let sales_table = read_first_csv(&source_bytes(&client, sales).await?)?;

    info!(source = rentals, "Downloading rental index");
    let rentals_table = read_first_csv(&source_bytes(&client, rentals).await?)?;

    info!("Transforming data");
    let sales_long = housing::reshape::to_long(&sales_table)?;
    let rentals_long = housing::reshape::to_long(&rentals_table)?;
    let records = housing::merge::outer_join(sales_long, rentals_long);

    output::write_records(output, &records)
}

/// Downloads the counts page, extracts the embedded chart, and writes the
/// pedestrian CSV in the selected schema.
#[tracing::instrument(skip_all, fields(output, counts_only))]
async fn run_pedestrian(output: &str, source: &str, counts_only: bool) -> Result<()> {
    let client = BasicClient::new();

    info!(source, "Downloading pedestrian counts page");
    let html = source_text(&client, source).await?;

    info!("Extracting chart data");
    let payload = parse_payload(&html)?;
    let table = chart_table(&payload)?;

    info!("Transforming data");
    let observations = pedestrian::reshape::observations(&table)?;

    if counts_only {
        let records = pedestrian::reshape::count_records(observations);
        output::write_records(output, &records)
    } else {
        let records = pedestrian::reshape::baseline_records(observations);
        output::write_records(output, &records)
    }
}

/// Loads source data from a local file path or fetches it over HTTP.
async fn source_bytes(client: &BasicClient, source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http") {
        fetch_bytes(client, source).await
    } else {
        Ok(std::fs::read(source)?)
    }
}

/// Same as [`source_bytes`] but for text pages, with the bounded retry the
/// counts page occasionally needs.
async fn source_text(client: &BasicClient, source: &str) -> Result<String> {
    if source.starts_with("http") {
        fetch_text_with_retry(client, source, FETCH_ATTEMPTS).await
    } else {
        Ok(std::fs::read_to_string(source)?)
    }
}

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;

use access_report::dataset::Dataset;
use access_report::report::{self, ReportMeta};
use access_report::summary::{self, SummaryFigures};
use access_report::{metrics, ReportError};

/// Builds the county health access PDF report from a metrics CSV.
///
/// Fonts must be present under `assets/fonts` in the repository or provided
/// via the `ACCESS_REPORT_FONTS_DIR` environment variable before rendering.
#[derive(Parser)]
#[command(author, version, about = "County health access report generator")]
struct Cli {
    /// Increases log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the PDF report from a county CSV.
    Render {
        /// Input CSV with one row per county.
        input: PathBuf,

        /// Output PDF path.
        #[arg(short, long, default_value = "health_access_report.pdf")]
        output: PathBuf,

        /// Fixes the cover date (YYYY-MM-DD); defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Attaches a PDF outline with one bookmark per section.
        #[arg(long)]
        outline: bool,
    },

    /// Print the derived summary for a county CSV without rendering.
    Inspect {
        /// Input CSV with one row per county.
        input: PathBuf,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|err| err.to_string())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            date,
            outline,
        } => render(&input, &output, date, outline),
        Commands::Inspect { input } => inspect(&input),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(&err);
        std::process::exit(1);
    }
}

fn load_enriched(input: &Path) -> Result<Dataset, ReportError> {
    let mut data = Dataset::from_path(input)?;
    info!("loaded {} counties from {}", data.len(), input.display());
    metrics::enrich(&mut data);
    Ok(data)
}

fn render(
    input: &Path,
    output: &Path,
    date: Option<NaiveDate>,
    outline: bool,
) -> Result<(), ReportError> {
    let data = load_enriched(input)?;
    let meta = match date {
        Some(generated_on) => ReportMeta::new(generated_on),
        None => ReportMeta::today(),
    };

    let rendered = if outline {
        report::render_report_with_bookmarks(&data, &meta)?
    } else {
        report::render_report(&data, &meta)?
    };
    rendered.save(output)?;
    println!(
        "Generated {} ({} bytes)",
        output.display(),
        rendered.bytes.len()
    );
    Ok(())
}

fn inspect(input: &Path) -> Result<(), ReportError> {
    let data = load_enriched(input)?;
    let figures = SummaryFigures::compute(&data);

    println!(
        "Counties: {}",
        summary::format_count(figures.total_counties as u64)
    );
    println!(
        "Without clinics: {} ({:.1}%)",
        summary::format_count(figures.counties_without_clinics as u64),
        figures.share_without_clinics()
    );
    println!(
        "Total clinics: {}",
        summary::format_count(figures.total_clinics.round().max(0.0) as u64)
    );
    println!(
        "Mean SVI, no clinics vs with: {} vs {}",
        summary::format_opt(figures.svi_overall.without_clinics, 3),
        summary::format_opt(figures.svi_overall.with_clinics, 3)
    );
    println!(
        "Mean health burden, no clinics vs with: {} vs {}",
        summary::format_opt(figures.health_burden.without_clinics, 2),
        summary::format_opt(figures.health_burden.with_clinics, 2)
    );

    let ranked = metrics::top_underserved(&data, 5);
    if !ranked.is_empty() {
        println!("Most underserved counties:");
        for (i, row) in ranked.iter().enumerate() {
            println!(
                "  {}. {}, {} (gap {})",
                i + 1,
                row.county,
                row.state,
                summary::format_opt(row.pop_adjusted_gap, 0)
            );
        }
    }

    println!("Report sections:");
    for title in report::plan_sections(&data) {
        println!("  - {title}");
    }
    Ok(())
}

fn print_error_sources(error: &(dyn Error + 'static)) {
    let mut error = error;
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}

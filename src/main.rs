//! CLI entry point for the ridership explorer.
//!
//! Provides one subcommand per analysis view, a dataset preview, and an
//! interactive session that re-renders the current view after every input.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ridership_explorer::{
    charts::render_charts,
    dashboard::{self, Mode, Report, ViewState},
    output::{
        OutputFormat, PREVIEW_ROWS, export_csv, write_preview, write_report_json,
        write_report_table,
    },
    parser::load_dataset,
    record::Dataset,
    session::run_session,
};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ridership_explorer")]
#[command(about = "Explore daily subway boarding/alighting counts", long_about = None)]
struct Cli {
    /// Ridership CSV file (plain or .gz)
    #[arg(
        short,
        long,
        env = "RIDERSHIP_DATA",
        default_value = "subway.csv",
        global = true
    )]
    data: PathBuf,

    /// How tables are written
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Directory for SVG charts and CSV exports
    #[arg(short, long, default_value = "charts", global = true)]
    out_dir: PathBuf,

    /// Skip writing SVG charts
    #[arg(long, default_value_t = false, global = true)]
    no_charts: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the first rows of the dataset
    Preview {
        /// Number of rows to show
        #[arg(short, long, default_value_t = PREVIEW_ROWS)]
        rows: usize,
    },
    /// Per-line totals and means, top lines, optional line search
    Lines {
        /// Case-sensitive substring of the line name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Top stations by mean boarding, optional station search with peak day
    Stations {
        /// Case-sensitive substring of the station name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Daily totals, weekday means and one line's daily totals
    Trend {
        /// Line to plot (defaults to the first line name)
        #[arg(short, long)]
        line: Option<String>,
    },
    /// List the distinct line names, sorted
    LineNames,
    /// Interactive session over a single loaded dataset
    Explore {
        /// View to start in
        #[arg(short, long, value_enum, default_value_t = Mode::Lines)]
        mode: Mode,
    },
}

/// Where and how a computed report is written.
struct RenderOptions {
    format: OutputFormat,
    out_dir: PathBuf,
    charts: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/ridership_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ridership_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let dataset = load_dataset(&cli.data)?;
    let options = RenderOptions {
        format: cli.format,
        out_dir: cli.out_dir,
        charts: !cli.no_charts,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Preview { rows } => preview(&mut out, &dataset, rows, options.format)?,
        Commands::LineNames => {
            for name in dataset.line_names() {
                writeln!(out, "{name}")?;
            }
        }
        Commands::Lines { search } => {
            let state = ViewState::new(Mode::Lines).with_search(search);
            show(&mut out, &dataset, &state, &options)?;
        }
        Commands::Stations { search } => {
            let state = ViewState::new(Mode::Stations).with_search(search);
            show(&mut out, &dataset, &state, &options)?;
        }
        Commands::Trend { line } => {
            let state = ViewState::new(Mode::Trend).with_selected_line(line);
            show(&mut out, &dataset, &state, &options)?;
        }
        Commands::Explore { mode } => {
            let stdin = std::io::stdin();
            run_session(
                &dataset,
                ViewState::new(mode),
                stdin.lock(),
                &mut out,
                |out, report| render(out, &dataset, report, &options),
            )?;
        }
    }

    Ok(())
}

/// Writes the first `rows` records in the requested format.
fn preview<W: Write>(out: &mut W, dataset: &Dataset, rows: usize, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => write_preview(out, dataset, rows)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, dataset.head(rows))?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            for record in dataset.head(rows) {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

/// Computes one view and writes it.
#[tracing::instrument(skip_all, fields(mode = %state.mode))]
fn show<W: Write>(
    out: &mut W,
    dataset: &Dataset,
    state: &ViewState,
    options: &RenderOptions,
) -> Result<()> {
    let report = dashboard::run(dataset, state);
    render(out, dataset, &report, options)
}

fn render<W: Write>(
    out: &mut W,
    dataset: &Dataset,
    report: &Report,
    options: &RenderOptions,
) -> Result<()> {
    match options.format {
        OutputFormat::Table => {
            write_preview(out, dataset, PREVIEW_ROWS)?;
            write_report_table(out, report)?;
        }
        OutputFormat::Json => write_report_json(out, report)?,
        OutputFormat::Csv => {
            for path in export_csv(&options.out_dir, report)? {
                writeln!(out, "table: {}", path.display())?;
            }
        }
    }

    if options.charts {
        for path in render_charts(&options.out_dir, report)? {
            debug!(path = %path.display(), "Chart ready");
            writeln!(out, "chart: {}", path.display())?;
        }
    } else {
        info!("Chart rendering disabled");
    }

    out.flush()?;
    Ok(())
}

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use logpane_logs::{EventParser, LogBuffer, LogLevel, MessageFilter};

mod config;
mod output;

use config::{FileConfig, Overrides, resolve_data_source};

/// Logpane - filter log message events by severity and text
#[derive(Parser, Debug)]
#[command(name = "logpane")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Newline-delimited event file (reads stdin when omitted or "-")
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Minimum severity, as a level name or primary value
    #[arg(short = 'l', long, value_parser = parse_min_level)]
    min_level: Option<i32>,

    /// Case-insensitive search term (repeatable, any term matches)
    #[arg(short, long = "search", value_name = "TERM")]
    search: Vec<String>,

    /// Data source id that determines the severity scale
    #[arg(short, long = "data-source", value_name = "ID")]
    data_source: Option<String>,

    /// TOML config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Buffer size for log events
    #[arg(long)]
    buffer_size: Option<usize>,

    /// Print events as newline-delimited JSON
    #[arg(long)]
    json: bool,

    /// Print per-level counts to stderr
    #[arg(long)]
    counts: bool,
}

/// Accept `warn`, `ERROR`, `3`, ...
fn parse_min_level(s: &str) -> Result<i32, String> {
    if let Ok(value) = s.trim().parse::<i32>() {
        return Ok(value);
    }
    match LogLevel::from_str(s) {
        LogLevel::Unknown if !s.trim().eq_ignore_ascii_case("unknown") => {
            Err(format!("unknown log level '{}'", s))
        }
        level => Ok(level.value()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing for debugging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = run(args);

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

fn run(args: Args) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let mut settings = file_config.merge(Overrides {
        min_log_level: args.min_level,
        search_terms: args.search,
        data_source_id: args.data_source,
        buffer_size: args.buffer_size,
    });
    tracing::debug!(?settings, "resolved settings");

    let parser = EventParser::new().with_default_data_source(settings.filter.data_source_id.clone());
    let summary = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            parser.parse_reader(BufReader::new(file))?
        }
        _ => parser.parse_reader(io::stdin().lock())?,
    };
    if summary.skipped > 0 {
        tracing::warn!("skipped {} unparseable lines", summary.skipped);
    }

    let buffer = LogBuffer::new(settings.buffer_size);
    buffer.extend(summary.events);
    let events = buffer.all();
    resolve_data_source(&mut settings.filter, &events)?;

    let filtered = MessageFilter::new().filter(&events, &settings.filter);
    tracing::debug!(
        total = events.len(),
        shown = filtered.len(),
        unfiltered = filtered.is_unfiltered(),
        "filter applied"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.json {
        output::write_json(&mut out, filtered.iter())?;
    } else {
        output::write_text(&mut out, filtered.iter())?;
    }
    out.flush()?;

    if args.counts {
        eprintln!("{}", output::format_counts(&buffer.level_counts()));
    }

    Ok(())
}

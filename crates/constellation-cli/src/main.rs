//! Command-line renderer for the skill constellation.
//!
//! Loads a data snapshot (JSON) and an optional `constellation.yaml`, runs
//! the placement pipeline for one viewport and time cursor, and prints the
//! composed scene as JSON or as a geometry-only SVG document.
//!
//! # Startup Sequence
//!
//! 1. Parse arguments
//! 2. Load configuration (`--config`, else `constellation.yaml` if present,
//!    else defaults)
//! 3. Initialize structured logging from `logging` (`RUST_LOG` wins)
//! 4. Load the snapshot and build the view
//! 5. Move the time cursor to `--at`
//! 6. Print the scene

mod error;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use constellation_core::config::{JitterMode, LoggingConfig};
use constellation_core::{ConstellationConfig, ConstellationView, SvgRenderer, draw_scene};
use constellation_types::{Dimensions, Snapshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Config file looked up in the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "constellation.yaml";

/// Render a skill constellation snapshot.
#[derive(Debug, Parser)]
#[command(name = "constellation")]
#[command(version)]
#[command(about = "Lay out a skill constellation and print the scene as JSON or SVG")]
struct Cli {
    /// Snapshot JSON with `pillars` and `satellites`.
    #[arg(long)]
    snapshot: PathBuf,

    /// Configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Time cursor (RFC 3339). Defaults to now, which shows everything.
    #[arg(long)]
    at: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Seed the satellite push jitter for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Include the star field and satellite bob in SVG output.
    #[arg(long)]
    ambient: bool,
}

/// What to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// The composed scene as JSON.
    Json,
    /// A geometry-only SVG document.
    Svg,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the config or snapshot cannot be loaded, `--at` is
/// malformed, or the scene cannot be serialized.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);
    info!(
        jitter = ?config.layout.jitter,
        relayout = ?config.timeline.relayout,
        "Configuration loaded"
    );

    if let Some(seed) = cli.seed {
        config.layout.jitter = JitterMode::Seeded;
        config.layout.jitter_seed = seed;
    }

    let snapshot = load_snapshot(&cli.snapshot)?;
    let output = render(&cli, config, snapshot, Utc::now())?;
    println!("{output}");
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load the configuration from `path`, or from `constellation.yaml` in the
/// working directory if it exists, or fall back to defaults.
fn load_config(path: Option<&Path>) -> Result<ConstellationConfig, CliError> {
    if let Some(path) = path {
        return Ok(ConstellationConfig::from_file(path)?);
    }
    let fallback = Path::new(DEFAULT_CONFIG);
    if fallback.exists() {
        Ok(ConstellationConfig::from_file(fallback)?)
    } else {
        Ok(ConstellationConfig::default())
    }
}

fn load_snapshot(path: &Path) -> Result<Snapshot, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: Snapshot =
        serde_json::from_str(&contents).map_err(|source| CliError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        path = %path.display(),
        pillars = snapshot.pillars.len(),
        satellites = snapshot.satellites.len(),
        "Snapshot loaded"
    );
    Ok(snapshot)
}

fn parse_at(value: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| CliError::Time {
            value: value.to_owned(),
            source,
        })
}

/// Build the view for `snapshot` and produce the requested output.
fn render(
    cli: &Cli,
    config: ConstellationConfig,
    snapshot: Snapshot,
    now: DateTime<Utc>,
) -> Result<String, CliError> {
    let at = cli.at.as_deref().map(parse_at).transpose()?;
    let dimensions = Dimensions::new(cli.width, cli.height);
    let mut view = ConstellationView::new(config, snapshot, dimensions, now);
    if let Some(at) = at {
        view.scrub_to(at);
    }

    let at = view.cursor().current();
    let placement = view.placement();
    info!(
        pillars = placement.pillars.len(),
        satellites = placement.satellites.len(),
        overlapping = placement.exhausted_count(),
        %at,
        "Scene composed"
    );

    match cli.format {
        OutputFormat::Json => Ok(view.scene().to_json()?),
        OutputFormat::Svg => {
            let mut svg = SvgRenderer::new();
            if cli.ambient {
                view.render(&mut svg);
            } else {
                draw_scene(&view.scene(), &mut svg);
            }
            Ok(svg.into_markup())
        }
    }
}

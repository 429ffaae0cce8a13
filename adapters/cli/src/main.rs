#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a castle maze and prints it.

mod castle_code;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use castle_maze_rendering::{render, AsciiPlan, SceneParts};
use castle_maze_system_bootstrap::{Bootstrap, GenerationConfig};
use castle_maze_world::World;
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Generate a castle maze and print it.
#[derive(Debug, Parser)]
#[command(name = "castle-maze", version)]
struct Cli {
    /// TOML file holding a generation configuration.
    #[arg(long, conflicts_with = "code")]
    config: Option<PathBuf>,

    /// Castle code printed by an earlier `--format code` run.
    #[arg(long)]
    code: Option<String>,

    /// Number of room columns.
    #[arg(long)]
    columns: Option<u32>,

    /// Number of room rows.
    #[arg(long)]
    rows: Option<u32>,

    /// Master seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Whether feature densities are randomly scaled before planning.
    #[arg(long)]
    jitter: Option<bool>,

    /// Output representation.
    #[arg(long, value_enum, default_value_t = OutputFormat::Plan)]
    format: OutputFormat,

    /// Log generation details.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Top-down character plan of the lower level.
    Plan,
    /// One scene macro per line.
    Parts,
    /// Scene macros as JSON.
    Json,
    /// Shareable castle code.
    Code,
}

/// Entry point for the castle maze command-line interface.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    install_tracing(cli.verbose);

    let config = resolve_config(&cli)?;
    debug!(?config, "resolved configuration");

    let world = Bootstrap
        .generate(&config)
        .context("invalid castle configuration")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_output(&world, &config, cli.format, &mut out)?;
    out.flush().context("failed to flush stdout")
}

fn install_tracing(verbose: bool) {
    let default_directive = if verbose {
        "castle_maze=debug"
    } else {
        "castle_maze=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn resolve_config(cli: &Cli) -> anyhow::Result<GenerationConfig> {
    let mut config = match (&cli.config, &cli.code) {
        (Some(path), _) => load_config(path)?,
        (None, Some(code)) => castle_code::decode(code).context("invalid castle code")?,
        (None, None) => GenerationConfig::default(),
    };

    if let Some(columns) = cli.columns {
        config.columns = columns;
    }
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(jitter) = cli.jitter {
        config.jitter_densities = jitter;
    }

    Ok(config)
}

fn load_config(path: &Path) -> anyhow::Result<GenerationConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_output<W: Write>(
    world: &World,
    config: &GenerationConfig,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Plan => writeln!(out, "{}", AsciiPlan::from_world(world))?,
        OutputFormat::Parts => {
            let mut scene = SceneParts::new();
            render(world, &mut scene);
            scene.write_listing(out)?;
        }
        OutputFormat::Json => {
            let mut scene = SceneParts::new();
            render(world, &mut scene);
            serde_json::to_writer_pretty(&mut *out, &scene)
                .context("failed to serialize scene")?;
            writeln!(out)?;
        }
        OutputFormat::Code => {
            let code = castle_code::encode(config).context("failed to encode castle code")?;
            writeln!(out, "{code}")?;
        }
    }
    Ok(())
}

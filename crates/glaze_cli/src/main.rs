//! Glaze CLI
//!
//! Render liquid glass surfaces over backdrop images, sample luminance and
//! inspect style configs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod render;

use config::GlazeConfig;

#[derive(Parser)]
#[command(name = "glaze")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Liquid glass renderer", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a glass surface over a backdrop image to PNG
    Render {
        /// Backdrop image; the config's background color is used when omitted
        #[arg(short, long)]
        backdrop: Option<PathBuf>,

        /// TOML config (surface rect, style, sampler)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output PNG path
        #[arg(short, long, default_value = "glaze.png")]
        out: PathBuf,

        /// Also print the sampled luminance of the glass layer
        #[arg(long)]
        luminance: bool,
    },

    /// Sample the average luminance of an image
    Sample {
        image: PathBuf,

        /// Quantization step; 0 disables quantization
        #[arg(short, long, default_value = "0.25")]
        precision: f32,

        /// Downsample grid, e.g. 5x5
        #[arg(short, long, default_value = "5x5", value_parser = parse_grid)]
        grid: [u32; 2],
    },

    /// Print a built-in config
    Presets {
        /// Preset name (default, frosted, lens)
        #[arg(default_value = "default")]
        name: String,

        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Validate a config file's style
    Check {
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Render {
            backdrop,
            config,
            out,
            luminance,
        } => render::cmd_render(backdrop.as_deref(), config.as_deref(), &out, luminance),

        Commands::Sample {
            image,
            precision,
            grid,
        } => render::cmd_sample(&image, precision, grid),

        Commands::Presets { name, json } => cmd_presets(&name, json),

        Commands::Check { config } => cmd_check(&config),
    }
}

fn parse_grid(s: &str) -> std::result::Result<[u32; 2], String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid grid dimension '{v}': {e}"))
    };
    Ok([parse(w)?, parse(h)?])
}

fn cmd_presets(name: &str, json: bool) -> Result<()> {
    let Some(preset) = GlazeConfig::preset(name) else {
        anyhow::bail!(
            "Unknown preset '{}'. Available presets: {:?}",
            name,
            GlazeConfig::preset_names()
        );
    };
    if json {
        println!("{}", preset.to_json()?);
    } else {
        print!("{}", preset.to_toml()?);
    }
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let config = GlazeConfig::load(path)?;
    let violations = config
        .style
        .violations(config.surface.size(), config.density());

    if violations.is_empty() {
        info!("{} is valid", path.display());
        return Ok(());
    }
    for violation in &violations {
        println!("{violation}");
    }
    anyhow::bail!(
        "{} has {} style violation(s)",
        path.display(),
        violations.len()
    )
}

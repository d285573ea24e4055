use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Map;

use gpx2activity::config::Config;
use gpx2activity::{gpx_to_geojson, gpx_to_runkeeper, upload};

#[derive(Parser)]
#[command(name = "gpx2activity", version, about = "Convert GPX tracks to activity JSON")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a GPX file to JSON
    Convert {
        /// The input GPX file
        #[arg(short, long)]
        input: PathBuf,
        /// The output JSON file
        #[arg(short, long)]
        output: PathBuf,
        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,
        /// The output format
        #[arg(long, value_enum, default_value_t = Format::Runkeeper)]
        format: Format,
    },
    /// Convert a GPX file and upload it to RunKeeper via Temboo
    Upload {
        /// The input GPX file
        #[arg(short, long)]
        input: PathBuf,
        /// The config file location (default: ~/.gpx2activity/runkeeper.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Runkeeper,
    Geojson,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Convert {
            input,
            output,
            force,
            format,
        } => convert(&input, &output, force, format),
        Command::Upload { input, config } => upload_activity(&input, config),
    }
}

fn convert(input: &Path, output: &Path, force: bool, format: Format) -> anyhow::Result<()> {
    if output.exists() && !force {
        bail!(
            "output file '{}' exists, use --force to overwrite",
            output.display()
        );
    }

    let gpx_text = fs::read_to_string(input)
        .with_context(|| format!("reading input file '{}'", input.display()))?;

    let json = match format {
        Format::Runkeeper => {
            let record = gpx_to_runkeeper(&gpx_text, &Map::new())?;
            serde_json::to_string(&record)?
        }
        Format::Geojson => {
            let fc = gpx_to_geojson(&gpx_text)?;
            serde_json::to_string(&fc)?
        }
    };

    fs::write(output, json)
        .with_context(|| format!("writing output file '{}'", output.display()))?;
    Ok(())
}

fn upload_activity(input: &Path, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = match config_path {
        Some(path) => path,
        None => Config::default_path().context("could not determine home directory")?,
    };

    if !config_path.exists() {
        Config::write_template(&config_path)?;
        bail!(
            "config file '{}' did not exist; a template was created, fill it in and retry",
            config_path.display()
        );
    }
    let config = Config::load(&config_path)
        .with_context(|| format!("loading config file '{}'", config_path.display()))?;

    let gpx_text = fs::read_to_string(input)
        .with_context(|| format!("reading input file '{}'", input.display()))?;
    let activity = gpx_to_runkeeper(&gpx_text, &Map::new())?;

    upload::send_activity(&activity, &config)?;
    println!("Uploaded '{}' to RunKeeper", input.display());
    Ok(())
}

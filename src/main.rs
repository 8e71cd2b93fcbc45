// This is the command line entry point for the image converter.
// The lib.rs file carries the converter itself.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use image_converter_lib::commands::{
    convert_images, download_archive, export_selected, select_format, session_summary, toggle_all,
};
use image_converter_lib::{AppState, ConverterSettings, TargetFormat};

/// Convert images into every supported format and pack the chosen ones into a zip.
#[derive(Parser, Debug)]
#[command(name = "image-converter", version, about)]
struct Cli {
    /// Image files to convert
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory the archive (and individual files) are written to
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Formats to include in the download, comma separated (default: all)
    #[arg(short, long, value_delimiter = ',')]
    formats: Vec<TargetFormat>,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Also write every selected artifact as its own file
    #[arg(long)]
    individual: bool,

    /// Print a JSON summary of the session to stdout
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_settings(path: Option<&PathBuf>) -> Result<ConverterSettings> {
    let Some(path) = path else {
        return Ok(ConverterSettings::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid settings file {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    info!("=== Image Converter Starting ===");

    let settings = load_settings(cli.settings.as_ref())?;
    let state = AppState::new(settings).context("Invalid settings")?;
    debug!("AppState initialized");

    let ids = convert_images(&state, cli.inputs.clone(), |progress| {
        if let Some(name) = &progress.current_file {
            info!(
                "[{}/{}] {}% converted {}",
                progress.completed, progress.total, progress.percentage, name
            );
        }
    })
    .await
    .context("Conversion failed")?;
    debug!("Converted {} files", ids.len());

    let mut formats = cli.formats.clone();
    formats.sort();
    formats.dedup();

    if formats.is_empty() {
        toggle_all(&state).await;
    } else {
        for format in formats {
            if !select_format(&state, format).await {
                warn!("No {} artifacts were produced", format);
            }
        }
    }

    let summary = session_summary(&state).await;
    for file in &summary.files {
        for failure in &file.failures {
            warn!("{}: {} skipped ({})", file.source_name, failure.format, failure.message);
        }
    }
    info!(
        "{} of {} artifacts selected ({})",
        summary.selected_artifacts, summary.total_artifacts, summary.selected_size
    );

    match download_archive(&state, &cli.output).await? {
        Some(path) => info!("Archive written to {}", path.display()),
        None => warn!("Nothing selected, no archive written"),
    }

    if cli.individual {
        let written = export_selected(&state, &cli.output).await?;
        info!("Wrote {} files ({})", written.len(), summary.selected_size);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

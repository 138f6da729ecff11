// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "camera-capture")]
#[command(about = "Capture camera renders to numbered image files")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    /// Configuration file (default: <config dir>/camera-capture/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding capture records (default: <data dir>/camera-capture)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture one or more images
    Capture(cli::CaptureArgs),

    /// List stored file records
    Records,

    /// Write the default configuration
    Reset,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=camera_capture=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(camera_capture::config::default_path);
    let data_dir = cli
        .data_dir
        .unwrap_or_else(camera_capture::storage::default_data_dir);

    match cli.command {
        Commands::Capture(args) => cli::capture(&config_path, &data_dir, args),
        Commands::Records => cli::list_records(&data_dir),
        Commands::Reset => cli::reset_config(&config_path),
    }
}

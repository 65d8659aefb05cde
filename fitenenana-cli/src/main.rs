//! fitenenana CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ExportCommand, ListCommand, ServeCommand, ValidateCommand};
use fitenenana::prelude::FitenenanaConfig;

#[derive(Parser)]
#[command(name = "fitenenana")]
#[command(version)]
#[command(about = "Form-letter assistant: fill a template, export the letter", long_about = None)]
struct Cli {
    /// Configuration file, instead of the standard locations
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Catalogue source (`bundled`, file path or URL), overriding the configuration
    #[arg(short = 's', long, global = true, value_name = "SOURCE")]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web application
    Serve(ServeCommand),
    /// List the catalogue's templates
    List(ListCommand),
    /// Load the catalogue and report validation warnings
    Validate(ValidateCommand),
    /// Fill a template and export the letter
    Export(ExportCommand),
}

impl Cli {
    fn config(&self) -> Result<FitenenanaConfig> {
        let mut config = match &self.config {
            Some(path) => FitenenanaConfig::load_from(path)?,
            None => FitenenanaConfig::load()?,
        };
        if let Some(source) = &self.source {
            config.catalogue.source.clone_from(source);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;

    match cli.command {
        Commands::Serve(cmd) => cmd.execute(config).await?,
        Commands::List(cmd) => cmd.execute(&config).await?,
        Commands::Validate(cmd) => cmd.execute(&config).await?,
        Commands::Export(cmd) => cmd.execute(&config).await?,
    }

    Ok(())
}

//! Catalogue validation command

use anyhow::Result;
use clap::Args;
use console::{style, Emoji};
use fitenenana::prelude::FitenenanaConfig;

use super::load_catalogue;

static SUCCESS: Emoji = Emoji("✓", "√");
static WARNING: Emoji = Emoji("⚠", "!");

/// Load the catalogue and report validation warnings
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Fail when any warning is reported
    #[arg(long)]
    strict: bool,
}

impl ValidateCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue cannot be loaded, or in strict mode
    /// if it has warnings
    pub async fn execute(&self, config: &FitenenanaConfig) -> Result<()> {
        let loaded = load_catalogue(config).await?;

        for warning in &loaded.warnings {
            println!("{} {}", style(WARNING).yellow(), warning);
        }

        if loaded.warnings.is_empty() {
            println!(
                "{} {} templates, no warnings",
                style(SUCCESS).green(),
                loaded.catalogue.len()
            );
        } else if self.strict {
            anyhow::bail!("{} catalogue warnings", loaded.warnings.len());
        } else {
            println!(
                "{} templates, {} warnings",
                loaded.catalogue.len(),
                loaded.warnings.len()
            );
        }
        Ok(())
    }
}

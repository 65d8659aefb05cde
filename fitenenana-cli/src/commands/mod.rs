//! CLI command implementations

pub mod export;
pub mod list;
pub mod serve;
pub mod validate;

pub use export::ExportCommand;
pub use list::ListCommand;
pub use serve::ServeCommand;
pub use validate::ValidateCommand;

use anyhow::{Context, Result};
use fitenenana::catalogue::{CatalogueLoader, LoadedCatalogue};
use fitenenana::prelude::FitenenanaConfig;
use indicatif::{ProgressBar, ProgressStyle};

/// Load the configured catalogue behind a spinner
pub(crate) async fn load_catalogue(config: &FitenenanaConfig) -> Result<LoadedCatalogue> {
    let source = config.catalogue.source();
    let loader = CatalogueLoader::new(source.clone(), config.catalogue.validator());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Failed to set progress style")?,
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_message(format!("Loading templates from {source}..."));

    let loaded = loader.load().await;
    spinner.finish_and_clear();

    loaded.with_context(|| format!("Failed to load templates from {source}"))
}

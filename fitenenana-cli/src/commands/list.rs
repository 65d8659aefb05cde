//! Catalogue listing command

use anyhow::Result;
use clap::Args;
use console::style;
use fitenenana::prelude::FitenenanaConfig;
use serde::Serialize;

use super::load_catalogue;

/// List the catalogue's templates
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct CaseSummary<'a> {
    case_id: &'a str,
    title: &'a str,
    steps: usize,
    fields: usize,
    variables: Vec<&'a str>,
}

impl ListCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue cannot be loaded
    pub async fn execute(&self, config: &FitenenanaConfig) -> Result<()> {
        let loaded = load_catalogue(config).await?;

        let summaries: Vec<CaseSummary<'_>> = loaded
            .catalogue
            .entries()
            .iter()
            .map(|entry| CaseSummary {
                case_id: &entry.case_id,
                title: &entry.template.title,
                steps: entry.template.steps.len(),
                fields: entry
                    .template
                    .steps
                    .iter()
                    .map(|step| step.editable_fields.len())
                    .sum(),
                variables: entry.template.variables.iter().map(|(name, _)| name).collect(),
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
            return Ok(());
        }

        for summary in &summaries {
            println!(
                "{:<24} {}  {}",
                style(summary.case_id).cyan().bold(),
                summary.title,
                style(format!(
                    "({} steps, {} fields, variables: {})",
                    summary.steps,
                    summary.fields,
                    summary.variables.join(", ")
                ))
                .dim()
            );
        }
        Ok(())
    }
}

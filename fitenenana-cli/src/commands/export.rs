//! Letter export command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::{style, Emoji};
use dialoguer::{theme::ColorfulTheme, Input};
use fitenenana::prelude::*;
use fitenenana_cli::{assignment, desktop_chain, Assignment, FieldAssignment};

use super::load_catalogue;

static SUCCESS: Emoji = Emoji("✓", "√");

/// Fill a template and export the letter
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Case identifier, as shown by `fitenenana list`
    case_id: String,

    /// Editable field override (`editable-STEP-FIELD=TEXT` or `STEP-FIELD=TEXT`)
    #[arg(long = "field", value_name = "ID=TEXT")]
    fields: Vec<FieldAssignment>,

    /// Variable override
    #[arg(long = "var", value_name = "NAME=VALUE")]
    variables: Vec<Assignment>,

    /// Prompt for every variable and field
    #[arg(short, long)]
    interactive: bool,

    /// Directory for the exported file, overriding the configuration
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip the clipboard
    #[arg(long)]
    no_clipboard: bool,

    /// Print the letter instead of exporting it
    #[arg(long)]
    print: bool,
}

impl ExportCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The catalogue cannot be loaded
    /// - The case, a field or a variable is unknown
    /// - Every export sink fails
    pub async fn execute(&self, config: &FitenenanaConfig) -> Result<()> {
        let loaded = load_catalogue(config).await?;
        let mut session = SessionState::select(&loaded.catalogue, &self.case_id)
            .with_context(|| format!("Cannot export {}", self.case_id))?;

        assignment::apply(&mut session, &self.fields, &self.variables)?;
        if self.interactive {
            prompt(&mut session)?;
        }

        let document = ExportDocument::from_session(&session);
        if self.print {
            print!("{}", document.text);
            return Ok(());
        }

        let mut settings = config.export.clone();
        if let Some(dir) = &self.output_dir {
            settings.output_dir.clone_from(dir);
        }
        let delivery = desktop_chain(&settings, !self.no_clipboard)
            .deliver(&document)
            .await
            .context("Export failed")?;

        println!("{} {}", style(SUCCESS).green(), style(&delivery.message).bold());
        if let Some(location) = delivery.location {
            println!("  {}", style(location).dim());
        }
        Ok(())
    }
}

/// Ask for each variable, then each field, defaulting to the current text
fn prompt(session: &mut SessionState) -> Result<()> {
    let theme = ColorfulTheme::default();

    let variables: Vec<(String, String)> = session
        .template_data()
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    for (name, current) in variables {
        let value: String = Input::with_theme(&theme)
            .with_prompt(&name)
            .default(current.clone())
            .interact_text()?;
        if value != current {
            session.set_variable(&name, value)?;
        }
    }

    let fields: Vec<(String, FieldId, String)> = session
        .render()
        .iter()
        .flat_map(|step| {
            step.fields()
                .map(move |field| (step.title.clone(), field.id, field.current.clone()))
        })
        .collect();
    for (title, id, current) in fields {
        let value: String = Input::with_theme(&theme)
            .with_prompt(format!("{title} ({id})"))
            .default(current.clone())
            .interact_text()?;
        if value != current {
            session.set_field(id, value)?;
        }
    }
    Ok(())
}

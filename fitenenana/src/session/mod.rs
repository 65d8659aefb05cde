//! Session state
//!
//! A [`SessionState`] is created when the user selects a case and replaced
//! wholesale on the next selection. It holds the selected template (shared
//! with the catalogue, never modified), the current variable values, the live
//! text of edited fields and the placeholder layout of every step.

use std::sync::Arc;

use thiserror::Error;

use crate::catalogue::{Catalogue, Template, Variables};
use crate::engine::{AnnotatedStep, FieldId, FieldValues, StepLayout};

mod id;
mod store;

pub use id::SessionId;
pub use store::SessionStore;

/// Session errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The selected case is not in the catalogue
    #[error("template not found: {0}")]
    UnknownCase(String),

    /// No editable field with this identity exists in the selected template
    #[error("unknown editable field: {0}")]
    UnknownField(FieldId),

    /// No variable with this name exists in the selected template
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// No case has been selected in this session
    #[error("no template selected")]
    NoSelection,

    /// Session cookie is not a valid identifier
    #[error("invalid session id")]
    InvalidSessionId,
}

/// A flattened step, as used by the preview and the export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedStep {
    /// Section heading
    pub title: String,
    /// Plain text content with current values
    pub text: String,
}

/// Per-user working state for the selected template
#[derive(Debug, Clone)]
pub struct SessionState {
    case_id: String,
    template: Arc<Template>,
    current_step: usize,
    template_data: Variables,
    fields: FieldValues,
    layouts: Vec<StepLayout>,
}

impl SessionState {
    /// Start a session on `case_id`
    ///
    /// Variables are seeded from the template defaults and the placeholder
    /// layout of each step is computed against those defaults.
    pub fn select(catalogue: &Catalogue, case_id: &str) -> Result<Self, SessionError> {
        let template = catalogue
            .get(case_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownCase(case_id.to_string()))?;

        Ok(Self::for_template(case_id, template))
    }

    /// Start a session on an already-resolved template
    #[must_use]
    pub fn for_template(case_id: impl Into<String>, template: Arc<Template>) -> Self {
        let template_data = template.variables.clone();
        let layouts = template
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| StepLayout::build(step, index, &template_data))
            .collect();

        Self {
            case_id: case_id.into(),
            template,
            current_step: 0,
            template_data,
            fields: FieldValues::new(),
            layouts,
        }
    }

    /// Selected case identifier
    #[must_use]
    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    /// Selected template
    #[must_use]
    pub fn template(&self) -> &Arc<Template> {
        &self.template
    }

    /// Document title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.template.title
    }

    /// Step cursor
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.current_step
    }

    /// Current variable values
    #[must_use]
    pub const fn template_data(&self) -> &Variables {
        &self.template_data
    }

    /// Live text of a field, if it has been edited
    #[must_use]
    pub fn field_text(&self, id: FieldId) -> Option<&str> {
        self.fields.get(&id).map(String::as_str)
    }

    /// Record the live text of an editable field
    pub fn set_field(&mut self, id: FieldId, text: impl Into<String>) -> Result<(), SessionError> {
        let placed = self
            .layouts
            .get(id.step)
            .is_some_and(|layout| layout.has_field(id));
        if !placed {
            return Err(SessionError::UnknownField(id));
        }

        self.fields.insert(id, text.into());
        Ok(())
    }

    /// Record the current value of a variable
    pub fn set_variable(&mut self, name: &str, value: impl Into<String>) -> Result<(), SessionError> {
        if self.template_data.set(name, value) {
            Ok(())
        } else {
            Err(SessionError::UnknownVariable(name.to_string()))
        }
    }

    /// Annotated rendering of every step, in template order
    #[must_use]
    pub fn render(&self) -> Vec<AnnotatedStep> {
        self.template
            .steps
            .iter()
            .zip(&self.layouts)
            .map(|(step, layout)| layout.render(step, &self.fields, &self.template_data))
            .collect()
    }

    /// Plain-text content of one step
    #[must_use]
    pub fn flatten_step(&self, index: usize) -> Option<String> {
        self.layouts
            .get(index)
            .map(|layout| layout.flatten(&self.fields, &self.template_data))
    }

    /// Plain-text content of every step, in template order
    #[must_use]
    pub fn flatten(&self) -> Vec<FlattenedStep> {
        self.template
            .steps
            .iter()
            .zip(&self.layouts)
            .map(|(step, layout)| FlattenedStep {
                title: step.title.clone(),
                text: layout.flatten(&self.fields, &self.template_data),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{EditableField, Step};

    fn catalogue() -> Catalogue {
        Catalogue::default().with(
            "fiterahana",
            Template {
                title: "Fiterahana Zaza".to_string(),
                variables: Variables::new().with("zaza", "Koto"),
                steps: vec![
                    Step {
                        title: "Fiarahabana".to_string(),
                        content: "Ry \"havana\", teraka i Koto.".to_string(),
                        editable_fields: vec![EditableField::new("havana")],
                        ..Step::default()
                    },
                    Step {
                        title: "Famaranana".to_string(),
                        content: "Misaotra tompoko.".to_string(),
                        ..Step::default()
                    },
                ],
            },
        )
    }

    #[test]
    fn test_select_seeds_state() {
        let session = SessionState::select(&catalogue(), "fiterahana").unwrap();

        assert_eq!(session.case_id(), "fiterahana");
        assert_eq!(session.title(), "Fiterahana Zaza");
        assert_eq!(session.current_step(), 0);
        assert_eq!(session.template_data().get("zaza"), Some("Koto"));
        assert_eq!(session.render().len(), 2);
    }

    #[test]
    fn test_select_unknown_case() {
        assert_eq!(
            SessionState::select(&catalogue(), "tsy-misy").unwrap_err(),
            SessionError::UnknownCase("tsy-misy".to_string())
        );
    }

    #[test]
    fn test_edits_never_touch_the_catalogue() {
        let catalogue = catalogue();
        let mut session = SessionState::select(&catalogue, "fiterahana").unwrap();

        session.set_variable("zaza", "Soa").unwrap();
        session.set_field(FieldId::new(0, 0), "\"namana\"").unwrap();

        let template = catalogue.get("fiterahana").unwrap();
        assert_eq!(template.variables.get("zaza"), Some("Koto"));
        assert_eq!(
            session.flatten_step(0).unwrap(),
            "Ry \"namana\", teraka i Soa."
        );
    }

    #[test]
    fn test_unknown_field_and_variable() {
        let mut session = SessionState::select(&catalogue(), "fiterahana").unwrap();

        assert_eq!(
            session.set_field(FieldId::new(1, 0), "x"),
            Err(SessionError::UnknownField(FieldId::new(1, 0)))
        );
        assert_eq!(
            session.set_field(FieldId::new(9, 0), "x"),
            Err(SessionError::UnknownField(FieldId::new(9, 0)))
        );
        assert_eq!(
            session.set_variable("tsy-misy", "x"),
            Err(SessionError::UnknownVariable("tsy-misy".to_string()))
        );
    }

    #[test]
    fn test_flatten_follows_step_order() {
        let session = SessionState::select(&catalogue(), "fiterahana").unwrap();
        let steps = session.flatten();

        assert_eq!(steps[0].title, "Fiarahabana");
        assert_eq!(steps[1].text, "Misaotra tompoko.");
        assert_eq!(session.flatten_step(2), None);
    }
}

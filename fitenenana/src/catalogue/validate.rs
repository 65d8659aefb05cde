//! Advisory catalogue validation
//!
//! Validation reports problems but never blocks loading: the application
//! proceeds with whatever templates are usable.

use serde_json::Value;
use thiserror::Error;

use super::CatalogueDocument;

/// Case identifiers every catalogue is expected to provide
pub const REQUIRED_CASES: [&str; 5] = [
    "famangiana-zava-manjo",
    "fiterahana",
    "didi-poatra",
    "fangatahana-vady",
    "fiarahabana-taona",
];

/// A non-fatal catalogue problem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    /// A required case identifier is absent
    #[error("missing template case: {0}")]
    MissingCase(String),

    /// A template has no usable title or its steps are not a sequence
    #[error("invalid template structure for: {0}")]
    InvalidStructure(String),

    /// An editable field's quoted text does not occur in its step content
    #[error("editable field {field} of step {step} in {case_id} not found in content")]
    FieldNotInContent {
        /// Template case identifier
        case_id: String,
        /// Step index
        step: usize,
        /// Field index within the step
        field: usize,
    },

    /// The entry could not be read as a template and was skipped
    #[error("template {case_id} skipped: {reason}")]
    Unreadable {
        /// Template case identifier
        case_id: String,
        /// Deserialization error
        reason: String,
    },
}

/// Catalogue validator
#[derive(Debug, Clone)]
pub struct Validator {
    required_cases: Vec<String>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(REQUIRED_CASES)
    }
}

impl Validator {
    /// Validator expecting the given case identifiers
    pub fn new<I, S>(required_cases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_cases: required_cases.into_iter().map(Into::into).collect(),
        }
    }

    /// Required case identifiers
    #[must_use]
    pub fn required_cases(&self) -> &[String] {
        &self.required_cases
    }

    /// Run every check and collect the warnings
    #[must_use]
    pub fn validate(&self, document: &CatalogueDocument) -> Vec<ValidationWarning> {
        let mut warnings: Vec<_> = self
            .required_cases
            .iter()
            .filter(|case_id| document.get(case_id).is_none())
            .cloned()
            .map(ValidationWarning::MissingCase)
            .collect();

        for (case_id, template) in document.entries() {
            if !has_valid_shape(template) {
                warnings.push(ValidationWarning::InvalidStructure(case_id.clone()));
                continue;
            }
            warnings.extend(unplaced_fields(case_id, template));
        }

        warnings
    }
}

fn has_valid_shape(template: &Value) -> bool {
    let has_title = template
        .get("title")
        .and_then(Value::as_str)
        .is_some_and(|title| !title.is_empty());
    let has_steps = template.get("steps").is_some_and(Value::is_array);
    has_title && has_steps
}

fn unplaced_fields(case_id: &str, template: &Value) -> Vec<ValidationWarning> {
    let Some(steps) = template.get("steps").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut warnings = Vec::new();
    for (step_index, step) in steps.iter().enumerate() {
        let content = step.get("content").and_then(Value::as_str).unwrap_or_default();
        let Some(fields) = step.get("editableFields").and_then(Value::as_array) else {
            continue;
        };
        for (field_index, field) in fields.iter().enumerate() {
            let Some(text) = field.get("text").and_then(Value::as_str) else {
                continue;
            };
            if !content.contains(&format!("\"{text}\"")) {
                warnings.push(ValidationWarning::FieldNotInContent {
                    case_id: case_id.to_string(),
                    step: step_index,
                    field: field_index,
                });
            }
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_catalogue_without(skip: &str) -> String {
        let entries: Vec<String> = REQUIRED_CASES
            .iter()
            .filter(|case_id| **case_id != skip)
            .map(|case_id| format!(r#""{case_id}": {{"title": "T", "steps": []}}"#))
            .collect();
        format!("{{{}}}", entries.join(","))
    }

    #[test]
    fn test_complete_catalogue_has_no_warnings() {
        let document = CatalogueDocument::parse(&complete_catalogue_without("")).unwrap();
        assert!(Validator::default().validate(&document).is_empty());
    }

    #[test]
    fn test_reports_exactly_the_missing_case() {
        let document =
            CatalogueDocument::parse(&complete_catalogue_without("didi-poatra")).unwrap();
        let warnings = Validator::default().validate(&document);

        assert_eq!(
            warnings,
            vec![ValidationWarning::MissingCase("didi-poatra".to_string())]
        );
    }

    #[test]
    fn test_shape_check() {
        let document = CatalogueDocument::parse(
            r#"{
                "no-title": {"steps": []},
                "empty-title": {"title": "", "steps": []},
                "steps-not-array": {"title": "T", "steps": {"0": {}}},
                "fine": {"title": "T", "steps": []}
            }"#,
        )
        .unwrap();
        let warnings = Validator::new(Vec::<String>::new()).validate(&document);

        assert_eq!(
            warnings,
            vec![
                ValidationWarning::InvalidStructure("no-title".to_string()),
                ValidationWarning::InvalidStructure("empty-title".to_string()),
                ValidationWarning::InvalidStructure("steps-not-array".to_string()),
            ]
        );
    }

    #[test]
    fn test_placement_check() {
        let document = CatalogueDocument::parse(
            r#"{"x": {"title": "T", "steps": [
                {"content": "say \"hello\"", "editableFields": [{"text": "hello"}, {"text": "bye"}]}
            ]}}"#,
        )
        .unwrap();
        let warnings = Validator::new(["x"]).validate(&document);

        assert_eq!(
            warnings,
            vec![ValidationWarning::FieldNotInContent {
                case_id: "x".to_string(),
                step: 0,
                field: 1,
            }]
        );
    }

    #[test]
    fn test_warning_display() {
        let warning = ValidationWarning::MissingCase("fiterahana".to_string());
        assert_eq!(warning.to_string(), "missing template case: fiterahana");
    }
}

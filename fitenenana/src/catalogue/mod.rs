//! Template catalogue
//!
//! The catalogue maps a case identifier (e.g. `fiterahana`) to a [`Template`]:
//! a titled, ordered list of [`Step`]s plus the variable defaults used to seed
//! a session. It is loaded once from a JSON document and is immutable
//! afterwards; sessions share templates through [`Arc`].
//!
//! # Document shape
//!
//! ```json
//! {
//!   "fiterahana": {
//!     "title": "Fiterahana Zaza",
//!     "variables": { "anarana": "Rakoto" },
//!     "steps": [
//!       {
//!         "id": 1,
//!         "title": "Fanombohana",
//!         "content": "Ry \"havana\", i Rakoto no miteny.",
//!         "editableFields": [{ "text": "havana" }]
//!       }
//!     ]
//!   }
//! }
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

pub mod source;
pub mod validate;

pub use source::{CatalogueLoader, CatalogueSource, FailureKind, LoadError, LoadedCatalogue};
pub use validate::{ValidationWarning, Validator, REQUIRED_CASES};

/// A document template: title, ordered sections and variable defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Display name of the document type
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Document sections, in document order
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,

    /// Variable name to default display value, in document order
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: Variables,
}

/// One section of a template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Label shown next to the section heading
    #[serde(default)]
    pub id: StepLabel,

    /// Section heading
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Static text with quoted literals and variable defaults
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,

    /// Quoted literals the user may override, in declaration order
    #[serde(default, deserialize_with = "null_as_default")]
    pub editable_fields: Vec<EditableField>,
}

/// A quoted literal inside [`Step::content`] that the user may override
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableField {
    /// The literal text, without the surrounding double quotes
    pub text: String,
}

impl EditableField {
    /// Create a field for the given literal
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The literal wrapped in double quotes, as it appears in the content
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.text)
    }
}

/// Step label, shown as written in the catalogue
///
/// Catalogues use numbers (`1`, `-1`, `1.5`) as well as strings (`"2b"`), so
/// any JSON scalar is accepted and kept as its display text; `null` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StepLabel(String);

impl StepLabel {
    /// Label with the given display text
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Display text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for StepLabel {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<&str> for StepLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for StepLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StepLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(scalar_text(serde_json::Value::deserialize(deserializer)?)))
    }
}

/// Display text of a JSON value: strings as-is, `null` empty, others as JSON
fn scalar_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `null` reads as the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Ordered variable name → value mapping
///
/// Keeps document order so that placeholder placement is deterministic.
/// Non-string JSON values are stored through their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables(Vec<(String, String)>);

impl Variables {
    /// Create an empty mapping
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Builder-style insert, replacing an existing value in place
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value; new names are appended
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Replace the value of an existing variable
    ///
    /// Returns `false` (and changes nothing) if the name is unknown.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.0.iter_mut().find(|(existing, _)| existing == name) {
            Some(slot) => {
                slot.1 = value.into();
                true
            }
            None => false,
        }
    }

    /// Look up a value by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over `(name, value)` pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of variables
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no variables
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Variables {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Variables {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VariablesVisitor;

        impl<'de> Visitor<'de> for VariablesVisitor {
            type Value = Variables;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of variable names to display values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Variables, A::Error> {
                let mut variables = Variables::new();
                while let Some((name, value)) =
                    access.next_entry::<String, serde_json::Value>()?
                {
                    variables.insert(name, scalar_text(value));
                }
                Ok(variables)
            }
        }

        deserializer.deserialize_map(VariablesVisitor)
    }
}

/// One catalogue entry
#[derive(Debug, Clone)]
pub struct CatalogueEntry {
    /// Case identifier (catalogue key)
    pub case_id: String,
    /// The shared, read-only template
    pub template: Arc<Template>,
}

/// Ordered mapping from case identifier to template
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,
}

impl Catalogue {
    /// Build a catalogue from parsed document entries
    ///
    /// Entries that cannot be read as a [`Template`] are skipped and reported
    /// as [`ValidationWarning::Unreadable`]; the rest of the catalogue stays
    /// usable.
    #[must_use]
    pub fn from_document(document: &CatalogueDocument) -> (Self, Vec<ValidationWarning>) {
        let mut catalogue = Self::default();
        let mut skipped = Vec::new();

        for (case_id, value) in document.entries() {
            match serde_json::from_value::<Template>(value.clone()) {
                Ok(template) => catalogue.insert(case_id.clone(), template),
                Err(err) => skipped.push(ValidationWarning::Unreadable {
                    case_id: case_id.clone(),
                    reason: err.to_string(),
                }),
            }
        }

        (catalogue, skipped)
    }

    /// Insert or replace a template
    pub fn insert(&mut self, case_id: impl Into<String>, template: Template) {
        let case_id = case_id.into();
        let template = Arc::new(template);
        match self.entries.iter_mut().find(|entry| entry.case_id == case_id) {
            Some(entry) => entry.template = template,
            None => self.entries.push(CatalogueEntry { case_id, template }),
        }
    }

    /// Builder-style [`insert`](Self::insert)
    #[must_use]
    pub fn with(mut self, case_id: impl Into<String>, template: Template) -> Self {
        self.insert(case_id, template);
        self
    }

    /// Look up a template by case identifier
    #[must_use]
    pub fn get(&self, case_id: &str) -> Option<&Arc<Template>> {
        self.entries
            .iter()
            .find(|entry| entry.case_id == case_id)
            .map(|entry| &entry.template)
    }

    /// Whether a case identifier is present
    #[must_use]
    pub fn contains(&self, case_id: &str) -> bool {
        self.get(case_id).is_some()
    }

    /// Entries in document order
    #[must_use]
    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }

    /// Case identifiers in document order
    #[must_use]
    pub fn case_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.case_id.as_str()).collect()
    }

    /// Number of templates
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The catalogue document as parsed JSON, before typing
///
/// The validator inspects this form so that it can report shape problems
/// that would otherwise be hidden by defaults during deserialization.
#[derive(Debug, Clone, Default)]
pub struct CatalogueDocument(serde_json::Map<String, serde_json::Value>);

impl CatalogueDocument {
    /// Parse a catalogue document; the root must be a JSON object
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(serde_json::Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(LoadError::Malformed(
                "catalogue root must be an object keyed by case identifier".to_string(),
            )),
            Err(err) => Err(LoadError::Malformed(err.to_string())),
        }
    }

    /// Raw entries in document order
    pub fn entries(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }

    /// Raw entry for a case identifier
    #[must_use]
    pub fn get(&self, case_id: &str) -> Option<&serde_json::Value> {
        self.0.get(case_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "fiterahana": {
            "title": "Fiterahana Zaza",
            "variables": { "zaza": "Koto", "ray": "Rabe" },
            "steps": [
                {
                    "id": 1,
                    "title": "Fiarahabana",
                    "content": "Ry \"havana\" malala,\nteraka i Koto.",
                    "editableFields": [{ "text": "havana" }]
                },
                { "id": "2b", "title": "Famaranana", "content": "Misaotra." }
            ]
        },
        "didi-poatra": { "title": "Didi-poatra", "steps": [] }
    }"#;

    #[test]
    fn test_parse_keeps_document_order() {
        let document = CatalogueDocument::parse(SAMPLE).unwrap();
        let (catalogue, skipped) = Catalogue::from_document(&document);

        assert!(skipped.is_empty());
        assert_eq!(catalogue.case_ids(), vec!["fiterahana", "didi-poatra"]);
    }

    #[test]
    fn test_variables_keep_document_order() {
        let document = CatalogueDocument::parse(SAMPLE).unwrap();
        let (catalogue, _) = Catalogue::from_document(&document);
        let template = catalogue.get("fiterahana").unwrap();

        let names: Vec<_> = template.variables.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zaza", "ray"]);
        assert_eq!(template.variables.get("ray"), Some("Rabe"));
    }

    #[test]
    fn test_step_labels_accept_numbers_and_strings() {
        let document = CatalogueDocument::parse(SAMPLE).unwrap();
        let (catalogue, _) = Catalogue::from_document(&document);
        let steps = &catalogue.get("fiterahana").unwrap().steps;

        assert_eq!(steps[0].id.to_string(), "1");
        assert_eq!(steps[1].id.to_string(), "2b");
        assert!(steps[1].editable_fields.is_empty());
    }

    #[test]
    fn test_any_scalar_step_label_keeps_template() {
        let document = CatalogueDocument::parse(
            r#"{
                "a": {"title": "A", "steps": [{"id": -1, "title": "Voalohany", "content": "x"}]},
                "b": {"title": "B", "steps": [{"id": 1.5, "content": null, "editableFields": null}]},
                "c": {"title": "C", "steps": [{"id": null, "title": null}]}
            }"#,
        )
        .unwrap();

        let (catalogue, skipped) = Catalogue::from_document(&document);

        assert!(skipped.is_empty());
        assert_eq!(catalogue.case_ids(), vec!["a", "b", "c"]);
        assert_eq!(catalogue.get("a").unwrap().steps[0].id.as_str(), "-1");
        let step = &catalogue.get("b").unwrap().steps[0];
        assert_eq!(step.id.to_string(), "1.5");
        assert!(step.content.is_empty());
        assert!(step.editable_fields.is_empty());
        let step = &catalogue.get("c").unwrap().steps[0];
        assert_eq!(step.id, StepLabel::default());
        assert!(step.title.is_empty());
    }

    #[test]
    fn test_missing_sections_default() {
        let document = CatalogueDocument::parse(SAMPLE).unwrap();
        let (catalogue, _) = Catalogue::from_document(&document);
        let template = catalogue.get("didi-poatra").unwrap();

        assert!(template.variables.is_empty());
        assert!(template.steps.is_empty());
    }

    #[test]
    fn test_unreadable_entry_is_skipped() {
        let document =
            CatalogueDocument::parse(r#"{"ok": {"title": "Ok"}, "bad": {"steps": "nope"}}"#)
                .unwrap();
        let (catalogue, skipped) = Catalogue::from_document(&document);

        assert_eq!(catalogue.case_ids(), vec!["ok"]);
        assert!(matches!(
            &skipped[..],
            [ValidationWarning::Unreadable { case_id, .. }] if case_id == "bad"
        ));
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(matches!(
            CatalogueDocument::parse("[1, 2]"),
            Err(LoadError::Malformed(_))
        ));
        assert!(matches!(
            CatalogueDocument::parse("{ not json"),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn test_variables_set_only_existing() {
        let mut variables = Variables::new().with("anarana", "Rakoto");

        assert!(variables.set("anarana", "Rabe"));
        assert!(!variables.set("tsy-misy", "x"));
        assert_eq!(variables.get("anarana"), Some("Rabe"));
        assert_eq!(variables.len(), 1);
    }

    #[test]
    fn test_non_string_variable_values() {
        let variables: Variables =
            serde_json::from_str(r#"{"taona": 30, "tsy": null}"#).unwrap();

        assert_eq!(variables.get("taona"), Some("30"));
        assert_eq!(variables.get("tsy"), Some(""));
    }

    #[test]
    fn test_quoted_field() {
        assert_eq!(EditableField::new("havana").quoted(), "\"havana\"");
    }
}

//! Placeholder substitution engine
//!
//! A step's static content contains two kinds of placeholders:
//!
//! - **editable fields**: quoted literals (`"havana"`) declared in the step's
//!   `editableFields`, overridable per step
//! - **variables**: occurrences of a template variable's default value,
//!   shared by every step of the session
//!
//! Placeholders are located once, when a case is selected, and kept as a
//! [`StepLayout`]: an ordered list of literal text and placeholder segments.
//! Rendering ([`StepLayout::render`]) and flattening ([`StepLayout::flatten`])
//! walk the same layout, so edits never have to be found again in the text and
//! the editor, preview and export always agree.
//!
//! Only the first literal occurrence of a needle becomes a placeholder. A
//! second `"havana"` in the same step stays literal text unless the step
//! declares a second field for it.
//!
//! # Example
//!
//! ```rust
//! use fitenenana::catalogue::{EditableField, Step, Variables};
//! use fitenenana::engine::{FieldValues, StepLayout};
//!
//! let step = Step {
//!     content: "Ry \"havana\", i Rakoto no miteny.".to_string(),
//!     editable_fields: vec![EditableField::new("havana")],
//!     ..Step::default()
//! };
//! let mut variables = Variables::new().with("anarana", "Rakoto");
//! let layout = StepLayout::build(&step, 0, &variables);
//!
//! variables.set("anarana", "Rabe");
//! let text = layout.flatten(&FieldValues::new(), &variables);
//! assert_eq!(text, "Ry \"havana\", i Rabe no miteny.");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalogue::{Step, Variables};

/// Live text of editable fields, keyed by identity
///
/// A field absent from the map displays its initial quoted text.
pub type FieldValues = HashMap<FieldId, String>;

/// Stable identity of an editable field: `editable-<step>-<field>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId {
    /// Step index within the template
    pub step: usize,
    /// Field index within the step's `editableFields`
    pub field: usize,
}

impl FieldId {
    /// Create an identity
    #[must_use]
    pub const fn new(step: usize, field: usize) -> Self {
        Self { step, field }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "editable-{}-{}", self.step, self.field)
    }
}

/// Error parsing a [`FieldId`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field identity: {0}")]
pub struct ParseFieldIdError(String);

impl FromStr for FieldId {
    type Err = ParseFieldIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseFieldIdError(s.to_string());
        let rest = s.strip_prefix("editable-").ok_or_else(invalid)?;
        let (step, field) = rest.split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            step: step.parse().map_err(|_| invalid())?,
            field: field.parse().map_err(|_| invalid())?,
        })
    }
}

/// One segment of a step layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Static text, copied verbatim
    Text(String),
    /// Editable field placeholder
    Field {
        /// Field identity
        id: FieldId,
        /// Literal text without quotes, as declared in the catalogue
        original: String,
    },
    /// Variable placeholder
    Variable {
        /// Variable name
        name: String,
    },
}

/// Positional placeholder layout of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLayout {
    step_index: usize,
    segments: Vec<Segment>,
}

impl StepLayout {
    /// Locate the placeholders of `step`
    ///
    /// Fields are placed first, in declaration order, each at the first
    /// still-literal occurrence of its quoted text. Variables follow, in
    /// `variables` order, each at the first still-literal occurrence of its
    /// value. Empty variable values are not placed.
    #[must_use]
    pub fn build(step: &Step, step_index: usize, variables: &Variables) -> Self {
        let mut layout = Self {
            step_index,
            segments: vec![Segment::Text(step.content.clone())],
        };

        for (field_index, field) in step.editable_fields.iter().enumerate() {
            let placed = layout.place(
                &field.quoted(),
                Segment::Field {
                    id: FieldId::new(step_index, field_index),
                    original: field.text.clone(),
                },
            );
            if !placed {
                tracing::debug!(step = step_index, field = field_index, "Editable field not placed");
            }
        }

        for (name, value) in variables.iter() {
            if value.is_empty() {
                continue;
            }
            layout.place(value, Segment::Variable { name: name.to_string() });
        }

        layout
    }

    /// Index of the step this layout belongs to
    #[must_use]
    pub const fn step_index(&self) -> usize {
        self.step_index
    }

    /// Segments in content order
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the layout contains a field placeholder with this identity
    #[must_use]
    pub fn has_field(&self, id: FieldId) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Field { id: placed, .. } if *placed == id))
    }

    /// Split the first literal occurrence of `needle` out into `placeholder`
    fn place(&mut self, needle: &str, placeholder: Segment) -> bool {
        let found = self.segments.iter().enumerate().find_map(|(index, segment)| match segment {
            Segment::Text(text) => text.find(needle).map(|offset| (index, offset)),
            _ => None,
        });
        let Some((index, offset)) = found else {
            return false;
        };
        let Segment::Text(text) = &self.segments[index] else {
            return false;
        };

        let before = &text[..offset];
        let after = &text[offset + needle.len()..];
        let mut replacement = Vec::with_capacity(3);
        if !before.is_empty() {
            replacement.push(Segment::Text(before.to_string()));
        }
        replacement.push(placeholder);
        if !after.is_empty() {
            replacement.push(Segment::Text(after.to_string()));
        }

        self.segments.splice(index..=index, replacement);
        true
    }

    /// Annotated rendering: placeholders as editable spans carrying their
    /// identity and current text, literal text split at line breaks
    #[must_use]
    pub fn render(&self, step: &Step, fields: &FieldValues, variables: &Variables) -> AnnotatedStep {
        let spans = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => Span::Text(TextSpan {
                    lines: text.split('\n').map(str::to_string).collect(),
                }),
                Segment::Field { id, original } => Span::Field(FieldSpan {
                    id: *id,
                    original: original.clone(),
                    current: field_text(fields, *id, original),
                }),
                Segment::Variable { name } => Span::Variable(VariableSpan {
                    name: name.clone(),
                    current: variables.get(name).unwrap_or_default().to_string(),
                }),
            })
            .collect();

        AnnotatedStep {
            index: self.step_index,
            label: step.id.to_string(),
            title: step.title.clone(),
            spans,
        }
    }

    /// Plain-text rendering with the current field and variable values
    ///
    /// Field values have every double quote removed and are re-wrapped in a
    /// single pair of quotes, so the result reads like the original content.
    #[must_use]
    pub fn flatten(&self, fields: &FieldValues, variables: &Variables) -> String {
        let mut text = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(literal) => text.push_str(literal),
                Segment::Field { id, original } => {
                    let current = field_text(fields, *id, original);
                    text.push('"');
                    text.push_str(&current.replace('"', ""));
                    text.push('"');
                }
                Segment::Variable { name } => {
                    text.push_str(variables.get(name).unwrap_or_default());
                }
            }
        }
        text
    }
}

fn field_text(fields: &FieldValues, id: FieldId, original: &str) -> String {
    fields
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("\"{original}\""))
}

/// A rendered step, ready for the editor view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedStep {
    /// Step index within the template
    pub index: usize,
    /// Step label (`Step::id`)
    pub label: String,
    /// Section heading
    pub title: String,
    /// Content spans in order
    pub spans: Vec<Span>,
}

impl AnnotatedStep {
    /// Field spans in content order
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpan> {
        self.spans.iter().filter_map(|span| match span {
            Span::Field(field) => Some(field),
            _ => None,
        })
    }

    /// Variable spans in content order
    pub fn variables(&self) -> impl Iterator<Item = &VariableSpan> {
        self.spans.iter().filter_map(|span| match span {
            Span::Variable(variable) => Some(variable),
            _ => None,
        })
    }
}

/// One rendered span
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Literal text
    Text(TextSpan),
    /// Editable field
    Field(FieldSpan),
    /// Editable variable
    Variable(VariableSpan),
}

/// Literal text, split at line breaks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    /// Lines; rendered with a line break between consecutive entries
    pub lines: Vec<String>,
}

/// Editable field span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpan {
    /// Field identity
    pub id: FieldId,
    /// Literal text as declared in the catalogue
    pub original: String,
    /// Text currently displayed (initially the quoted literal)
    pub current: String,
}

/// Editable variable span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSpan {
    /// Variable name
    pub name: String,
    /// Current value
    pub current: String,
}

//! `NAME=VALUE` arguments of `fitenenana export`

use std::str::FromStr;

use fitenenana::engine::FieldId;
use fitenenana::session::{SessionError, SessionState};

/// A variable override, `NAME=VALUE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Variable name
    pub name: String,
    /// New value
    pub value: String,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing name in `{s}`"));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// An editable field override, `editable-S-F=TEXT` or `S-F=TEXT`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    /// Field identity
    pub id: FieldId,
    /// New text
    pub value: String,
}

impl FromStr for FieldAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Assignment { name, value } = s.parse()?;
        let id = if name.starts_with("editable-") {
            name.parse::<FieldId>()
        } else {
            format!("editable-{name}").parse::<FieldId>()
        }
        .map_err(|err| err.to_string())?;
        Ok(Self { id, value })
    }
}

/// Apply command-line overrides to a fresh session
pub fn apply(
    session: &mut SessionState,
    fields: &[FieldAssignment],
    variables: &[Assignment],
) -> Result<(), SessionError> {
    for variable in variables {
        session.set_variable(&variable.name, variable.value.clone())?;
    }
    for field in fields {
        session.set_field(field.id, field.value.clone())?;
    }
    Ok(())
}

//! Testing utilities
//!
//! - [`TestServer`]: wrapper around `axum-test` for router tests
//! - HTMX assertion helpers
//! - [`fixture_catalogue`]: a small two-case catalogue

pub mod assertions;
pub mod server;

pub use assertions::*;
pub use server::TestServer;

use crate::catalogue::{Catalogue, EditableField, Step, StepLabel, Template, Variables};

/// Catalogue with `fiterahana` (two steps, a field and a variable) and an
/// empty `didi-poatra`
#[must_use]
pub fn fixture_catalogue() -> Catalogue {
    Catalogue::default()
        .with(
            "fiterahana",
            Template {
                title: "Fiterahana Zaza".to_string(),
                variables: Variables::new().with("zaza", "Koto"),
                steps: vec![
                    Step {
                        id: StepLabel::from(1),
                        title: "Fiarahabana".to_string(),
                        content: "Ry \"havana\", teraka i Koto.".to_string(),
                        editable_fields: vec![EditableField::new("havana")],
                    },
                    Step {
                        id: StepLabel::from(2),
                        title: "Famaranana".to_string(),
                        content: "Misaotra.".to_string(),
                        editable_fields: Vec::new(),
                    },
                ],
            },
        )
        .with(
            "didi-poatra",
            Template {
                title: "Didi-poatra".to_string(),
                ..Template::default()
            },
        )
}

//! Fitenenana: a form-letter assistant
//!
//! Loads a catalogue of document templates, lets the user pick one, edit its
//! placeholders inline and export the finished letter as plain text.
//!
//! - [`catalogue`]: template catalogue, loading and advisory validation
//! - [`engine`]: placeholder layout, annotated rendering and flattening
//! - [`session`]: per-user working state and the in-memory session store
//! - [`export`]: plain-text document assembly and the delivery fallback chain
//! - [`screens`]: axum router, handlers and askama screens
//!
//! # Example
//!
//! ```rust,no_run
//! use fitenenana::prelude::*;
//!
//! # async fn example() -> anyhow::Result<()> {
//! observability::init()?;
//! let config = FitenenanaConfig::load()?;
//! let addr = config.server.socket_addr()?;
//! let app = screens::router(AppState::initialize(config).await);
//!
//! let listener = tokio::net::TcpListener::bind(addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![allow(clippy::missing_errors_doc)]

pub mod catalogue;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod extractors;
pub mod health;
pub mod htmx;
pub mod middleware;
pub mod observability;
pub mod screens;
pub mod session;
pub mod state;
pub mod template;

#[cfg(test)]
pub mod testing;

pub mod prelude {
    //! Convenience re-exports for common types and traits

    pub use crate::catalogue::{
        Catalogue, CatalogueLoader, CatalogueSource, FailureKind, LoadError, Template,
        ValidationWarning, Validator,
    };
    pub use crate::config::FitenenanaConfig;
    pub use crate::engine::{AnnotatedStep, FieldId, Span, StepLayout};
    pub use crate::error::FitenenanaError;
    pub use crate::export::{
        Delivery, ExportChain, ExportDocument, ExportError, ExportSink, SinkKind,
    };
    pub use crate::htmx::{HxRefresh, HxRequest, HxResponseTrigger};
    pub use crate::middleware::{SessionConfig, SessionLayer};
    pub use crate::session::{SessionError, SessionId, SessionState, SessionStore};
    pub use crate::state::{AppState, CatalogueStatus};
    pub use crate::template::HxTemplate;
    pub use crate::{observability, screens};

    pub use askama;
    pub use axum;
}

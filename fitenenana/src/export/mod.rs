//! Plain-text export
//!
//! An [`ExportDocument`] is the flattened document: every step's title,
//! underlined with `=`, followed by its content. Delivering it goes through
//! an [`ExportChain`], an ordered list of [`ExportSink`] strategies
//! (share, clipboard, download). The chain skips unavailable sinks, falls
//! through on failure without surfacing it, and stops at the first success.
//!
//! # Example
//!
//! ```rust,no_run
//! use fitenenana::export::{ExportChain, ExportDocument};
//! use fitenenana::export::web::{ClientCapabilities, web_chain};
//!
//! # async fn example(document: ExportDocument) -> Result<(), fitenenana::export::ExportError> {
//! let chain = web_chain(&ClientCapabilities::default());
//! let delivery = chain.deliver(&document).await?;
//! println!("{}", delivery.message);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::{FlattenedStep, SessionState};

pub mod web;

/// Character repeated under each step title
pub const UNDERLINE: char = '=';

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Export file name for a document title: whitespace runs become `_`
#[must_use]
pub fn sanitize_filename(title: &str) -> String {
    format!("{}.txt", WHITESPACE.replace_all(title, "_"))
}

/// The assembled plain-text document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// Document title
    pub title: String,
    /// Download file name
    pub filename: String,
    /// Full document text
    pub text: String,
}

impl ExportDocument {
    /// Assemble a document from flattened steps
    #[must_use]
    pub fn assemble(title: impl Into<String>, steps: &[FlattenedStep]) -> Self {
        let title = title.into();
        let mut text = String::new();
        for step in steps {
            let underline: String = std::iter::repeat_n(UNDERLINE, step.title.chars().count()).collect();
            text.push_str(&step.title);
            text.push('\n');
            text.push_str(&underline);
            text.push_str("\n\n");
            text.push_str(&step.text);
            text.push_str("\n\n");
        }

        Self {
            filename: sanitize_filename(&title),
            title,
            text,
        }
    }

    /// Assemble the document for a session's current state
    #[must_use]
    pub fn from_session(session: &SessionState) -> Self {
        Self::assemble(session.title(), &session.flatten())
    }
}

/// Delivery strategy kinds, in default chain order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Native share capability
    Share,
    /// Clipboard write
    Clipboard,
    /// File download
    Download,
}

impl SinkKind {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Share => "share",
            Self::Clipboard => "clipboard",
            Self::Download => "download",
        }
    }

    /// Confirmation shown after a successful delivery
    #[must_use]
    pub const fn confirmation(self) -> &'static str {
        match self {
            Self::Share => "Voazara ny taratasy!",
            Self::Clipboard => "Nadika tao amin'ny clipboard!",
            Self::Download => "Voadownload ny rakitra!",
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SinkKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "share" => Ok(Self::Share),
            "clipboard" => Ok(Self::Clipboard),
            "download" => Ok(Self::Download),
            other => Err(ExportError::UnknownSink(other.to_string())),
        }
    }
}

/// A successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Strategy that succeeded
    pub kind: SinkKind,
    /// Confirmation message for the user
    pub message: String,
    /// Where the document went (file path or download URL), if anywhere
    pub location: Option<String>,
}

impl Delivery {
    /// Delivery with the kind's default confirmation
    #[must_use]
    pub fn new(kind: SinkKind) -> Self {
        Self {
            kind,
            message: kind.confirmation().to_string(),
            location: None,
        }
    }

    /// Attach a location
    #[must_use]
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// A sink failed to deliver
    #[error("{kind} delivery failed: {reason}")]
    Failed {
        /// Failing strategy
        kind: SinkKind,
        /// Failure description
        reason: String,
    },

    /// Writing the export file failed
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown strategy name
    #[error("unknown export sink: {0}")]
    UnknownSink(String),

    /// Every strategy was unavailable or failed
    #[error("no export sink could deliver the document")]
    Exhausted,
}

/// One delivery strategy
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Strategy kind
    fn kind(&self) -> SinkKind;

    /// Capability check; unavailable sinks are skipped without an attempt
    fn is_available(&self) -> bool;

    /// Attempt delivery
    async fn deliver(&self, document: &ExportDocument) -> Result<Delivery, ExportError>;
}

/// Ordered fallback chain of sinks
#[derive(Default)]
pub struct ExportChain {
    sinks: Vec<Box<dyn ExportSink>>,
}

impl fmt::Debug for ExportChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.sinks.iter().map(|sink| sink.kind()))
            .finish()
    }
}

impl ExportChain {
    /// Empty chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sink
    #[must_use]
    pub fn with(mut self, sink: impl ExportSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Append a boxed sink
    pub fn push(&mut self, sink: Box<dyn ExportSink>) {
        self.sinks.push(sink);
    }

    /// Kinds in attempt order
    #[must_use]
    pub fn kinds(&self) -> Vec<SinkKind> {
        self.sinks.iter().map(|sink| sink.kind()).collect()
    }

    /// Try each available sink in order until one succeeds
    pub async fn deliver(&self, document: &ExportDocument) -> Result<Delivery, ExportError> {
        for sink in &self.sinks {
            let kind = sink.kind();
            if !sink.is_available() {
                tracing::debug!(%kind, "Export sink unavailable");
                continue;
            }
            match sink.deliver(document).await {
                Ok(delivery) => {
                    tracing::info!(%kind, filename = %document.filename, "Document exported");
                    return Ok(delivery);
                }
                Err(err) => {
                    tracing::warn!(%kind, error = %err, "Export sink failed, trying next");
                }
            }
        }
        Err(ExportError::Exhausted)
    }
}

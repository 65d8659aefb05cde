//! Catalogue loading
//!
//! A catalogue comes from the copy built into the binary, a local file or an
//! HTTP(S) URL. Loading is a
//! single read/fetch followed by validation; any failure is surfaced as a
//! [`LoadError`], which callers classify into a [`FailureKind`] to pick the
//! user-facing message.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use super::{Catalogue, CatalogueDocument, ValidationWarning, Validator};

/// Catalogue shipped with the crate, used when no other source is configured
pub const BUNDLED_CATALOGUE: &str = include_str!("../../assets/templates.json");

/// Source name that selects [`BUNDLED_CATALOGUE`]
pub const BUNDLED_SOURCE: &str = "bundled";

/// Message shown when the catalogue could not be fetched for lack of connectivity
pub const OFFLINE_MESSAGE: &str = "Tsy misy connexion internet. Mila mijery ny connexion.";

/// Message shown for every other catalogue load failure
pub const UNAVAILABLE_MESSAGE: &str =
    "Tsy afaka naka ny templates. Mila mijery ny connexion internet na avereno manokatra ny app.";

/// Catalogue load failure
#[derive(Debug, Error)]
pub enum LoadError {
    /// The catalogue file could not be read
    #[error("failed to read catalogue file {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The catalogue request did not complete
    #[error("catalogue request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The catalogue server answered with a non-success status
    #[error("catalogue request returned HTTP {0}")]
    Status(u16),

    /// The document is not a JSON object keyed by case identifier
    #[error("malformed catalogue: {0}")]
    Malformed(String),
}

impl LoadError {
    /// Connectivity signal: the request never reached the catalogue server
    #[must_use]
    pub fn is_offline(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_connect() || err.is_timeout(),
            _ => false,
        }
    }

    /// Classify the failure for the error screen
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        if self.is_offline() {
            FailureKind::Offline
        } else {
            FailureKind::Unavailable
        }
    }
}

/// User-facing classification of a load failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No connectivity to the catalogue source
    Offline,
    /// Any other failure
    Unavailable,
}

impl FailureKind {
    /// Message displayed on the error screen
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Offline => OFFLINE_MESSAGE,
            Self::Unavailable => UNAVAILABLE_MESSAGE,
        }
    }
}

/// Where the catalogue document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueSource {
    /// The catalogue compiled into the binary
    Bundled,
    /// Local JSON file
    File(PathBuf),
    /// HTTP(S) URL
    Remote(String),
}

impl FromStr for CatalogueSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == BUNDLED_SOURCE {
            Ok(Self::Bundled)
        } else if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Remote(s.to_string()))
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl std::fmt::Display for CatalogueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bundled => f.write_str(BUNDLED_SOURCE),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

impl CatalogueSource {
    /// Read the raw document text
    pub async fn fetch(&self, client: &reqwest::Client) -> Result<String, LoadError> {
        match self {
            Self::Bundled => Ok(BUNDLED_CATALOGUE.to_string()),
            Self::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            Self::Remote(url) => {
                let response = client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status(status.as_u16()));
                }
                Ok(response.text().await?)
            }
        }
    }
}

/// A loaded catalogue together with its advisory warnings
#[derive(Debug, Clone)]
pub struct LoadedCatalogue {
    /// Usable templates
    pub catalogue: Arc<Catalogue>,
    /// Validation warnings (never fatal)
    pub warnings: Vec<ValidationWarning>,
}

/// Loads and validates catalogues from a fixed source
#[derive(Debug, Clone)]
pub struct CatalogueLoader {
    source: CatalogueSource,
    validator: Validator,
    client: reqwest::Client,
}

impl CatalogueLoader {
    /// Create a loader for a source, validating against `validator`
    #[must_use]
    pub fn new(source: CatalogueSource, validator: Validator) -> Self {
        Self {
            source,
            validator,
            client: reqwest::Client::new(),
        }
    }

    /// The configured source
    #[must_use]
    pub const fn source(&self) -> &CatalogueSource {
        &self.source
    }

    /// Fetch, parse and validate the catalogue
    ///
    /// Validation warnings are logged and returned; they never fail the load.
    pub async fn load(&self) -> Result<LoadedCatalogue, LoadError> {
        let text = match self.source.fetch(&self.client).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(source = %self.source, error = %err, "Error loading templates");
                return Err(err);
            }
        };

        let loaded = self.load_str(&text)?;
        tracing::info!(
            source = %self.source,
            cases = ?loaded.catalogue.case_ids(),
            "Templates loaded"
        );
        Ok(loaded)
    }

    /// Parse and validate an already-fetched document
    pub fn load_str(&self, text: &str) -> Result<LoadedCatalogue, LoadError> {
        let document = CatalogueDocument::parse(text)?;

        let mut warnings = self.validator.validate(&document);
        let (catalogue, skipped) = Catalogue::from_document(&document);
        let unreadable: Vec<_> = skipped
            .into_iter()
            .filter(|warning| !already_reported(&warnings, warning))
            .collect();
        warnings.extend(unreadable);

        for warning in &warnings {
            tracing::warn!(%warning, "Catalogue validation");
        }

        Ok(LoadedCatalogue {
            catalogue: Arc::new(catalogue),
            warnings,
        })
    }
}

/// A template the shape check already flagged is reported once
fn already_reported(warnings: &[ValidationWarning], warning: &ValidationWarning) -> bool {
    let ValidationWarning::Unreadable { case_id, .. } = warning else {
        return false;
    };
    warnings
        .iter()
        .any(|w| matches!(w, ValidationWarning::InvalidStructure(id) if id == case_id))
}

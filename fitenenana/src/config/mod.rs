//! Configuration management
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `FITENENANA_` prefix, `__` for nesting)
//! 2. `./config.toml` (development)
//! 3. `~/.config/fitenenana/config.toml` (user config, XDG)
//! 4. `/etc/fitenenana/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [catalogue]
//! source = "https://example.org/templates.json"
//!
//! [session]
//! max_age_secs = 3600
//!
//! [export]
//! share_command = ["wl-copy"]
//! output_dir = "./exports"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use fitenenana::config::FitenenanaConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = FitenenanaConfig::load()?;
//! let addr = config.server.socket_addr()?;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::catalogue::{source::BUNDLED_SOURCE, CatalogueSource, Validator, REQUIRED_CASES};

/// Application name used for config directories
pub const APP_NAME: &str = "fitenenana";

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerSettings {
    /// Socket address to bind
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not an IP address
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Catalogue settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueSettings {
    /// `bundled`, a file path or an HTTP(S) URL of the catalogue document
    pub source: String,

    /// Case identifiers the validator expects
    pub required_cases: Vec<String>,
}

impl Default for CatalogueSettings {
    fn default() -> Self {
        Self {
            source: BUNDLED_SOURCE.to_string(),
            required_cases: REQUIRED_CASES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl CatalogueSettings {
    /// Parsed catalogue source
    #[must_use]
    pub fn source(&self) -> CatalogueSource {
        match self.source.parse() {
            Ok(source) => source,
            Err(never) => match never {},
        }
    }

    /// Validator for the configured required cases
    #[must_use]
    pub fn validator(&self) -> Validator {
        Validator::new(&self.required_cases)
    }
}

/// Session cookie settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Session cookie name
    pub cookie_name: String,

    /// Idle session lifetime in seconds
    pub max_age_secs: u64,

    /// Enable secure cookies (HTTPS only)
    pub secure_cookies: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "fitenenana_session".to_string(),
            max_age_secs: 86400, // 24 hours
            secure_cookies: !cfg!(debug_assertions),
        }
    }
}

impl SessionSettings {
    /// Idle lifetime as a `chrono` duration
    #[must_use]
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.max_age_secs).unwrap_or(i64::MAX))
    }
}

/// Desktop export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Share command (program and arguments) fed the document on stdin;
    /// empty disables sharing
    pub share_command: Vec<String>,

    /// Directory exported files are written to
    pub output_dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            share_command: Vec::new(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitenenanaConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Catalogue settings
    #[serde(default)]
    pub catalogue: CatalogueSettings,

    /// Session settings
    #[serde(default)]
    pub session: SessionSettings,

    /// Export settings
    #[serde(default)]
    pub export: ExportSettings,
}

impl FitenenanaConfig {
    /// Load configuration from the standard locations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file cannot be parsed
    /// - Configuration values fail type conversion
    pub fn load() -> anyhow::Result<Self> {
        let mut figment = Figment::new()
            // 5. Start with defaults (lowest priority)
            .merge(Toml::string(&toml::to_string(&Self::default())?));

        // 4. System config
        let system_config = PathBuf::from("/etc").join(APP_NAME).join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        // 3. User config
        let user_config = Self::recommended_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        // 2. Local config
        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        // 1. Environment variables
        figment = figment.merge(Env::prefixed("FITENENANA_").split("__").lowercase(true));

        Ok(figment.extract()?)
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or values fail
    /// type conversion
    pub fn load_from(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let config = Figment::new()
            .merge(Toml::string(&toml::to_string(&Self::default())?))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("FITENENANA_").split("__").lowercase(true))
            .extract()?;

        Ok(config)
    }

    /// Recommended XDG config path
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| config_dir.join(APP_NAME).join("config.toml"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FitenenanaConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.session.cookie_name, "fitenenana_session");
        assert_eq!(config.session.max_age_secs, 86400);
        assert_eq!(config.catalogue.required_cases.len(), 5);
        assert!(config.export.share_command.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerSettings::default();
        assert_eq!(server.socket_addr().unwrap().to_string(), "127.0.0.1:3000");

        let bad = ServerSettings {
            host: "not a host".to_string(),
            port: 1,
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_catalogue_source_kinds() {
        let mut settings = CatalogueSettings::default();
        assert_eq!(settings.source(), CatalogueSource::Bundled);

        settings.source = "./assets/templates.json".to_string();
        assert!(matches!(settings.source(), CatalogueSource::File(_)));

        settings.source = "https://example.org/templates.json".to_string();
        assert_eq!(
            settings.source(),
            CatalogueSource::Remote("https://example.org/templates.json".to_string())
        );
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 8080\n\n[catalogue]\nrequired_cases = [\"fiterahana\"]\n"
        )
        .unwrap();

        let config = FitenenanaConfig::load_from(file.path()).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.catalogue.required_cases, vec!["fiterahana"]);
        assert_eq!(config.catalogue.validator().required_cases(), ["fiterahana"]);
    }

    #[test]
    fn test_session_max_age() {
        let settings = SessionSettings {
            max_age_secs: 60,
            ..SessionSettings::default()
        };
        assert_eq!(settings.max_age(), chrono::Duration::seconds(60));
    }
}

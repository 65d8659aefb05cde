//! Session cookie middleware
//!
//! Reads the session identifier from its cookie, issuing a fresh one when the
//! cookie is missing or malformed, and exposes it to handlers through request
//! extensions. Session state itself lives in the [`SessionStore`].
//!
//! [`SessionStore`]: crate::session::SessionStore

use std::str::FromStr;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{body::Body, extract::Request, response::Response};
use http::header::{COOKIE, SET_COOKIE};
use tower::{Layer, Service};

use crate::config::SessionSettings;
use crate::session::SessionId;

/// Default session cookie name
pub const SESSION_COOKIE_NAME: &str = "fitenenana_session";

/// Session cookie configuration
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Cookie name
    pub cookie_name: String,
    /// Cookie path
    pub cookie_path: String,
    /// HttpOnly flag
    pub http_only: bool,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// SameSite policy
    pub same_site: SameSite,
    /// Cookie lifetime in seconds
    pub max_age_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            cookie_path: "/".to_string(),
            http_only: true,
            secure: !cfg!(debug_assertions),
            same_site: SameSite::Lax,
            max_age_secs: 86400, // 24 hours
        }
    }
}

impl From<&SessionSettings> for SessionConfig {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            cookie_name: settings.cookie_name.clone(),
            secure: settings.secure_cookies,
            max_age_secs: settings.max_age_secs,
            ..Self::default()
        }
    }
}

/// Cookie SameSite policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SameSite {
    /// Strict
    Strict,
    /// Lax
    #[default]
    Lax,
    /// None (requires Secure)
    None,
}

impl SameSite {
    /// Attribute value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

/// Layer installing [`SessionMiddleware`]
#[derive(Clone, Debug, Default)]
pub struct SessionLayer {
    config: SessionConfig,
}

impl SessionLayer {
    /// Layer with the given cookie configuration
    #[must_use]
    pub const fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionMiddleware {
            inner,
            config: Arc::new(self.config.clone()),
        }
    }
}

/// Middleware resolving the request's [`SessionId`]
#[derive(Clone, Debug)]
pub struct SessionMiddleware<S> {
    inner: S,
    config: Arc<SessionConfig>,
}

impl<S> Service<Request> for SessionMiddleware<S>
where
    S: Service<Request, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let config = self.config.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let (session_id, is_new) = match extract_session_id(&req, &config.cookie_name) {
                Some(id) => (id, false),
                None => (SessionId::generate(), true),
            };

            req.extensions_mut().insert(session_id.clone());

            let mut response = inner.call(req).await?;

            if is_new {
                tracing::debug!(session = %session_id, "Session issued");
                set_session_cookie(&mut response, &session_id, &config);
            }

            Ok(response)
        })
    }
}

fn extract_session_id(req: &Request, cookie_name: &str) -> Option<SessionId> {
    let cookie_str = req.headers().get(COOKIE)?.to_str().ok()?;

    cookie_str
        .split(';')
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| name.trim() == cookie_name)
        .and_then(|(_, value)| SessionId::from_str(value.trim()).ok())
}

fn set_session_cookie(response: &mut Response<Body>, session_id: &SessionId, config: &SessionConfig) {
    let mut cookie_value = format!(
        "{}={}; Path={}; Max-Age={}; SameSite={}",
        config.cookie_name,
        session_id.as_str(),
        config.cookie_path,
        config.max_age_secs,
        config.same_site.as_str()
    );

    if config.http_only {
        cookie_value.push_str("; HttpOnly");
    }

    if config.secure {
        cookie_value.push_str("; Secure");
    }

    if let Ok(header_value) = cookie_value.parse() {
        response.headers_mut().append(SET_COOKIE, header_value);
    }
}

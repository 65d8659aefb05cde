//! Screens and routing
//!
//! The application shows exactly one of four full-page screens at a time.
//! Navigation buttons fetch the next screen with htmx and swap it into
//! `#app`; a plain browser request gets the whole page.

use std::sync::Arc;

use askama::Template;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::catalogue::{Catalogue, FailureKind};
use crate::config::FitenenanaConfig;
use crate::engine::{AnnotatedStep, Span};
use crate::health;
use crate::middleware::{SessionConfig, SessionLayer};
use crate::session::SessionState;
use crate::state::AppState;

pub mod handlers;

/// Title shown on the error screen
pub const ERROR_TITLE: &str = "Olana!";

/// Label of the error screen's retry action
pub const RETRY_LABEL: &str = "Avereno";

/// The mutually exclusive screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Template list
    CaseSelection,
    /// Inline editor for the selected template
    TemplateEditor,
    /// Flattened document
    Preview,
    /// Catalogue load failure
    Error,
}

impl Screen {
    /// Element id of the screen section
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::CaseSelection => "case-selection",
            Self::TemplateEditor => "template-editor",
            Self::Preview => "preview-screen",
            Self::Error => "error",
        }
    }
}

/// One case-selection button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseLink {
    /// Case identifier
    pub case_id: String,
    /// Template title
    pub title: String,
}

/// Case selection screen
#[derive(Template)]
#[template(path = "case_selection.html")]
pub struct CaseSelectionPage {
    /// Element id of this screen
    pub screen: &'static str,
    /// Buttons in catalogue order
    pub cases: Vec<CaseLink>,
}

impl CaseSelectionPage {
    /// Page listing every catalogue entry
    #[must_use]
    pub fn new(catalogue: &Catalogue) -> Self {
        Self {
            screen: Screen::CaseSelection.id(),
            cases: catalogue
                .entries()
                .iter()
                .map(|entry| CaseLink {
                    case_id: entry.case_id.clone(),
                    title: entry.template.title.clone(),
                })
                .collect(),
        }
    }
}

/// Template editor screen
#[derive(Template)]
#[template(path = "editor.html")]
pub struct EditorPage {
    /// Element id of this screen
    pub screen: &'static str,
    /// Document title
    pub title: String,
    /// Annotated steps in template order
    pub steps: Vec<AnnotatedStep>,
}

impl EditorPage {
    /// Editor for a session's current state
    #[must_use]
    pub fn from_session(session: &SessionState) -> Self {
        Self {
            screen: Screen::TemplateEditor.id(),
            title: session.title().to_string(),
            steps: session.render(),
        }
    }
}

/// A flattened step, split at line breaks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewStep {
    /// Section heading
    pub title: String,
    /// Flattened content lines
    pub lines: Vec<String>,
}

/// Preview screen
#[derive(Template)]
#[template(path = "preview.html")]
pub struct PreviewPage {
    /// Element id of this screen
    pub screen: &'static str,
    /// Document title
    pub title: String,
    /// Flattened steps in template order
    pub steps: Vec<PreviewStep>,
}

impl PreviewPage {
    /// Preview of a session's current state
    #[must_use]
    pub fn from_session(session: &SessionState) -> Self {
        Self {
            screen: Screen::Preview.id(),
            title: session.title().to_string(),
            steps: session
                .flatten()
                .into_iter()
                .map(|step| PreviewStep {
                    lines: step.text.split('\n').map(str::to_string).collect(),
                    title: step.title,
                })
                .collect(),
        }
    }
}

/// Error screen
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    /// Element id of this screen
    pub screen: &'static str,
    /// Heading
    pub heading: &'static str,
    /// Failure message
    pub message: &'static str,
    /// Retry button label
    pub retry: &'static str,
}

impl ErrorPage {
    /// Error screen for a load failure
    #[must_use]
    pub const fn new(kind: FailureKind) -> Self {
        Self {
            screen: Screen::Error.id(),
            heading: ERROR_TITLE,
            message: kind.message(),
            retry: RETRY_LABEL,
        }
    }
}

/// Export payload fragment read by the page script
#[derive(Template)]
#[template(path = "export_payload.html")]
pub struct ExportPayload {
    /// Document text
    pub text: String,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let session_layer = SessionLayer::new(SessionConfig::from(&state.config().session));

    Router::new()
        .route("/", get(handlers::index))
        .route("/cases/{case_id}", post(handlers::select_case))
        .route("/editor", get(handlers::editor))
        .route("/edit/field/{step}/{field}", post(handlers::edit_field))
        .route("/edit/variable/{name}", post(handlers::edit_variable))
        .route("/preview", get(handlers::preview))
        .route("/export", post(handlers::export))
        .route("/export/download", get(handlers::download))
        .route("/retry", post(handlers::retry))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router around an in-memory catalogue, for tests and embedding
pub fn router_with_catalogue(config: FitenenanaConfig, catalogue: Catalogue) -> Router {
    router(AppState::with_catalogue(config, catalogue))
}

/// Shared catalogue, or why there is none
pub(crate) fn ready_catalogue(state: &AppState) -> Result<Arc<Catalogue>, FailureKind> {
    match state.catalogue() {
        crate::state::CatalogueStatus::Ready(catalogue) => Ok(catalogue),
        crate::state::CatalogueStatus::Failed(kind) => Err(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{EditableField, Step, Template, Variables};
    use askama::Template as _;

    fn catalogue() -> Catalogue {
        Catalogue::default().with(
            "fiterahana",
            Template {
                title: "Fiterahana Zaza".to_string(),
                variables: Variables::new().with("zaza", "Koto"),
                steps: vec![Step {
                    title: "Fiarahabana".to_string(),
                    content: "Ry \"havana\"\nteraka i Koto".to_string(),
                    editable_fields: vec![EditableField::new("havana")],
                    ..Step::default()
                }],
            },
        )
    }

    #[test]
    fn test_case_selection_lists_titles() {
        let html = CaseSelectionPage::new(&catalogue()).render().unwrap();

        assert!(html.contains(r#"id="case-selection""#));
        assert!(html.contains(r#"hx-post="/cases/fiterahana""#));
        assert!(html.contains("Fiterahana Zaza"));
    }

    #[test]
    fn test_editor_marks_placeholders() {
        let session = SessionState::select(&catalogue(), "fiterahana").unwrap();
        let html = EditorPage::from_session(&session).render().unwrap();

        assert!(html.contains(r#"data-field="editable-0-0""#));
        assert!(html.contains(r#"hx-post="/edit/field/0/0""#));
        assert!(html.contains(r#"hx-post="/edit/variable/zaza""#));
        assert!(html.contains(r#"data-variable="zaza""#));
        assert!(html.contains("&quot;havana&quot;"));
        assert!(html.contains("<br>"));
    }

    #[test]
    fn test_edits_and_navigation_share_one_queue() {
        let session = SessionState::select(&catalogue(), "fiterahana").unwrap();
        let editor = EditorPage::from_session(&session).render().unwrap();
        let preview = PreviewPage::from_session(&session).render().unwrap();
        let sync = r#"hx-sync="closest #app:queue all""#;

        // two editable spans, the back button and the preview button
        assert_eq!(editor.matches(sync).count(), 4);
        assert_eq!(editor.matches(r#"hx-trigger="input delay:300ms, blur""#).count(), 2);
        assert!(editor.contains(r##"id="preview-btn" hx-get="/preview" hx-target="#app" hx-sync="closest #app:queue all""##));
        assert!(!editor.contains("fetch("));
        assert!(preview.contains(r##"id="export-btn" hx-post="/export" hx-target="#export-payload" hx-sync="closest #app:queue all""##));
    }

    #[test]
    fn test_preview_has_no_editable_markup() {
        let session = SessionState::select(&catalogue(), "fiterahana").unwrap();
        let html = PreviewPage::from_session(&session).render().unwrap();

        assert!(html.contains(r#"id="preview-screen""#));
        assert!(!html.contains("contenteditable"));
        assert!(!html.contains("data-field"));
    }

    #[test]
    fn test_export_payload_keeps_leading_newline() {
        let html = ExportPayload {
            text: "\nRy havana".to_string(),
        }
        .render()
        .unwrap();

        assert!(html.starts_with("<textarea id=\"export-text\" readonly>\n\nRy havana</textarea>"));
    }

    #[test]
    fn test_error_page_messages() {
        let html = ErrorPage::new(FailureKind::Offline).render().unwrap();

        assert!(html.contains("Olana!"));
        assert!(html.contains("Avereno"));
        assert!(html.contains("Tsy misy connexion internet."));
    }

    mod http {
        use super::super::*;
        use crate::state::CatalogueStatus;
        use crate::testing::{
            assert_hx_refresh, assert_hx_trigger_after_settle, assert_screen, fixture_catalogue,
            TestServer,
        };
        use axum::http::StatusCode;
        use std::io::Write;

        fn failed_state(source: &str) -> AppState {
            let mut config = FitenenanaConfig::default();
            config.catalogue.source = source.to_string();
            AppState::with_status(config, CatalogueStatus::Failed(FailureKind::Unavailable))
        }

        #[tokio::test]
        async fn test_unknown_case_is_a_silent_no_op() {
            let server = TestServer::new(router_with_catalogue(
                FitenenanaConfig::default(),
                fixture_catalogue(),
            ))
            .unwrap();

            let response = server.post("/cases/tsy-misy").await;

            response.assert_status(StatusCode::NO_CONTENT);
            assert!(response.text().is_empty());
        }

        #[tokio::test]
        async fn test_htmx_request_gets_partial() {
            let server = TestServer::new(router_with_catalogue(
                FitenenanaConfig::default(),
                fixture_catalogue(),
            ))
            .unwrap();

            let response = server
                .get("/")
                .add_header(
                    axum::http::HeaderName::from_static("hx-request"),
                    axum::http::HeaderValue::from_static("true"),
                )
                .await;

            assert_screen(&response, "case-selection");
            assert!(!response.text().contains("<html"));
        }

        #[tokio::test]
        async fn test_every_screen_shows_error_when_load_failed() {
            let server = TestServer::new(router(failed_state("/tsy/misy.json"))).unwrap();

            for path in ["/", "/editor", "/preview"] {
                let response = server.get(path).await;
                assert_screen(&response, "error");
                assert!(response.text().contains("Tsy afaka naka ny templates."));
            }
        }

        #[tokio::test]
        async fn test_retry_failure_keeps_error_screen() {
            let server = TestServer::new(router(failed_state("/tsy/misy.json"))).unwrap();

            let response = server
                .post("/retry")
                .add_header(
                    axum::http::HeaderName::from_static("hx-request"),
                    axum::http::HeaderValue::from_static("true"),
                )
                .await;

            assert_screen(&response, "error");
            assert!(response.headers().get("HX-Refresh").is_none());
        }

        #[tokio::test]
        async fn test_retry_success_refreshes() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, r#"{{"fiterahana": {{"title": "Fiterahana Zaza", "steps": []}}}}"#)
                .unwrap();
            let state = failed_state(&file.path().to_string_lossy());
            let server = TestServer::new(router(state.clone())).unwrap();

            let response = server
                .post("/retry")
                .add_header(
                    axum::http::HeaderName::from_static("hx-request"),
                    axum::http::HeaderValue::from_static("true"),
                )
                .await;

            assert_hx_refresh(&response);
            assert!(matches!(state.catalogue(), CatalogueStatus::Ready(_)));
        }

        #[tokio::test]
        async fn test_health_reports_failed_catalogue() {
            let server = TestServer::new(router(failed_state("/tsy/misy.json"))).unwrap();

            let response = server.get("/health").await;

            response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
            let body: serde_json::Value = response.json();
            assert_eq!(body["components"]["catalogue"]["status"], "unhealthy");
        }

        #[tokio::test]
        async fn test_export_triggers_clipboard_copy() {
            let server = TestServer::new(router_with_catalogue(
                FitenenanaConfig::default(),
                fixture_catalogue(),
            ))
            .unwrap();
            let cookie = server.get("/").await.headers()[axum::http::header::SET_COOKIE]
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_string();
            let cookie = axum::http::HeaderValue::from_str(&cookie).unwrap();

            server
                .post("/cases/fiterahana")
                .add_header(axum::http::header::COOKIE, cookie.clone())
                .await
                .assert_status_ok();
            let response = server
                .post("/export")
                .add_header(axum::http::header::COOKIE, cookie)
                .form(&[("share", "false"), ("clipboard", "true")])
                .await;

            assert_hx_trigger_after_settle(&response, "fitenenana:copy");
            assert!(response.text().contains("Ry &quot;havana&quot;, teraka i Koto."));
        }

        #[tokio::test]
        async fn test_export_without_selection_conflicts() {
            let server = TestServer::new(router_with_catalogue(
                FitenenanaConfig::default(),
                fixture_catalogue(),
            ))
            .unwrap();

            server
                .get("/export/download")
                .await
                .assert_status(StatusCode::CONFLICT);
        }
    }
}

//! Askama rendering with HTMX partial detection
//!
//! Every screen template extends `layout.html`, which wraps the screen body in
//! partial markers. Full page loads get the whole document; htmx requests get
//! only the marked screen body, swapped into `#app`.
//!
//! # Examples
//!
//! ```rust
//! use askama::Template;
//! use fitenenana::template::HxTemplate;
//! use fitenenana::htmx::HxRequest;
//!
//! #[derive(Template)]
//! #[template(source = "<h1>{{ title }}</h1>", ext = "html")]
//! struct TitleTemplate {
//!     title: String,
//! }
//!
//! async fn index(HxRequest(is_htmx): HxRequest) -> impl axum::response::IntoResponse {
//!     TitleTemplate { title: "Fitenenana".to_string() }.render_htmx(is_htmx)
//! }
//! ```

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

pub mod extractor;

pub use extractor::extract_partial;

/// Rendering helpers for askama templates
pub trait HxTemplate: Template {
    /// Render the full page, or only the partial for htmx requests
    fn render_htmx(self, is_htmx: bool) -> Response
    where
        Self: Sized,
    {
        match self.render() {
            Ok(html) if is_htmx => Html(extract_partial(&html).into_owned()).into_response(),
            Ok(html) => Html(html).into_response(),
            Err(err) => render_failed(&err),
        }
    }

    /// Render the whole template
    fn render_html(self) -> Response
    where
        Self: Sized,
    {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => render_failed(&err),
        }
    }
}

impl<T> HxTemplate for T where T: Template {}

fn render_failed(err: &askama::Error) -> Response {
    tracing::error!("Template rendering error: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Template rendering failed",
    )
        .into_response()
}

//! Request handlers

use askama::Template;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use super::{
    ready_catalogue, CaseSelectionPage, EditorPage, ErrorPage, ExportPayload, PreviewPage,
};
use crate::engine::FieldId;
use crate::error::FitenenanaError;
use crate::export::web::{web_chain, ClientCapabilities};
use crate::export::ExportDocument;
use crate::extractors::CurrentSession;
use crate::htmx::{ExportEventDetail, HxRefresh, HxRequest};
use crate::session::{SessionError, SessionId, SessionState};
use crate::state::AppState;
use crate::template::HxTemplate;

/// Live text posted by an editable span
#[derive(Debug, Deserialize)]
pub struct EditForm {
    /// Current text content of the span
    #[serde(default)]
    pub value: String,
}

/// `GET /`: case selection, or the error screen
pub async fn index(State(state): State<AppState>, HxRequest(is_htmx): HxRequest) -> Response {
    match ready_catalogue(&state) {
        Ok(catalogue) => CaseSelectionPage::new(&catalogue).render_htmx(is_htmx),
        Err(kind) => ErrorPage::new(kind).render_htmx(is_htmx),
    }
}

/// `POST /cases/{case_id}`: start a session on a template
///
/// An unknown case is logged and answered with 204, leaving the page as is.
pub async fn select_case(
    State(state): State<AppState>,
    CurrentSession(id): CurrentSession,
    HxRequest(is_htmx): HxRequest,
    Path(case_id): Path<String>,
) -> Response {
    let catalogue = match ready_catalogue(&state) {
        Ok(catalogue) => catalogue,
        Err(kind) => return ErrorPage::new(kind).render_htmx(is_htmx),
    };

    if state.sessions().select_case(&id, &catalogue, &case_id).is_err() {
        return StatusCode::NO_CONTENT.into_response();
    }

    render_session(&state, &id, is_htmx, EditorPage::from_session)
}

/// `GET /editor`: the editor for the selected template
pub async fn editor(
    State(state): State<AppState>,
    CurrentSession(id): CurrentSession,
    HxRequest(is_htmx): HxRequest,
) -> Response {
    render_session(&state, &id, is_htmx, EditorPage::from_session)
}

/// `POST /edit/field/{step}/{field}`: record a field's live text
pub async fn edit_field(
    State(state): State<AppState>,
    CurrentSession(id): CurrentSession,
    Path((step, field)): Path<(usize, usize)>,
    Form(form): Form<EditForm>,
) -> Result<StatusCode, FitenenanaError> {
    state
        .sessions()
        .update(&id, |session| session.set_field(FieldId::new(step, field), form.value))?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /edit/variable/{name}`: record a variable's current value
pub async fn edit_variable(
    State(state): State<AppState>,
    CurrentSession(id): CurrentSession,
    Path(name): Path<String>,
    Form(form): Form<EditForm>,
) -> Result<StatusCode, FitenenanaError> {
    state
        .sessions()
        .update(&id, |session| session.set_variable(&name, form.value))?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /preview`: the flattened document
pub async fn preview(
    State(state): State<AppState>,
    CurrentSession(id): CurrentSession,
    HxRequest(is_htmx): HxRequest,
) -> Response {
    render_session(&state, &id, is_htmx, PreviewPage::from_session)
}

/// `POST /export`: pick a delivery strategy for the document
///
/// Answers with the document text and an event telling the page which
/// strategy to carry out.
pub async fn export(
    State(state): State<AppState>,
    CurrentSession(id): CurrentSession,
    Form(capabilities): Form<ClientCapabilities>,
) -> Result<Response, FitenenanaError> {
    let document = state.sessions().read(&id, ExportDocument::from_session)?;
    let delivery = web_chain(&capabilities).deliver(&document).await?;
    let trigger = ExportEventDetail::new(&delivery, &document).into_trigger()?;
    let payload = ExportPayload {
        text: document.text,
    }
    .render()?;

    Ok((trigger, Html(payload)).into_response())
}

/// `GET /export/download`: the document as a text attachment
pub async fn download(
    State(state): State<AppState>,
    CurrentSession(id): CurrentSession,
) -> Result<Response, FitenenanaError> {
    let document = state.sessions().read(&id, ExportDocument::from_session)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    if let Ok(value) = HeaderValue::from_str(&content_disposition(&document.filename)) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok((StatusCode::OK, headers, document.text).into_response())
}

/// `POST /retry`: load the catalogue again and reload the application
pub async fn retry(State(state): State<AppState>, HxRequest(is_htmx): HxRequest) -> Response {
    match state.reload().await {
        Ok(()) if is_htmx => (HxRefresh(true), Html("")).into_response(),
        Ok(()) => Redirect::to("/").into_response(),
        Err(err) => ErrorPage::new(err.kind()).render_htmx(is_htmx),
    }
}

/// Render a session-backed screen
///
/// Falls back to the error screen when the catalogue is unavailable and to
/// case selection when no case has been selected.
fn render_session<T: Template>(
    state: &AppState,
    id: &SessionId,
    is_htmx: bool,
    page: impl FnOnce(&SessionState) -> T,
) -> Response {
    let catalogue = match ready_catalogue(state) {
        Ok(catalogue) => catalogue,
        Err(kind) => return ErrorPage::new(kind).render_htmx(is_htmx),
    };

    match state.sessions().read(id, page) {
        Ok(page) => page.render_htmx(is_htmx),
        Err(SessionError::NoSelection) => CaseSelectionPage::new(&catalogue).render_htmx(is_htmx),
        Err(err) => FitenenanaError::from(err).into_response(),
    }
}

/// `attachment` disposition with an ASCII fallback name and the UTF-8 name
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    let encoded: String = filename
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
                char::from(b).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

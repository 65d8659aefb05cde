//! Axum extractors
//!
//! The session identifier is placed in request extensions by
//! [`SessionMiddleware`](crate::middleware::SessionMiddleware).

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::session::SessionId;

/// Session identifier of the current request
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionId);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .map(Self)
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "Session not initialized"))
    }
}

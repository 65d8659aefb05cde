//! Health check endpoints
//!
//! `GET /health` reports the catalogue status and the number of live
//! sessions; `GET /health/live` only answers that the process is up.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::state::{AppState, CatalogueStatus};

/// Overall or per-component health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Fully operational
    Healthy,
    /// Not serving its purpose
    Unhealthy,
}

/// Health of one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component status
    pub status: HealthStatus,
    /// Optional detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    /// Healthy component with a detail message
    #[must_use]
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: Some(message.into()),
        }
    }

    /// Unhealthy component
    #[must_use]
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
        }
    }
}

/// Health check response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Worst component status
    pub status: HealthStatus,
    /// Crate version
    pub version: String,
    /// Components by name
    pub components: BTreeMap<String, ComponentHealth>,
}

impl HealthCheckResponse {
    /// Empty, healthy response
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            version: version.into(),
            components: BTreeMap::new(),
        }
    }

    /// Add a component and recompute the overall status
    pub fn add_component(&mut self, name: impl Into<String>, health: ComponentHealth) {
        self.components.insert(name.into(), health);
        self.status = if self
            .components
            .values()
            .any(|c| c.status == HealthStatus::Unhealthy)
        {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        };
    }

    /// HTTP status for the overall status
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for HealthCheckResponse {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

/// Liveness probe
#[allow(clippy::unused_async)]
pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Full health check
#[allow(clippy::unused_async)]
pub async fn health_check(State(state): State<AppState>) -> HealthCheckResponse {
    let mut response = HealthCheckResponse::new(env!("CARGO_PKG_VERSION"));

    let catalogue = match state.catalogue() {
        CatalogueStatus::Ready(catalogue) => {
            ComponentHealth::healthy(format!("{} templates", catalogue.len()))
        }
        CatalogueStatus::Failed(kind) => ComponentHealth::unhealthy(kind.message()),
    };
    response.add_component("catalogue", catalogue);
    response.add_component(
        "sessions",
        ComponentHealth::healthy(format!("{} active", state.sessions().len())),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhealthy_component_marks_response_unhealthy() {
        let mut response = HealthCheckResponse::new("0.1.0");
        response.add_component("sessions", ComponentHealth::healthy("0 active"));
        assert_eq!(response.status_code(), StatusCode::OK);

        response.add_component("catalogue", ComponentHealth::unhealthy("down"));
        assert_eq!(response.status, HealthStatus::Unhealthy);
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_serializes_lowercase_status() {
        let json = serde_json::to_value(ComponentHealth::healthy("ok")).unwrap();
        assert_eq!(json["status"], "healthy");
    }
}

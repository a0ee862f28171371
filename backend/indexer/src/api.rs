//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db;
use crate::errors::{IndexerError, Result};
use crate::events::{EventRecord, ProjectRecord, TokenRecord, UserPassport};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub registry_contract_id: String,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub contract_id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct ProjectsResponse {
    pub registry: String,
    pub count: usize,
    pub projects: Vec<ProjectRecord>,
}

#[derive(Serialize)]
pub struct TokensResponse {
    pub project: String,
    pub count: usize,
    pub tokens: Vec<TokenRecord>,
}

#[derive(Serialize)]
pub struct PassportsResponse {
    pub user: String,
    pub passports: Vec<UserPassport>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub names: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub addresses: Vec<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(err: IndexerError) -> Response {
    let status = match err {
        IndexerError::UnknownProject(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Map project names to their registered addresses, keeping request order.
/// The first name with no registered project fails the whole lookup.
pub fn resolve_project_addresses(
    projects: &[ProjectRecord],
    names: &[String],
) -> Result<Vec<String>> {
    names
        .iter()
        .map(|name| {
            projects
                .iter()
                .find(|p| &p.name == name)
                .map(|p| p.address.clone())
                .ok_or_else(|| IndexerError::UnknownProject(name.clone()))
        })
        .collect()
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
///
/// Returns every indexed event, registry and projects alike.
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Response {
    match db::get_all_events(&state.pool).await {
        Ok(events) => {
            let count = events.len();
            Json(AllEventsResponse { count, events }).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// `GET /projects/:address/events`
pub async fn get_project_events(
    State(state): State<Arc<ApiState>>,
    Path(contract_id): Path<String>,
) -> Response {
    match db::get_events_for_contract(&state.pool, &contract_id).await {
        Ok(events) => {
            let count = events.len();
            Json(EventsResponse {
                contract_id,
                count,
                events,
            })
            .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// `GET /projects`
///
/// Projects added to the configured registry, in registration order.
pub async fn list_projects(State(state): State<Arc<ApiState>>) -> Response {
    match db::get_projects(&state.pool, &state.registry_contract_id).await {
        Ok(projects) => Json(ProjectsResponse {
            registry: state.registry_contract_id.clone(),
            count: projects.len(),
            projects,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /projects/:address/tokens`
pub async fn get_project_tokens(
    State(state): State<Arc<ApiState>>,
    Path(project): Path<String>,
) -> Response {
    match db::get_tokens(&state.pool, &project).await {
        Ok(tokens) => Json(TokensResponse {
            project,
            count: tokens.len(),
            tokens,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /users/:address/passports`
///
/// One entry per registered project; untouched projects read `unavailable`.
pub async fn get_user_passports(
    State(state): State<Arc<ApiState>>,
    Path(user): Path<String>,
) -> Response {
    match db::get_user_passports(&state.pool, &state.registry_contract_id, &user).await {
        Ok(passports) => Json(PassportsResponse { user, passports }).into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /projects/resolve`
pub async fn resolve_projects(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ResolveRequest>,
) -> Response {
    let resolved = match db::get_projects(&state.pool, &state.registry_contract_id).await {
        Ok(projects) => resolve_project_addresses(&projects, &request.names),
        Err(e) => Err(e),
    };
    match resolved {
        Ok(addresses) => Json(ResolveResponse { addresses }).into_response(),
        Err(e) => error_response(e),
    }
}

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::error::ApiError;
use crate::requests::{ALL_REQUEST_TYPES, RequestStatus, RequestType, SupportRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T: Serialize> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub reference_id: String,
    pub status: RequestStatus,
    pub items: Vec<SupportRequest>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct RequestTypeOption {
    pub value: RequestType,
    pub label: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/workflow/requests",
            get(list_requests).post(super::workflow::submit),
        )
        .route(
            "/api/workflow/requests/{reference_id}/toggle",
            post(toggle_status),
        )
        .route("/api/request-types", get(request_types))
}

async fn list_requests(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<SupportRequest>>, ApiError> {
    let items = state.console.list_requests().await?;
    Ok(Json(items.into()))
}

#[tracing::instrument(skip(state), err)]
async fn toggle_status(
    State(state): State<AppState>,
    Path(reference_id): Path<String>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let outcome = state.console.toggle_status(&reference_id).await?;
    Ok(Json(ToggleResponse {
        reference_id: outcome.reference_id,
        status: outcome.status,
        total: outcome.requests.len(),
        items: outcome.requests,
    }))
}

async fn request_types() -> Json<Vec<RequestTypeOption>> {
    Json(
        ALL_REQUEST_TYPES
            .iter()
            .map(|&value| RequestTypeOption {
                value,
                label: value.label(),
            })
            .collect(),
    )
}

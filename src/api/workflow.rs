use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::customer::UserType;
use crate::error::ApiError;
use crate::gateway::VerificationMethod;
use crate::requests::RequestForm;
use crate::state::AppState;
use crate::workflow::{ConsoleSection, WorkflowSnapshot, WorkflowStep};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub user_type: UserType,
    pub method: VerificationMethod,
    pub identifier: String,
}

#[derive(Debug, Deserialize)]
pub struct TabSwitchRequest {
    pub section: ConsoleSection,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub step: WorkflowStep,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/workflow", get(snapshot))
        .route("/api/workflow/verify", post(verify))
        .route("/api/workflow/start-create", post(start_create))
        .route("/api/workflow/start-modify-mobile", post(start_modify_mobile))
        .route("/api/workflow/overview", post(return_to_overview))
        .route("/api/workflow/reset", post(reset))
        .route("/api/workflow/tab-switch", post(tab_switch))
        .route("/api/workflow/navigate", post(navigate))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn snapshot(State(state): State<AppState>) -> Json<WorkflowSnapshot> {
    Json(state.console.snapshot().await)
}

// Identifier is a mobile number or email; keep it out of the span.
#[tracing::instrument(skip(state, body), fields(user_type = %body.user_type, method = %body.method), err)]
async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<WorkflowSnapshot>, ApiError> {
    let snap = state
        .console
        .verify(body.user_type, body.method, &body.identifier)
        .await?;
    Ok(Json(snap))
}

async fn start_create(State(state): State<AppState>) -> Result<Json<WorkflowSnapshot>, ApiError> {
    Ok(Json(state.console.start_create().await?))
}

async fn start_modify_mobile(
    State(state): State<AppState>,
) -> Result<Json<WorkflowSnapshot>, ApiError> {
    Ok(Json(state.console.start_modify_mobile().await?))
}

/// Submit the request form for the active customer.
#[tracing::instrument(skip(state, form), fields(request_type = %form.request_type), err)]
pub(super) async fn submit(
    State(state): State<AppState>,
    Json(form): Json<RequestForm>,
) -> Result<Json<WorkflowSnapshot>, ApiError> {
    Ok(Json(state.console.submit(form).await?))
}

async fn return_to_overview(
    State(state): State<AppState>,
) -> Result<Json<WorkflowSnapshot>, ApiError> {
    Ok(Json(state.console.return_to_overview().await?))
}

async fn reset(State(state): State<AppState>) -> Result<Json<WorkflowSnapshot>, ApiError> {
    Ok(Json(state.console.reset().await?))
}

async fn tab_switch(
    State(state): State<AppState>,
    Json(body): Json<TabSwitchRequest>,
) -> Result<Json<WorkflowSnapshot>, ApiError> {
    Ok(Json(state.console.tab_switch(body.section).await?))
}

async fn navigate(
    State(state): State<AppState>,
    Json(body): Json<NavigateRequest>,
) -> Result<Json<WorkflowSnapshot>, ApiError> {
    Ok(Json(state.console.navigate(body.step).await?))
}

//! Project endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use teamtempo_auth::PrincipalDirectory;
use teamtempo_planning::{Planning, ProjectInput, ProjectView};

use crate::auth::CurrentPrincipal;
use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::state::GatewayState;

/// Update a project.
///
/// `PUT /projects/{uuid}`
///
/// # Errors
///
/// Returns 400 for a malformed or mismatched uuid and 404 if the project
/// does not belong to one of the caller's teams.
pub async fn update_project<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(uuid): Path<String>,
    ApiJson(input): ApiJson<ProjectInput>,
) -> Result<Json<ProjectView>, ApiError>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    let project = state
        .planning
        .update_project(&principal.user_id, &uuid, input)
        .await?;
    Ok(Json(project))
}

/// Delete a project.
///
/// `DELETE /projects/{uuid}`
///
/// # Errors
///
/// Returns 404 if the project does not belong to one of the caller's teams.
pub async fn delete_project<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(uuid): Path<String>,
) -> Result<StatusCode, ApiError>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    state
        .planning
        .delete_project(&principal.user_id, &uuid)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

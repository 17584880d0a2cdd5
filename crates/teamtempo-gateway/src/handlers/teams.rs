//! Team endpoints.
//!
//! Every handler acts on the caller's own teams only.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use teamtempo_auth::PrincipalDirectory;
use teamtempo_planning::{Planning, ProjectInput, ProjectView, TeamInput, TeamView};

use crate::auth::CurrentPrincipal;
use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::state::GatewayState;

/// List the caller's teams.
///
/// `GET /teams/my-teams`
///
/// # Errors
///
/// Returns 500 if storage fails.
pub async fn my_teams<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<Json<Vec<TeamView>>, ApiError>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    let teams = state.planning.my_teams(&principal.user_id).await?;
    Ok(Json(teams))
}

/// Create a team.
///
/// `POST /teams`
///
/// # Errors
///
/// Returns 400 if the body carries a uuid and 422 for invalid fields.
pub async fn create_team<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    ApiJson(input): ApiJson<TeamInput>,
) -> Result<Json<TeamView>, ApiError>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    let team = state.planning.create_team(&principal.user_id, input).await?;
    Ok(Json(team))
}

/// Update a team.
///
/// `PUT /teams/{uuid}`
///
/// # Errors
///
/// Returns 400 for a malformed or mismatched uuid and 404 if the caller
/// has no such team.
pub async fn update_team<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(uuid): Path<String>,
    ApiJson(input): ApiJson<TeamInput>,
) -> Result<Json<TeamView>, ApiError>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    let team = state
        .planning
        .update_team(&principal.user_id, &uuid, input)
        .await?;
    Ok(Json(team))
}

/// Delete a team and its projects.
///
/// `DELETE /teams/{uuid}`
///
/// # Errors
///
/// Returns 404 if the caller has no such team.
pub async fn delete_team<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(uuid): Path<String>,
) -> Result<StatusCode, ApiError>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    state.planning.delete_team(&principal.user_id, &uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete several teams at once.
///
/// `DELETE /teams` with a JSON array of uuids.
///
/// # Errors
///
/// Returns 400 for an empty list and 404 if any team is missing, in which
/// case nothing is deleted.
pub async fn delete_teams<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    ApiJson(uuids): ApiJson<Vec<String>>,
) -> Result<StatusCode, ApiError>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    state.planning.delete_teams(&principal.user_id, &uuids).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a team's projects.
///
/// `GET /teams/{uuid}/projects`
///
/// # Errors
///
/// Returns 404 if the caller has no such team.
pub async fn team_projects<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(uuid): Path<String>,
) -> Result<Json<Vec<ProjectView>>, ApiError>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    let projects = state
        .planning
        .team_projects(&principal.user_id, &uuid)
        .await?;
    Ok(Json(projects))
}

/// Create a project in a team.
///
/// `POST /teams/{uuid}/projects`
///
/// # Errors
///
/// Returns 404 if the caller has no such team and 422 for invalid fields.
pub async fn create_project<C, D>(
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
        .create_project(&principal.user_id, &uuid, input)
        .await?;
    Ok(Json(project))
}

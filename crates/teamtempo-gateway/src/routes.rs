//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use teamtempo_auth::PrincipalDirectory;
use teamtempo_planning::Planning;

use crate::auth::{authenticate, authorize};
use crate::handlers::{self, auth, health, projects, teams};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// Each request passes, outermost first, through tracing, CORS, the body
/// limit, the timeout, the authentication gate, and the rule table.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `POST /auth/login` - Exchange credentials for a token
/// - `POST /auth/signup` - Register an account
///
/// ## Authenticated
/// - `POST /auth/logout` - Clear the request's security context
/// - `GET /teams/my-teams` - List the caller's teams
/// - `POST /teams` - Create team
/// - `DELETE /teams` - Delete selected teams
/// - `PUT /teams/{uuid}` - Update team
/// - `DELETE /teams/{uuid}` - Delete team
/// - `GET /teams/{uuid}/projects` - List a team's projects
/// - `POST /teams/{uuid}/projects` - Create project
/// - `PUT /projects/{uuid}` - Update project
/// - `DELETE /projects/{uuid}` - Delete project
pub fn create_router<C, D>(state: GatewayState<C, D>) -> Router
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    // Extract config values before moving state
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Authentication
        .route("/auth/login", post(auth::login::<C, D>))
        .route("/auth/signup", post(auth::signup::<C, D>))
        .route("/auth/logout", post(auth::logout::<C, D>))
        // Teams
        .route("/teams/my-teams", get(teams::my_teams::<C, D>))
        .route(
            "/teams",
            post(teams::create_team::<C, D>).delete(teams::delete_teams::<C, D>),
        )
        .route(
            "/teams/{uuid}",
            put(teams::update_team::<C, D>).delete(teams::delete_team::<C, D>),
        )
        .route(
            "/teams/{uuid}/projects",
            get(teams::team_projects::<C, D>).post(teams::create_project::<C, D>),
        )
        // Projects
        .route(
            "/projects/{uuid}",
            put(projects::update_project::<C, D>).delete(projects::delete_project::<C, D>),
        )
        .fallback(handlers::not_found)
        // Innermost first: the gate must run before the rule table
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            authorize::<C, D>,
        ))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            authenticate::<C, D>,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(RequestBodyLimitLayer::new(max_body_bytes))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

pub mod auth;
pub mod error;
pub mod middleware;
pub mod users;
pub mod validate;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use auth::AppState;

/// Assemble the API router. Public routes carry no session; everything
/// else sits behind the JWT middleware.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/users", get(users::list_users))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .with_state(state);

    public_routes.merge(protected_routes)
}

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use scholar_types::api::Claims;
use scholar_types::models::{Role, User};

use crate::auth::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub role: Option<Role>,
}

/// Admin-only listing of every registered user, optionally narrowed to a
/// single role.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<UsersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    match claims.role {
        Role::Admin => {}
        Role::Author | Role::Reviewer | Role::Editor => return Err(ApiError::Forbidden),
    }

    let store = state.store.clone();
    let rows = tokio::task::spawn_blocking(move || store.list_users())
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("spawn_blocking join error: {}", e)))??;

    let mut users = Vec::with_capacity(rows.len());
    for row in &rows {
        users.push(row.to_user()?);
    }

    if let Some(role) = query.role {
        users.retain(|u: &User| u.role == role);
    }

    Ok(Json(users))
}

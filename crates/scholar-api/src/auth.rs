use std::sync::Arc;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::info;
use uuid::Uuid;

use scholar_db::UserStore;
use scholar_db::models::NewUser;
use scholar_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use scholar_types::models::Role;

use crate::error::ApiError;
use crate::validate;

/// Absolute session lifetime. Tokens are never refreshed; a new login
/// issues a fresh one.
pub const SESSION_TTL_HOURS: i64 = 24;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn UserStore>,
    pub jwt_secret: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let valid = validate::validate_registration(&req).map_err(ApiError::Validation)?;

    // Explicit duplicate check for the common case; concurrent duplicates
    // are still decided by the store's uniqueness constraint below.
    let store = state.store.clone();
    let email = valid.email.clone();
    if tokio::task::spawn_blocking(move || store.find_by_email(&email))
        .await
        .map_err(join_err)??
        .is_some()
    {
        return Err(ApiError::Conflict);
    }

    // Argon2 is CPU-bound; keep it off the async runtime.
    let password = valid.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(join_err)??;

    let new = NewUser {
        id: Uuid::new_v4().to_string(),
        email: valid.email,
        name: valid.name,
        password_hash,
        role: valid.role,
        institution: valid.institution,
        department: valid.department,
    };

    let store = state.store.clone();
    let row = tokio::task::spawn_blocking(move || store.create_user(&new))
        .await
        .map_err(join_err)??;

    let user = row.to_user()?;
    info!("Registered user {} with role {}", user.id, user.role);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::InvalidCredentials);
    }

    // An unknown email takes the same exit as a wrong password so the
    // response never reveals whether the account exists.
    let store = state.store.clone();
    let email = req.email.clone();
    let row = tokio::task::spawn_blocking(move || store.find_by_email(&email))
        .await
        .map_err(join_err)??
        .ok_or(ApiError::InvalidCredentials)?;

    let store = state.store.clone();
    let candidate = req.password.clone();
    let stored = row.clone();
    let verified = tokio::task::spawn_blocking(move || store.verify_password(&stored, &candidate))
        .await
        .map_err(join_err)??;

    if !verified {
        return Err(ApiError::InvalidCredentials);
    }

    let user = row.to_user()?;
    let token = create_token(&state.jwt_secret, user.id, user.role)?;
    info!("User {} logged in", user.id);

    Ok(Json(LoginResponse {
        user_id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        token,
    }))
}

/// Current user for the presented session. The role in the claims is
/// trusted as-is; the store lookup only rehydrates the profile.
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.clone();
    let id = claims.sub.to_string();
    let row = tokio::task::spawn_blocking(move || store.find_by_id(&id))
        .await
        .map_err(join_err)??
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(row.to_user()?))
}

/// Self-contained signed token carrying the subject id and role, so
/// authorizing a request needs no user lookup.
pub fn create_token(secret: &str, user_id: Uuid, role: Role) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user_id,
        role,
        exp: (chrono::Utc::now() + chrono::Duration::hours(SESSION_TTL_HOURS)).timestamp()
            as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("Token encoding failed: {}", e)))
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

fn join_err(e: tokio::task::JoinError) -> ApiError {
    ApiError::Internal(anyhow::anyhow!("spawn_blocking join error: {}", e))
}

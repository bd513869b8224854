/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/signup` - Create an account, returns a token
/// - `POST /auth/login` - Exchange credentials for a token
/// - `GET /auth/me` - Current user (behind the bearer middleware)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskflow_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{NewUser, PublicUser},
};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for both signup and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed bearer token (7-day expiry)
    pub token: String,

    /// The authenticated user's public fields
    pub user: PublicUser,
}

/// Register a new user
///
/// Hashes the password with Argon2id, persists the user, and returns a
/// signed token so the client is logged in immediately.
///
/// # Responses
///
/// - 201 with `{token, user}`
/// - 400 when email or password is missing or malformed
/// - 409 when the email is already registered
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let Json(req) = body?;
    req.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let password_hash = password::hash_password(&req.password)?;

    let user = state
        .store
        .create_user(NewUser {
            email: req.email,
            password_hash,
            name: req.name,
        })
        .await?;

    let claims = jwt::Claims::new(user.id, &user.email);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.public(),
        }),
    ))
}

/// Log an existing user in
///
/// # Responses
///
/// - 200 with `{token, user}`
/// - 400 when email or password is missing
/// - 401 for an unknown email or a wrong password, with an identical
///   message for both so the response does not reveal which emails
///   are registered
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = body?;
    req.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let user = state
        .store
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id, &user.email);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: user.public(),
    }))
}

/// Current-user lookup
///
/// The bearer middleware has already validated the token; this just
/// resolves the id against storage. 404 if the row was deleted after
/// the token was issued.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<PublicUser>> {
    let user = state
        .store
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.public()))
}

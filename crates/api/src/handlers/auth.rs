//! Handlers for account creation and authentication
//! (signup, register, login, token, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Form, Json};
use questforge_core::error::CoreError;
use questforge_core::types::DbId;
use questforge_core::user::{validate_username, UserStatus};
use questforge_db::models::user::{CreateUser, User};
use questforge_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, TOKEN_TYPE};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::sign_in::{track_sign_in, ProgressUpdate};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const MSG_BAD_CREDENTIALS: &str = "Invalid username or password";
const MSG_USERNAME_TAKEN: &str = "Username already exists";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(alias = "user_name")]
    pub username: String,
    pub password: String,
    /// Optional initial status; only `new` is accepted.
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for `POST /register` and `POST /login`.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(alias = "user_name")]
    pub username: String,
    pub password: String,
}

/// Bearer token issued by signup, login and `/token`.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Response for `POST /login`: the token plus sign-in quest progress.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: TokenResponse,
    pub user_id: DbId,
    pub quest_updates: Vec<ProgressUpdate>,
}

/// Response for `POST /register`.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /signup
///
/// Create an account and return an access token right away.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    if let Some(raw) = input.status.as_deref() {
        if raw.parse::<UserStatus>()? != UserStatus::New {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Accounts must start with status 'new', got '{raw}'"
            ))));
        }
    }

    let user = create_account(&state, input.username, &input.password).await?;
    let token = issue_token(&state, user.id)?;

    Ok((StatusCode::CREATED, Json(token)))
}

/// POST /register
///
/// Create an account without logging in.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let user = create_account(&state, input.username, &input.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            user_id: user.id,
        }),
    ))
}

/// POST /login
///
/// Authenticate with username + password. Counts the sign-in toward every
/// `sign_in` quest and reports what changed in `quest_updates`.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = authenticate(&state, &input.username, &input.password).await?;
    let quest_updates = track_sign_in(&state, user.id).await;
    let token = issue_token(&state, user.id)?;

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        quest_updates,
    }))
}

/// POST /token
///
/// OAuth2 password-flow style login: form-encoded `username` and `password`.
pub async fn token(
    State(state): State<AppState>,
    Form(input): Form<CredentialsRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = authenticate(&state, &input.username, &input.password).await?;
    track_sign_in(&state, user.id).await;

    Ok(Json(issue_token(&state, user.id)?))
}

/// POST /logout
///
/// Tokens are stateless, so this only confirms the token is still valid;
/// the client discards it.
pub async fn logout(auth: AuthUser) -> Json<MessageResponse> {
    tracing::info!(user_id = auth.user_id, "User logged out");
    Json(MessageResponse {
        message: "Logged out successfully",
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate, hash and insert a new account with the signup bonus.
async fn create_account(state: &AppState, username: String, password: &str) -> AppResult<User> {
    validate_username(&username)?;
    validate_password_strength(password, state.config.min_password_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        username,
        password_hash,
        status: UserStatus::New,
        gold: state.config.signup_bonus_gold,
    };

    let user = match UserRepo::create(&state.pool, &input).await {
        Ok(user) => user,
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(AppError::Core(CoreError::Conflict(
                MSG_USERNAME_TAKEN.into(),
            )));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, "User created");
    Ok(user)
}

/// Check credentials, reject banned accounts and record the login.
async fn authenticate(state: &AppState, username: &str, password: &str) -> AppResult<User> {
    let user = UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(MSG_BAD_CREDENTIALS.into())))?;

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = user.id, "Rejected login with wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            MSG_BAD_CREDENTIALS.into(),
        )));
    }

    if user.status()?.is_banned() {
        return Err(AppError::Core(CoreError::Forbidden("User is banned".into())));
    }

    let user = UserRepo::record_login(&state.pool, user.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.id,
        }))?;

    tracing::info!(user_id = user.id, login_count = user.login_count, "User logged in");
    Ok(user)
}

fn issue_token(state: &AppState, user_id: DbId) -> AppResult<TokenResponse> {
    let access_token = generate_access_token(user_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(TokenResponse {
        access_token,
        token_type: TOKEN_TYPE,
        expires_in: state.config.jwt.expires_in_secs(),
    })
}

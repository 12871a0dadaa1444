//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use folio_core::error::CoreError;
use folio_core::roles::ROLE_ADMIN;

use crate::auth::jwt::issue_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub id: String,
    pub key: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Compare two strings by SHA-256 digest so the comparison cost does not
/// depend on where the inputs diverge.
fn digest_eq(a: &str, b: &str) -> bool {
    Sha256::digest(a.as_bytes()) == Sha256::digest(b.as_bytes())
}

/// POST /auth/login
///
/// Exact-match check of the presented id/key pair against the configured
/// operator credentials. On success, issues a 2-hour `admin` token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let id_ok = digest_eq(&input.id, &state.config.admin_id);
    let key_ok = digest_eq(&input.key, &state.config.admin_key);
    if !id_ok || !key_ok {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    let token = issue_token(&input.id, ROLE_ADMIN, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token issuance failed: {e}")))?;

    tracing::info!(subject = %input.id, "Operator login");
    Ok(Json(LoginResponse { token }))
}

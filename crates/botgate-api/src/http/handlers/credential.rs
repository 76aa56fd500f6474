//! Credential confirmation handler.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::http::extractors::auth::Caller;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckCredentialRequest {
    #[serde(default)]
    pub credential: String,
}

#[derive(Debug, Serialize)]
pub struct CheckCredentialResponse {
    pub credential_confirmed: bool,
}

/// POST /api/v1/credentials/check - Confirm a credential without storing anything.
pub async fn check_credential(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<CheckCredentialRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CheckCredentialResponse>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let Json(body) = body?;

    let credential_confirmed = state
        .bot_service
        .check_credential(caller, &body.credential)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        CheckCredentialResponse {
            credential_confirmed,
        },
        request_id,
        elapsed,
    )))
}

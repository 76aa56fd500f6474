//! Bot CRUD handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use botgate_core::query::ListParams;
use botgate_core::service::bot::BotPage;
use botgate_types::bot::{Bot, BotId, CreateBotRequest, UpdateBotRequest};
use botgate_types::error::BotError;

use crate::http::error::AppError;
use crate::http::extractors::auth::Caller;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Ids that do not parse are reported exactly like ids that do not exist.
fn parse_bot_id(raw: &str) -> Result<BotId, AppError> {
    raw.parse::<BotId>()
        .map_err(|_| AppError::Bot(BotError::NotFound))
}

fn bot_link(id: BotId) -> String {
    format!("/api/v1/bots/{id}")
}

/// POST /api/v1/bots - Create a new bot owned by the caller.
pub async fn create_bot(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<CreateBotRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let Json(body) = body?;

    let bot = state.bot_service.create_bot(caller, body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let location = bot_link(bot.id);
    let resp = ApiResponse::success(bot, request_id, elapsed).with_link("self", &location);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(resp)))
}

/// GET /api/v1/bots - List the caller's bots with search, sorting and paging.
pub async fn list_bots(
    State(state): State<AppState>,
    Caller(caller): Caller,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<BotPage>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let Query(params) = query?;

    let page = state.bot_service.list_own_bots(caller, &params).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(page, request_id, elapsed).with_link("self", "/api/v1/bots"),
    ))
}

/// GET /api/v1/admin/bots - List every bot. Requires `bots:admin`.
pub async fn list_all_bots(
    State(state): State<AppState>,
    Caller(caller): Caller,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<BotPage>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let Query(params) = query?;

    let page = state.bot_service.list_all_bots(caller, &params).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(page, request_id, elapsed).with_link("self", "/api/v1/admin/bots"),
    ))
}

/// GET /api/v1/bots/{id} - Get one of the caller's bots.
pub async fn get_bot(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<Bot>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let id = parse_bot_id(&raw_id)?;

    let bot = state.bot_service.get_bot(caller, id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(bot, request_id, elapsed).with_link("self", &bot_link(id)),
    ))
}

/// PATCH /api/v1/bots/{id} - Change a bot's name and/or credential.
pub async fn update_bot(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateBotRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Bot>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let id = parse_bot_id(&raw_id)?;
    let Json(body) = body?;

    let updated = state.bot_service.update_bot(caller, id, body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(updated, request_id, elapsed).with_link("self", &bot_link(id)),
    ))
}

/// DELETE /api/v1/bots/{id} - Delete a bot permanently.
pub async fn delete_bot(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let id = parse_bot_id(&raw_id)?;

    state.bot_service.delete_bot(caller, id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({"deleted": true, "id": id}),
        request_id,
        elapsed,
    )))
}

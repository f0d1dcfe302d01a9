use std::sync::atomic::Ordering;

use anyhow::anyhow;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use serde::Deserialize;

use chirp_db::models::MessageRow;
use chirp_types::api::{
    FollowRequest, FollowsResponse, LatestResponse, PostMessageRequest, RegisterRequest,
    SimMessage,
};

use crate::error::ApiError;
use crate::state::ApiState;

/// Query parameters shared by every simulator endpoint. Both are kept as
/// raw strings: an unparseable value is ignored, not rejected.
#[derive(Debug, Default, Deserialize)]
pub struct SimQuery {
    pub latest: Option<String>,
    pub no: Option<String>,
}

const DEFAULT_PAGE: i64 = 100;

/// Applied unconditionally before the authorization check; the harness
/// polls `/latest` to confirm commands were seen, authorized or not.
fn update_latest(state: &ApiState, query: &SimQuery) {
    if let Some(raw) = &query.latest {
        if let Ok(value) = raw.parse::<i64>() {
            state.latest.store(value, Ordering::Relaxed);
        }
    }
}

fn authorize(state: &ApiState, headers: &HeaderMap) -> Result<(), ApiError> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if presented != Some(state.auth_header.as_str()) {
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}

fn page_size(query: &SimQuery) -> i64 {
    query
        .no
        .as_deref()
        .and_then(|raw| raw.parse().ok())
        .filter(|n| *n != 0)
        .unwrap_or(DEFAULT_PAGE)
}

fn to_sim_message(row: MessageRow) -> SimMessage {
    SimMessage {
        content: row.text,
        pub_date: row.pub_date,
        user: row.username,
    }
}

pub async fn latest(State(state): State<ApiState>) -> Json<LatestResponse> {
    Json(LatestResponse {
        latest: state.latest.load(Ordering::Relaxed),
    })
}

pub async fn register(
    State(state): State<ApiState>,
    Query(query): Query<SimQuery>,
    headers: HeaderMap,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    update_latest(&state, &query);
    authorize(&state, &headers)?;

    let Json(req) = body.map_err(|_| ApiError::Validation("Bad request".into()))?;

    if req.username.is_empty() {
        return Err(ApiError::Validation("You have to enter a username".into()));
    }
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(ApiError::Validation("You have to enter a valid email address".into()));
    }
    if req.pwd.is_empty() {
        return Err(ApiError::Validation("You have to enter a password".into()));
    }
    if state.db.user_id(&req.username)?.is_some() {
        return Err(ApiError::Validation("The username is already taken".into()));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let pw_hash = Argon2::default()
        .hash_password(req.pwd.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hash failed: {e}"))?
        .to_string();

    state.db.create_user(&req.username, &req.email, &pw_hash)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn messages(
    State(state): State<ApiState>,
    Query(query): Query<SimQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<SimMessage>>, ApiError> {
    update_latest(&state, &query);
    authorize(&state, &headers)?;

    let limit = page_size(&query);

    // Run the blocking timeline query off the async runtime
    let db = state.db.clone();
    let rows = tokio::task::spawn_blocking(move || db.recent_messages(limit))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {e}"))??;

    Ok(Json(rows.into_iter().map(to_sim_message).collect()))
}

pub async fn messages_per_user(
    State(state): State<ApiState>,
    Path(username): Path<String>,
    Query(query): Query<SimQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<SimMessage>>, ApiError> {
    update_latest(&state, &query);
    authorize(&state, &headers)?;

    let user_id = state.db.user_id(&username)?.ok_or(ApiError::NotFound)?;
    let limit = page_size(&query);

    let db = state.db.clone();
    let rows = tokio::task::spawn_blocking(move || db.user_messages(user_id, limit))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {e}"))??;

    Ok(Json(rows.into_iter().map(to_sim_message).collect()))
}

pub async fn post_message(
    State(state): State<ApiState>,
    Path(username): Path<String>,
    Query(query): Query<SimQuery>,
    headers: HeaderMap,
    body: Result<Json<PostMessageRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    update_latest(&state, &query);
    authorize(&state, &headers)?;

    let user_id = state.db.user_id(&username)?.ok_or(ApiError::NotFound)?;
    let Json(req) = body.map_err(|_| ApiError::Validation("Bad request".into()))?;

    let pub_date = chrono::Utc::now().timestamp();
    state.db.insert_message(user_id, &req.content, pub_date)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn follows(
    State(state): State<ApiState>,
    Path(username): Path<String>,
    Query(query): Query<SimQuery>,
    headers: HeaderMap,
) -> Result<Json<FollowsResponse>, ApiError> {
    update_latest(&state, &query);
    authorize(&state, &headers)?;

    let user_id = state.db.user_id(&username)?.ok_or(ApiError::NotFound)?;
    let limit = page_size(&query);

    let db = state.db.clone();
    let follows = tokio::task::spawn_blocking(move || db.follows(user_id, limit))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {e}"))??;

    Ok(Json(FollowsResponse { follows }))
}

pub async fn update_follows(
    State(state): State<ApiState>,
    Path(username): Path<String>,
    Query(query): Query<SimQuery>,
    headers: HeaderMap,
    body: Result<Json<FollowRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    update_latest(&state, &query);
    authorize(&state, &headers)?;

    let who_id = state.db.user_id(&username)?.ok_or(ApiError::NotFound)?;
    let Json(req) = body.map_err(|_| ApiError::Validation("Bad request".into()))?;

    match (req.follow, req.unfollow) {
        (Some(target), None) => {
            let whom_id = state.db.user_id(&target)?.ok_or(ApiError::NotFound)?;
            state.db.follow(who_id, whom_id)?;
        }
        (None, Some(target)) => {
            let whom_id = state.db.user_id(&target)?.ok_or(ApiError::NotFound)?;
            state.db.unfollow(who_id, whom_id)?;
        }
        _ => return Err(ApiError::Validation("Bad request".into())),
    }

    Ok(StatusCode::NO_CONTENT)
}

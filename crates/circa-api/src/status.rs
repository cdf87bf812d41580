use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use circa_types::api::{Claims, CreateStatusRequest, StatusResponse};
use circa_types::time::parse_sqlite_timestamp;

use crate::auth::AppState;

const MAX_STATUS_CHARS: usize = 255;

pub async fn create_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateStatusRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let content = req.content.trim();
    if content.is_empty() || content.chars().count() > MAX_STATUS_CHARS {
        return Err(StatusCode::BAD_REQUEST);
    }

    let user_id = claims.sub.to_string();
    let status_id = Uuid::new_v4().to_string();
    state
        .db
        .insert_status_update(&status_id, &user_id, content)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Companion feed row so the status shows up in friends' feeds.
    let item_id = Uuid::new_v4().to_string();
    state
        .db
        .insert_feed_item(&item_id, &user_id, "status_update", Some(status_id.as_str()))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse {
            id: status_id,
            content: content.to_string(),
            created_at: chrono::Utc::now(),
        }),
    ))
}

/// The user's most recent status, or null if they never posted one.
pub async fn latest_status(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let status = state
        .db
        .latest_status_for(&user_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .map(|row| StatusResponse {
            id: row.id,
            content: row.content,
            created_at: parse_sqlite_timestamp(&row.created_at),
        });

    Ok(Json(status))
}

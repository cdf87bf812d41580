use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use circa_types::api::{Claims, NotificationResponse, UnreadCountResponse};
use circa_types::time::parse_sqlite_timestamp;

use crate::auth::AppState;

const NOTIFICATION_LIMIT: u32 = 50;

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let rows = state
        .db
        .notifications_for(&claims.sub.to_string(), NOTIFICATION_LIMIT)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let notifications: Vec<NotificationResponse> = rows
        .into_iter()
        .map(|row| NotificationResponse {
            id: row.id,
            kind: row.kind,
            reference_id: row.reference_id,
            reference_type: row.reference_type,
            from_user_id: row.from_user_id,
            from_user_name: row.from_user_name,
            read: row.read,
            created_at: parse_sqlite_timestamp(&row.created_at),
        })
        .collect();

    Ok(Json(notifications))
}

pub async fn unread_count(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let count = state
        .db
        .unread_notification_count(&claims.sub.to_string())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(UnreadCountResponse { count }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let updated = state
        .db
        .mark_notification_read(&notification_id, &claims.sub.to_string())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !updated {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(StatusCode::NO_CONTENT)
}

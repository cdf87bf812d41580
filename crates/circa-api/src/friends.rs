use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use circa_types::api::{
    Claims, FriendResponse, PendingRequestResponse, SendFriendRequestRequest,
    SendFriendRequestResponse,
};
use circa_types::time::parse_sqlite_timestamp;

use crate::auth::AppState;

pub async fn send_friend_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendFriendRequestRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let requester_id = claims.sub.to_string();

    if requester_id == req.addressee_id {
        return Err(StatusCode::BAD_REQUEST);
    }

    if state
        .db
        .get_user_by_id(&req.addressee_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .is_none()
    {
        return Err(StatusCode::NOT_FOUND);
    }

    // One friendship row per pair, regardless of orientation or status.
    if state
        .db
        .get_friendship_between(&requester_id, &req.addressee_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .is_some()
    {
        return Err(StatusCode::CONFLICT);
    }

    let friendship_id = Uuid::new_v4().to_string();
    state
        .db
        .insert_friendship(&friendship_id, &requester_id, &req.addressee_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let notification_id = Uuid::new_v4().to_string();
    state
        .db
        .insert_notification(
            &notification_id,
            &req.addressee_id,
            "friend_request",
            Some(friendship_id.as_str()),
            Some("friendship"),
            Some(requester_id.as_str()),
        )
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((
        StatusCode::CREATED,
        Json(SendFriendRequestResponse { friendship_id }),
    ))
}

pub async fn accept_friend_request(
    State(state): State<AppState>,
    Path(friendship_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let friendship = state
        .db
        .get_friendship(&friendship_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    // Only the addressee can accept, and only while pending.
    if friendship.addressee_id != claims.sub.to_string() {
        return Err(StatusCode::FORBIDDEN);
    }
    if friendship.status != "pending" {
        return Err(StatusCode::CONFLICT);
    }

    state
        .db
        .set_friendship_status(&friendship_id, "accepted")
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // The acceptance shows up in the requester's friends' feeds.
    let item_id = Uuid::new_v4().to_string();
    state
        .db
        .insert_feed_item(
            &item_id,
            &friendship.requester_id,
            "friend_accepted",
            Some(friendship_id.as_str()),
        )
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(serde_json::json!({ "status": "accepted" })))
}

pub async fn decline_friend_request(
    State(state): State<AppState>,
    Path(friendship_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let friendship = state
        .db
        .get_friendship(&friendship_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    if friendship.addressee_id != claims.sub.to_string() {
        return Err(StatusCode::FORBIDDEN);
    }
    if friendship.status != "pending" {
        return Err(StatusCode::CONFLICT);
    }

    state
        .db
        .set_friendship_status(&friendship_id, "declined")
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(serde_json::json!({ "status": "declined" })))
}

pub async fn unfriend(
    State(state): State<AppState>,
    Path(friendship_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let friendship = state
        .db
        .get_friendship(&friendship_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let user_id = claims.sub.to_string();
    if friendship.requester_id != user_id && friendship.addressee_id != user_id {
        return Err(StatusCode::FORBIDDEN);
    }

    state
        .db
        .delete_friendship(&friendship_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_friends(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let rows = state
        .db
        .friends_of(&claims.sub.to_string())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let friends: Vec<FriendResponse> = rows
        .into_iter()
        .map(|row| FriendResponse {
            friendship_id: row.friendship_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
        })
        .collect();

    Ok(Json(friends))
}

pub async fn pending_requests(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let rows = state
        .db
        .pending_requests_for(&claims.sub.to_string())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let requests: Vec<PendingRequestResponse> = rows
        .into_iter()
        .map(|row| PendingRequestResponse {
            friendship_id: row.id,
            requester_id: row.requester_id,
            requester_name: row.requester_name,
            created_at: parse_sqlite_timestamp(&row.created_at),
        })
        .collect();

    Ok(Json(requests))
}

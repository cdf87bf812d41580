use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- JWT Claims --

/// JWT claims shared between the REST middleware and token issuance.
/// Canonical definition lives here in circa-types to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub name: String,
    pub token: String,
}

// -- Feed --

#[derive(Debug, Serialize)]
pub struct FeedItemResponse {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Option<String>,
    pub target_user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub items: Vec<FeedItemResponse>,
    pub total: u64,
    pub total_pages: u64,
}

// -- Friends --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendFriendRequestRequest {
    pub addressee_id: String,
}

#[derive(Debug, Serialize)]
pub struct SendFriendRequestResponse {
    pub friendship_id: String,
}

#[derive(Debug, Serialize)]
pub struct FriendResponse {
    pub friendship_id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct PendingRequestResponse {
    pub friendship_id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub created_at: DateTime<Utc>,
}

// -- Status updates --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateStatusRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// -- Wall posts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateWallPostRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct WallPostResponse {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// -- Notifications --

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
    pub from_user_id: Option<String>,
    pub from_user_name: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

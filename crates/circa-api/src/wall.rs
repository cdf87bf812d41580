use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use circa_types::api::{Claims, CreateWallPostRequest, WallPostResponse};
use circa_types::time::parse_sqlite_timestamp;

use crate::auth::AppState;

const MAX_WALL_POST_CHARS: usize = 5000;

pub async fn create_wall_post(
    State(state): State<AppState>,
    Path(profile_owner_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateWallPostRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let content = req.content.trim();
    if content.is_empty() || content.chars().count() > MAX_WALL_POST_CHARS {
        return Err(StatusCode::BAD_REQUEST);
    }

    if state
        .db
        .get_user_by_id(&profile_owner_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .is_none()
    {
        return Err(StatusCode::NOT_FOUND);
    }

    let author_id = claims.sub.to_string();
    let post_id = Uuid::new_v4().to_string();
    state
        .db
        .insert_wall_post(&post_id, &author_id, &profile_owner_id, content)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // The feed row is attributed to the wall's owner, so the post surfaces
    // in the owner's friends' feeds.
    let item_id = Uuid::new_v4().to_string();
    state
        .db
        .insert_feed_item(&item_id, &profile_owner_id, "wall_post", Some(post_id.as_str()))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((
        StatusCode::CREATED,
        Json(WallPostResponse {
            id: post_id,
            author_id,
            author_name: claims.name.clone(),
            content: content.to_string(),
            created_at: chrono::Utc::now(),
        }),
    ))
}

pub async fn get_wall(
    State(state): State<AppState>,
    Path(profile_owner_id): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let rows = state
        .db
        .wall_posts_for(&profile_owner_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let posts: Vec<WallPostResponse> = rows
        .into_iter()
        .map(|row| WallPostResponse {
            id: row.id,
            author_id: row.author_id,
            author_name: row.author_name,
            content: row.content,
            created_at: parse_sqlite_timestamp(&row.created_at),
        })
        .collect();

    Ok(Json(posts))
}

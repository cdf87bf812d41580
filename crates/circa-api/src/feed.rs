use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::error;

use circa_types::api::{Claims, FeedItemResponse, FeedResponse};
use circa_types::time::parse_sqlite_timestamp;

use crate::auth::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Keyset cursor: pass the `created_at` (and `before_id` for tie-breaks)
    /// of the oldest item from the previous page to fetch older items
    /// without offset drift.
    pub before: Option<String>,
    pub before_id: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    circa_feed::DEFAULT_PAGE_SIZE
}

pub async fn get_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let page_size = query.page_size;
    let viewer_id = claims.sub.to_string();

    // Run all blocking DB queries off the async runtime
    let state = state.clone();
    let (items, total) = tokio::task::spawn_blocking(move || {
        let items = match query.before {
            Some(ref before) => circa_feed::list_feed_items_before(
                &state.db,
                &viewer_id,
                before,
                query.before_id.as_deref(),
                query.page_size,
            ),
            None => {
                circa_feed::list_feed_items(&state.db, &viewer_id, query.page, query.page_size)
            }
        };
        let total = circa_feed::count_feed_items(&state.db, &viewer_id);
        (items, total)
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let items: Vec<FeedItemResponse> = items
        .into_iter()
        .map(|item| FeedItemResponse {
            id: item.id,
            user_id: item.user_id,
            user_name: item.user_name,
            kind: item.kind.as_str().to_string(),
            content: item.content,
            target_user_name: item.target_user_name,
            created_at: parse_sqlite_timestamp(&item.created_at),
        })
        .collect();

    Ok(Json(FeedResponse {
        items,
        total,
        total_pages: circa_feed::total_pages(total, page_size),
    }))
}

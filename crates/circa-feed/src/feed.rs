use anyhow::Result;
use circa_db::Database;
use circa_types::feed::FeedItemKind;
use tracing::warn;

use crate::enrich;
use crate::friends::try_resolve_friend_ids;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A display-ready feed entry.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub kind: FeedItemKind,
    /// Resolved text for kinds that carry one. None for friend_accepted,
    /// unknown kinds, and dangling references.
    pub content: Option<String>,
    /// Secondary identity: the wall's owner, or the other party to an
    /// accepted friendship.
    pub target_user_name: Option<String>,
    /// Raw store timestamp; callers parse for presentation.
    pub created_at: String,
}

/// One page of the viewer's feed: items authored by the viewer or any
/// accepted friend, newest first. `page` is 1-based and clamped; a page past
/// the end and a storage failure both yield an empty vec.
pub fn list_feed_items(db: &Database, viewer_id: &str, page: u32, page_size: u32) -> Vec<FeedItem> {
    match try_list_feed_items(db, viewer_id, page, page_size) {
        Ok(items) => items,
        Err(e) => {
            warn!("Feed query failed for {}: {}", viewer_id, e);
            Vec::new()
        }
    }
}

/// Keyset variant: items strictly older than the `(before, before_id)`
/// cursor, for clients that page a live feed without offset drift.
pub fn list_feed_items_before(
    db: &Database,
    viewer_id: &str,
    before: &str,
    before_id: Option<&str>,
    limit: u32,
) -> Vec<FeedItem> {
    let limit = limit.clamp(1, MAX_PAGE_SIZE);

    let result = relevant_user_ids(db, viewer_id)
        .and_then(|ids| db.feed_items_before(&ids, before, before_id, limit))
        .and_then(|rows| enrich::enrich_items(db, rows));

    match result {
        Ok(items) => items,
        Err(e) => {
            warn!("Feed query failed for {}: {}", viewer_id, e);
            Vec::new()
        }
    }
}

/// Total feed items visible to the viewer, for page-count computation.
/// Degrades to 0 on storage failure.
pub fn count_feed_items(db: &Database, viewer_id: &str) -> u64 {
    let result =
        relevant_user_ids(db, viewer_id).and_then(|ids| db.count_feed_items_for_users(&ids));

    match result {
        Ok(count) => count,
        Err(e) => {
            warn!("Feed count failed for {}: {}", viewer_id, e);
            0
        }
    }
}

/// `ceil(total / page_size)`, minimum 1 so pagination UI always has a page.
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE) as u64;
    total.div_ceil(page_size).max(1)
}

fn try_list_feed_items(
    db: &Database,
    viewer_id: &str,
    page: u32,
    page_size: u32,
) -> Result<Vec<FeedItem>> {
    let page = page.max(1);
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    // Widen before multiplying: `page` comes straight off the query string,
    // and u32 math would overflow on large page numbers.
    let offset = (page as u64 - 1) * page_size as u64;

    let ids = relevant_user_ids(db, viewer_id)?;
    let rows = db.feed_items_for_users(&ids, page_size, offset)?;

    enrich::enrich_items(db, rows)
}

/// The viewer plus every accepted friend: the only authors whose items the
/// viewer may see.
fn relevant_user_ids(db: &Database, viewer_id: &str) -> Result<Vec<String>> {
    let friends = try_resolve_friend_ids(db, viewer_id)?;

    let mut ids = Vec::with_capacity(friends.len() + 1);
    ids.push(viewer_id.to_string());
    ids.extend(friends);
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::total_pages;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(41, 20), 3);
    }

    #[test]
    fn total_pages_clamps_page_size() {
        // page_size 0 would divide by zero; it clamps to 1.
        assert_eq!(total_pages(5, 0), 5);
    }
}

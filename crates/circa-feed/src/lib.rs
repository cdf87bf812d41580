//! Friend-scoped activity feed aggregation.
//!
//! Read-only over the circa-db tables: resolves the viewer's accepted
//! friends, pulls feed items authored by the viewer or a friend newest
//! first, and enriches each item from its backing table by kind. Storage
//! failures degrade to empty results so a transient hiccup renders as an
//! empty feed instead of an error page.

mod enrich;
pub mod feed;
pub mod friends;

pub use feed::{
    DEFAULT_PAGE_SIZE, FeedItem, MAX_PAGE_SIZE, count_feed_items, list_feed_items,
    list_feed_items_before, total_pages,
};
pub use friends::resolve_friend_ids;

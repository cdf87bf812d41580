//! Content resolution: turn raw feed rows into display items.
//!
//! Lookups are batched per kind — one IN-query per backing table plus one
//! batched name lookup for secondary identities — instead of one round-trip
//! per row. A dangling reference resolves to null content; the item is still
//! listed with its kind and author.

use std::collections::HashMap;

use anyhow::Result;
use circa_db::Database;
use circa_db::models::{FeedItemRow, FriendshipRow, WallPostRow};
use circa_types::feed::FeedItemKind;

use crate::feed::FeedItem;

pub(crate) fn enrich_items(db: &Database, rows: Vec<FeedItemRow>) -> Result<Vec<FeedItem>> {
    let mut status_ids = Vec::new();
    let mut wall_ids = Vec::new();
    let mut friendship_ids = Vec::new();

    for row in &rows {
        let Some(ref reference_id) = row.reference_id else {
            continue;
        };
        match FeedItemKind::from_tag(&row.kind) {
            FeedItemKind::StatusUpdate => status_ids.push(reference_id.clone()),
            FeedItemKind::WallPost => wall_ids.push(reference_id.clone()),
            FeedItemKind::FriendAccepted => friendship_ids.push(reference_id.clone()),
            FeedItemKind::Other(_) => {}
        }
    }

    let statuses: HashMap<String, String> = db
        .get_status_updates(&status_ids)?
        .into_iter()
        .map(|s| (s.id.clone(), s.content))
        .collect();

    let walls: HashMap<String, WallPostRow> = db
        .get_wall_posts(&wall_ids)?
        .into_iter()
        .map(|w| (w.id.clone(), w))
        .collect();

    let friendships: HashMap<String, FriendshipRow> = db
        .get_friendships(&friendship_ids)?
        .into_iter()
        .map(|f| (f.id.clone(), f))
        .collect();

    // Secondary identities to name: wall owners and friendship other-parties.
    let mut name_ids: Vec<String> = walls.values().map(|w| w.profile_owner_id.clone()).collect();
    for row in &rows {
        if let Some(ref reference_id) = row.reference_id
            && let Some(friendship) = friendships.get(reference_id)
        {
            name_ids.push(other_party(friendship, &row.user_id).to_string());
        }
    }
    name_ids.sort();
    name_ids.dedup();
    let names = db.get_user_names(&name_ids)?;

    let items = rows
        .into_iter()
        .map(|row| {
            let kind = FeedItemKind::from_tag(&row.kind);
            let (content, target_user_name) = match (&kind, &row.reference_id) {
                (FeedItemKind::StatusUpdate, Some(reference_id)) => {
                    (statuses.get(reference_id).cloned(), None)
                }
                (FeedItemKind::WallPost, Some(reference_id)) => match walls.get(reference_id) {
                    Some(post) => (
                        Some(post.content.clone()),
                        names.get(&post.profile_owner_id).cloned(),
                    ),
                    None => (None, None),
                },
                (FeedItemKind::FriendAccepted, Some(reference_id)) => {
                    match friendships.get(reference_id) {
                        Some(friendship) => {
                            (None, names.get(other_party(friendship, &row.user_id)).cloned())
                        }
                        None => (None, None),
                    }
                }
                // Unknown kind, or a known kind with no reference at all.
                _ => (None, None),
            };

            FeedItem {
                id: row.id,
                user_id: row.user_id,
                user_name: row.user_name,
                kind,
                content,
                target_user_name,
                created_at: row.created_at,
            }
        })
        .collect();

    Ok(items)
}

/// The friendship endpoint that is not the feed item's author.
fn other_party<'a>(friendship: &'a FriendshipRow, user_id: &str) -> &'a str {
    if friendship.requester_id == user_id {
        &friendship.addressee_id
    } else {
        &friendship.requester_id
    }
}

use std::collections::HashSet;

use anyhow::Result;
use circa_db::Database;
use tracing::warn;

/// IDs of every user with an accepted friendship to `viewer_id`.
///
/// Friendship rows are stored directionally but mean a symmetric relation,
/// so both orientations are matched and the friend is whichever endpoint is
/// not the viewer. Unknown viewers and storage failures both yield an empty
/// set.
pub fn resolve_friend_ids(db: &Database, viewer_id: &str) -> HashSet<String> {
    match try_resolve_friend_ids(db, viewer_id) {
        Ok(ids) => ids,
        Err(e) => {
            warn!("Friend resolution failed for {}: {}", viewer_id, e);
            HashSet::new()
        }
    }
}

pub(crate) fn try_resolve_friend_ids(db: &Database, viewer_id: &str) -> Result<HashSet<String>> {
    let rows = db.accepted_friendships_for(viewer_id)?;

    Ok(rows
        .into_iter()
        .map(|f| {
            if f.requester_id == viewer_id {
                f.addressee_id
            } else {
                f.requester_id
            }
        })
        .collect())
}

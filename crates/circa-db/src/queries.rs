use std::collections::HashMap;

use anyhow::Result;
use rusqlite::Connection;
use rusqlite::types::ToSql;

use crate::Database;
use crate::models::{
    FeedItemRow, FriendRow, FriendshipRow, NotificationRow, PendingRequestRow, StatusUpdateRow,
    UserRow, WallPostDisplayRow, WallPostRow,
};

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, name: &str, email: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, email, password) VALUES (?1, ?2, ?3, ?4)",
                (id, name, email, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    /// Batch-fetch display names for a set of user IDs.
    pub fn get_user_names(&self, user_ids: &[String]) -> Result<HashMap<String, String>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, name FROM users WHERE id IN ({})",
                placeholders(user_ids.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let params = id_params(user_ids);

            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<std::result::Result<HashMap<_, _>, _>>()?;

            Ok(rows)
        })
    }

    // -- Friendships --

    pub fn insert_friendship(&self, id: &str, requester_id: &str, addressee_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO friendships (id, requester_id, addressee_id, status) VALUES (?1, ?2, ?3, 'pending')",
                (id, requester_id, addressee_id),
            )?;
            Ok(())
        })
    }

    pub fn get_friendship(&self, id: &str) -> Result<Option<FriendshipRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, requester_id, addressee_id, status, created_at
                 FROM friendships WHERE id = ?1",
            )?;
            stmt.query_row([id], map_friendship).optional()
        })
    }

    /// Friendship between two users in either orientation, any status.
    pub fn get_friendship_between(&self, a: &str, b: &str) -> Result<Option<FriendshipRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, requester_id, addressee_id, status, created_at
                 FROM friendships
                 WHERE (requester_id = ?1 AND addressee_id = ?2)
                    OR (requester_id = ?2 AND addressee_id = ?1)
                 LIMIT 1",
            )?;
            stmt.query_row([a, b], map_friendship).optional()
        })
    }

    pub fn set_friendship_status(&self, id: &str, status: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE friendships SET status = ?2 WHERE id = ?1",
                (id, status),
            )?;
            Ok(())
        })
    }

    pub fn delete_friendship(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM friendships WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    /// Accepted friendships touching a user, in either orientation.
    pub fn accepted_friendships_for(&self, user_id: &str) -> Result<Vec<FriendshipRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, requester_id, addressee_id, status, created_at
                 FROM friendships
                 WHERE status = 'accepted' AND (requester_id = ?1 OR addressee_id = ?1)",
            )?;

            let rows = stmt
                .query_map([user_id], map_friendship)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Accepted friendships joined with the other endpoint's user row.
    pub fn friends_of(&self, user_id: &str) -> Result<Vec<FriendRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT f.id, u.id, u.name, u.email
                 FROM friendships f
                 INNER JOIN users u
                    ON u.id = CASE WHEN f.requester_id = ?1 THEN f.addressee_id ELSE f.requester_id END
                 WHERE f.status = 'accepted' AND (f.requester_id = ?1 OR f.addressee_id = ?1)
                 ORDER BY u.name",
            )?;

            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(FriendRow {
                        friendship_id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        email: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn pending_requests_for(&self, addressee_id: &str) -> Result<Vec<PendingRequestRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT f.id, f.requester_id, u.name, f.created_at
                 FROM friendships f
                 INNER JOIN users u ON f.requester_id = u.id
                 WHERE f.addressee_id = ?1 AND f.status = 'pending'
                 ORDER BY f.created_at DESC",
            )?;

            let rows = stmt
                .query_map([addressee_id], |row| {
                    Ok(PendingRequestRow {
                        id: row.get(0)?,
                        requester_id: row.get(1)?,
                        requester_name: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Batch-fetch friendships by ID (for feed enrichment).
    pub fn get_friendships(&self, ids: &[String]) -> Result<Vec<FriendshipRow>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, requester_id, addressee_id, status, created_at
                 FROM friendships WHERE id IN ({})",
                placeholders(ids.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let params = id_params(ids);

            let rows = stmt
                .query_map(params.as_slice(), map_friendship)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Status updates --

    pub fn insert_status_update(&self, id: &str, user_id: &str, content: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO status_updates (id, user_id, content) VALUES (?1, ?2, ?3)",
                (id, user_id, content),
            )?;
            Ok(())
        })
    }

    pub fn latest_status_for(&self, user_id: &str) -> Result<Option<StatusUpdateRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, content, created_at
                 FROM status_updates
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT 1",
            )?;
            stmt.query_row([user_id], map_status_update).optional()
        })
    }

    /// Batch-fetch status updates by ID (for feed enrichment).
    pub fn get_status_updates(&self, ids: &[String]) -> Result<Vec<StatusUpdateRow>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, user_id, content, created_at
                 FROM status_updates WHERE id IN ({})",
                placeholders(ids.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let params = id_params(ids);

            let rows = stmt
                .query_map(params.as_slice(), map_status_update)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Wall posts --

    pub fn insert_wall_post(
        &self,
        id: &str,
        author_id: &str,
        profile_owner_id: &str,
        content: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO wall_posts (id, author_id, profile_owner_id, content) VALUES (?1, ?2, ?3, ?4)",
                (id, author_id, profile_owner_id, content),
            )?;
            Ok(())
        })
    }

    pub fn wall_posts_for(&self, profile_owner_id: &str) -> Result<Vec<WallPostDisplayRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT w.id, w.author_id, u.name, w.content, w.created_at
                 FROM wall_posts w
                 INNER JOIN users u ON w.author_id = u.id
                 WHERE w.profile_owner_id = ?1
                 ORDER BY w.created_at DESC, w.id DESC",
            )?;

            let rows = stmt
                .query_map([profile_owner_id], |row| {
                    Ok(WallPostDisplayRow {
                        id: row.get(0)?,
                        author_id: row.get(1)?,
                        author_name: row.get(2)?,
                        content: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Batch-fetch wall posts by ID (for feed enrichment).
    pub fn get_wall_posts(&self, ids: &[String]) -> Result<Vec<WallPostRow>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, author_id, profile_owner_id, content, created_at
                 FROM wall_posts WHERE id IN ({})",
                placeholders(ids.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let params = id_params(ids);

            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok(WallPostRow {
                        id: row.get(0)?,
                        author_id: row.get(1)?,
                        profile_owner_id: row.get(2)?,
                        content: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Feed items --

    pub fn insert_feed_item(
        &self,
        id: &str,
        user_id: &str,
        kind: &str,
        reference_id: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO feed_items (id, user_id, type, reference_id) VALUES (?1, ?2, ?3, ?4)",
                (id, user_id, kind, reference_id),
            )?;
            Ok(())
        })
    }

    /// Feed items authored by any of `user_ids`, newest first. Ties on
    /// created_at break by id so page boundaries stay deterministic.
    pub fn feed_items_for_users(
        &self,
        user_ids: &[String],
        limit: u32,
        offset: u64,
    ) -> Result<Vec<FeedItemRow>> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let n = user_ids.len();
            let sql = format!(
                "SELECT f.id, f.user_id, u.name, f.type, f.reference_id, f.created_at
                 FROM feed_items f
                 INNER JOIN users u ON f.user_id = u.id
                 WHERE f.user_id IN ({})
                 ORDER BY f.created_at DESC, f.id DESC
                 LIMIT ?{} OFFSET ?{}",
                placeholders(n),
                n + 1,
                n + 2
            );

            let mut stmt = conn.prepare(&sql)?;
            let limit = limit as i64;
            // Past i64::MAX the offset is beyond any real table anyway.
            let offset = i64::try_from(offset).unwrap_or(i64::MAX);
            let mut params = id_params(user_ids);
            params.push(&limit);
            params.push(&offset);

            let rows = stmt
                .query_map(params.as_slice(), map_feed_item)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Keyset variant: feed items strictly older than the `(created_at, id)`
    /// cursor. With no cursor id, strictly older than the timestamp.
    pub fn feed_items_before(
        &self,
        user_ids: &[String],
        before: &str,
        before_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<FeedItemRow>> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let n = user_ids.len();
            let cursor_clause = match before_id {
                Some(_) => format!(
                    "(f.created_at < ?{c} OR (f.created_at = ?{c} AND f.id < ?{i}))",
                    c = n + 1,
                    i = n + 2
                ),
                None => format!("f.created_at < ?{}", n + 1),
            };
            let limit_idx = n + 1 + if before_id.is_some() { 2 } else { 1 };

            let sql = format!(
                "SELECT f.id, f.user_id, u.name, f.type, f.reference_id, f.created_at
                 FROM feed_items f
                 INNER JOIN users u ON f.user_id = u.id
                 WHERE f.user_id IN ({}) AND {}
                 ORDER BY f.created_at DESC, f.id DESC
                 LIMIT ?{}",
                placeholders(n),
                cursor_clause,
                limit_idx
            );

            let mut stmt = conn.prepare(&sql)?;
            let limit = limit as i64;
            let mut params = id_params(user_ids);
            params.push(&before);
            if let Some(ref id) = before_id {
                params.push(id);
            }
            params.push(&limit);

            let rows = stmt
                .query_map(params.as_slice(), map_feed_item)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn count_feed_items_for_users(&self, user_ids: &[String]) -> Result<u64> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT COUNT(*) FROM feed_items WHERE user_id IN ({})",
                placeholders(user_ids.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let params = id_params(user_ids);
            let count: i64 = stmt.query_row(params.as_slice(), |row| row.get(0))?;

            Ok(count as u64)
        })
    }

    // -- Notifications --

    pub fn insert_notification(
        &self,
        id: &str,
        user_id: &str,
        kind: &str,
        reference_id: Option<&str>,
        reference_type: Option<&str>,
        from_user_id: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notifications (id, user_id, type, reference_id, reference_type, from_user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (id, user_id, kind, reference_id, reference_type, from_user_id),
            )?;
            Ok(())
        })
    }

    pub fn notifications_for(&self, user_id: &str, limit: u32) -> Result<Vec<NotificationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT n.id, n.user_id, n.type, n.reference_id, n.reference_type,
                        n.from_user_id, u.name, n.read, n.created_at
                 FROM notifications n
                 LEFT JOIN users u ON n.from_user_id = u.id
                 WHERE n.user_id = ?1
                 ORDER BY n.created_at DESC, n.id DESC
                 LIMIT ?2",
            )?;

            let rows = stmt
                .query_map((user_id, limit as i64), |row| {
                    Ok(NotificationRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        kind: row.get(2)?,
                        reference_id: row.get(3)?,
                        reference_type: row.get(4)?,
                        from_user_id: row.get(5)?,
                        from_user_name: row.get(6)?,
                        read: row.get::<_, i64>(7)? != 0,
                        created_at: row.get(8)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn unread_notification_count(&self, user_id: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND read = 0",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
    }

    /// Mark a notification read. Returns false when the row doesn't exist or
    /// belongs to someone else.
    pub fn mark_notification_read(&self, id: &str, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE notifications SET read = 1 WHERE id = ?1 AND user_id = ?2",
                (id, user_id),
            )?;
            Ok(affected > 0)
        })
    }
}

fn placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("?{}", i)).collect::<Vec<_>>().join(", ")
}

fn id_params(ids: &[String]) -> Vec<&dyn ToSql> {
    ids.iter().map(|id| id as &dyn ToSql).collect()
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // `column` is a compile-time constant from this module, never user input.
    let sql = format!(
        "SELECT id, name, email, password, created_at FROM users WHERE {} = ?1",
        column
    );
    let mut stmt = conn.prepare(&sql)?;

    stmt.query_row([value], |row| {
        Ok(UserRow {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            created_at: row.get(4)?,
        })
    })
    .optional()
}

fn map_friendship(row: &rusqlite::Row<'_>) -> rusqlite::Result<FriendshipRow> {
    Ok(FriendshipRow {
        id: row.get(0)?,
        requester_id: row.get(1)?,
        addressee_id: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn map_status_update(row: &rusqlite::Row<'_>) -> rusqlite::Result<StatusUpdateRow> {
    Ok(StatusUpdateRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn map_feed_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeedItemRow> {
    Ok(FeedItemRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        kind: row.get(3)?,
        reference_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

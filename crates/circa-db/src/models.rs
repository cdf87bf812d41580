/// Database row types — these map directly to SQLite rows.
/// Distinct from circa-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

pub struct FriendshipRow {
    pub id: String,
    pub requester_id: String,
    pub addressee_id: String,
    pub status: String,
    pub created_at: String,
}

/// A pending incoming request joined with the requester's name.
pub struct PendingRequestRow {
    pub id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub created_at: String,
}

/// An accepted friendship joined with the other endpoint's user row.
pub struct FriendRow {
    pub friendship_id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
}

pub struct StatusUpdateRow {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
}

pub struct WallPostRow {
    pub id: String,
    pub author_id: String,
    pub profile_owner_id: String,
    pub content: String,
    pub created_at: String,
}

/// A wall post joined with its author's name, for profile rendering.
pub struct WallPostDisplayRow {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub created_at: String,
}

pub struct FeedItemRow {
    pub id: String,
    pub user_id: String,
    /// Author name joined in a single query (avoids a per-row lookup).
    pub user_name: String,
    /// The `type` column; `kind` because `type` is reserved.
    pub kind: String,
    pub reference_id: Option<String>,
    pub created_at: String,
}

pub struct NotificationRow {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
    pub from_user_id: Option<String>,
    pub from_user_name: Option<String>,
    pub read: bool,
    pub created_at: String,
}

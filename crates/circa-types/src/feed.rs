/// Kind tag on a feed item, selecting the backing table its `reference_id`
/// points into. Stored as a plain string so older servers keep listing items
/// written by newer ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedItemKind {
    StatusUpdate,
    WallPost,
    FriendAccepted,
    /// Unrecognized tag. The item is still listed with author and timestamp,
    /// just without resolved content.
    Other(String),
}

impl FeedItemKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "status_update" => Self::StatusUpdate,
            "wall_post" => Self::WallPost,
            "friend_accepted" => Self::FriendAccepted,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::StatusUpdate => "status_update",
            Self::WallPost => "wall_post",
            Self::FriendAccepted => "friend_accepted",
            Self::Other(tag) => tag,
        }
    }
}

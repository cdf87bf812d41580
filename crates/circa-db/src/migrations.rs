use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS friendships (
            id              TEXT PRIMARY KEY,
            requester_id    TEXT NOT NULL REFERENCES users(id),
            addressee_id    TEXT NOT NULL REFERENCES users(id),
            status          TEXT NOT NULL DEFAULT 'pending'
                            CHECK (status IN ('pending', 'accepted', 'declined')),
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_friendships_requester
            ON friendships(requester_id, status);
        CREATE INDEX IF NOT EXISTS idx_friendships_addressee
            ON friendships(addressee_id, status);

        CREATE TABLE IF NOT EXISTS status_updates (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id),
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_status_updates_user
            ON status_updates(user_id, created_at);

        CREATE TABLE IF NOT EXISTS wall_posts (
            id                  TEXT PRIMARY KEY,
            author_id           TEXT NOT NULL REFERENCES users(id),
            profile_owner_id    TEXT NOT NULL REFERENCES users(id),
            content             TEXT NOT NULL,
            created_at          TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_wall_posts_owner
            ON wall_posts(profile_owner_id, created_at);

        -- reference_id is deliberately not a foreign key: it points into a
        -- different table per type, and the referenced row may be deleted
        -- out from under the feed item.
        CREATE TABLE IF NOT EXISTS feed_items (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id),
            type            TEXT NOT NULL,
            reference_id    TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_feed_items_user
            ON feed_items(user_id, created_at);

        CREATE TABLE IF NOT EXISTS notifications (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id),
            type            TEXT NOT NULL,
            reference_id    TEXT,
            reference_type  TEXT,
            from_user_id    TEXT REFERENCES users(id),
            read            INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_notifications_user
            ON notifications(user_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}

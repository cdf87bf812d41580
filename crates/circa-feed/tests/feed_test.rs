use std::collections::HashSet;

use circa_db::Database;
use circa_feed::{
    count_feed_items, list_feed_items, list_feed_items_before, resolve_friend_ids, total_pages,
};
use circa_types::feed::FeedItemKind;
use uuid::Uuid;

fn user(db: &Database, name: &str) -> String {
    let id = Uuid::new_v4().to_string();
    db.create_user(&id, name, &format!("{}@circa.test", id), "hash")
        .unwrap();
    id
}

fn befriend(db: &Database, requester: &str, addressee: &str) -> String {
    let id = Uuid::new_v4().to_string();
    db.insert_friendship(&id, requester, addressee).unwrap();
    db.set_friendship_status(&id, "accepted").unwrap();
    id
}

/// Pin a feed item's timestamp so ordering tests are deterministic.
fn set_feed_time(db: &Database, item_id: &str, ts: &str) {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE feed_items SET created_at = ?1 WHERE id = ?2",
            (ts, item_id),
        )?;
        Ok(())
    })
    .unwrap();
}

/// Post a status the way the write path does: content row plus feed row.
/// Returns the feed item id.
fn post_status(db: &Database, user_id: &str, content: &str, ts: &str) -> String {
    let status_id = Uuid::new_v4().to_string();
    db.insert_status_update(&status_id, user_id, content).unwrap();

    let item_id = Uuid::new_v4().to_string();
    db.insert_feed_item(&item_id, user_id, "status_update", Some(status_id.as_str()))
        .unwrap();
    set_feed_time(db, &item_id, ts);
    item_id
}

#[test]
fn own_entries_visible_without_friends() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");

    post_status(&db, &alice, "first", "2007-03-01 09:00:00");
    post_status(&db, &alice, "second", "2007-03-01 10:00:00");

    let items = list_feed_items(&db, &alice, 1, 20);
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.user_id == alice));
    assert!(items.iter().all(|i| i.user_name == "Alice"));
}

#[test]
fn non_friend_entries_hidden() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");
    let stranger = user(&db, "Stranger");
    let pending = user(&db, "Pending");
    let declined = user(&db, "Declined");

    let f_pending = Uuid::new_v4().to_string();
    db.insert_friendship(&f_pending, &pending, &alice).unwrap();

    let f_declined = Uuid::new_v4().to_string();
    db.insert_friendship(&f_declined, &alice, &declined).unwrap();
    db.set_friendship_status(&f_declined, "declined").unwrap();

    post_status(&db, &stranger, "unrelated", "2007-03-01 09:00:00");
    post_status(&db, &pending, "not yet", "2007-03-01 09:30:00");
    post_status(&db, &declined, "never", "2007-03-01 10:00:00");

    assert!(list_feed_items(&db, &alice, 1, 20).is_empty());
    assert_eq!(count_feed_items(&db, &alice), 0);
}

#[test]
fn accepted_friendship_is_bidirectional() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");
    let bob = user(&db, "Bob");

    // Stored in one direction only.
    befriend(&db, &alice, &bob);

    post_status(&db, &alice, "from alice", "2007-03-01 09:00:00");
    post_status(&db, &bob, "from bob", "2007-03-01 10:00:00");

    let alices_feed = list_feed_items(&db, &alice, 1, 20);
    assert_eq!(alices_feed.len(), 2);
    assert!(alices_feed.iter().any(|i| i.user_id == bob));

    let bobs_feed = list_feed_items(&db, &bob, 1, 20);
    assert_eq!(bobs_feed.len(), 2);
    assert!(bobs_feed.iter().any(|i| i.user_id == alice));
}

#[test]
fn newest_first_ordering() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");

    // Inserted out of chronological order on purpose.
    let middle = post_status(&db, &alice, "middle", "2007-03-01 10:00:00");
    let oldest = post_status(&db, &alice, "oldest", "2007-03-01 09:00:00");
    let newest = post_status(&db, &alice, "newest", "2007-03-01 11:00:00");

    let items = list_feed_items(&db, &alice, 1, 20);
    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec![newest.as_str(), middle.as_str(), oldest.as_str()]);
}

#[test]
fn pages_are_complete_and_disjoint() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");
    let bob = user(&db, "Bob");
    befriend(&db, &bob, &alice);

    let mut expected = HashSet::new();
    for i in 0..7 {
        let author = if i % 2 == 0 { &alice } else { &bob };
        let ts = format!("2007-03-01 0{}:00:00", i + 1);
        expected.insert(post_status(&db, author, "post", &ts));
    }

    assert_eq!(total_pages(7, 3), 3);

    let mut seen = Vec::new();
    for page in 1..=3 {
        let items = list_feed_items(&db, &alice, page, 3);
        assert!(items.len() <= 3);
        seen.extend(items.into_iter().map(|i| i.id));
    }

    assert_eq!(seen.len(), 7);
    assert_eq!(seen.iter().cloned().collect::<HashSet<_>>(), expected);

    // Past the last page: empty, not an error.
    assert!(list_feed_items(&db, &alice, 4, 3).is_empty());
}

#[test]
fn count_agrees_with_paging_to_exhaustion() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");

    for i in 0..5 {
        post_status(&db, &alice, "post", &format!("2007-03-01 0{}:00:00", i + 1));
    }

    let total = count_feed_items(&db, &alice);
    assert_eq!(total, 5);

    let mut paged = 0;
    for page in 1..=total_pages(total, 2) {
        paged += list_feed_items(&db, &alice, page as u32, 2).len() as u64;
    }
    assert_eq!(paged, total);
}

#[test]
fn status_update_resolves_content() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");

    post_status(&db, &alice, "hello world", "2007-03-01 09:00:00");

    let items = list_feed_items(&db, &alice, 1, 20);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, FeedItemKind::StatusUpdate);
    assert_eq!(items[0].content.as_deref(), Some("hello world"));
    assert_eq!(items[0].target_user_name, None);
}

#[test]
fn wall_post_resolves_body_and_owner_name() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");
    let charlie = user(&db, "Charlie");
    befriend(&db, &alice, &charlie);

    // Write path: the feed item is attributed to the wall's owner.
    let post_id = Uuid::new_v4().to_string();
    db.insert_wall_post(&post_id, &alice, &charlie, "happy birthday!")
        .unwrap();
    let item_id = Uuid::new_v4().to_string();
    db.insert_feed_item(&item_id, &charlie, "wall_post", Some(post_id.as_str()))
        .unwrap();

    let items = list_feed_items(&db, &alice, 1, 20);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, FeedItemKind::WallPost);
    assert_eq!(items[0].content.as_deref(), Some("happy birthday!"));
    assert_eq!(items[0].target_user_name.as_deref(), Some("Charlie"));
}

#[test]
fn friend_accepted_resolves_other_party() {
    let db = Database::open_in_memory().unwrap();
    let bob = user(&db, "Bob");
    let charlie = user(&db, "Charlie");

    let friendship_id = befriend(&db, &bob, &charlie);

    // One item per endpoint; each must name the *other* endpoint.
    let bob_item = Uuid::new_v4().to_string();
    db.insert_feed_item(&bob_item, &bob, "friend_accepted", Some(friendship_id.as_str()))
        .unwrap();
    set_feed_time(&db, &bob_item, "2007-03-01 09:00:00");

    let charlie_item = Uuid::new_v4().to_string();
    db.insert_feed_item(&charlie_item, &charlie, "friend_accepted", Some(friendship_id.as_str()))
        .unwrap();
    set_feed_time(&db, &charlie_item, "2007-03-01 10:00:00");

    let items = list_feed_items(&db, &bob, 1, 20);
    assert_eq!(items.len(), 2);

    let from_charlie = items.iter().find(|i| i.id == charlie_item).unwrap();
    assert_eq!(from_charlie.target_user_name.as_deref(), Some("Bob"));

    let from_bob = items.iter().find(|i| i.id == bob_item).unwrap();
    assert_eq!(from_bob.target_user_name.as_deref(), Some("Charlie"));
    assert_eq!(from_bob.content, None);
}

#[test]
fn unknown_kind_lists_as_bare_item() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");

    let item_id = Uuid::new_v4().to_string();
    db.insert_feed_item(&item_id, &alice, "photo_tagged", Some("whatever"))
        .unwrap();

    let items = list_feed_items(&db, &alice, 1, 20);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, FeedItemKind::Other("photo_tagged".to_string()));
    assert_eq!(items[0].content, None);
    assert_eq!(items[0].target_user_name, None);
}

#[test]
fn dangling_reference_yields_null_content() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");

    // References a status row that was deleted out from under the feed.
    let item_id = Uuid::new_v4().to_string();
    db.insert_feed_item(&item_id, &alice, "status_update", Some("deleted-status"))
        .unwrap();

    let items = list_feed_items(&db, &alice, 1, 20);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, FeedItemKind::StatusUpdate);
    assert_eq!(items[0].content, None);
    assert_eq!(items[0].user_name, "Alice");
}

#[test]
fn fresh_user_has_empty_feed() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");

    assert!(list_feed_items(&db, &alice, 1, 20).is_empty());
    assert_eq!(count_feed_items(&db, &alice), 0);
    assert_eq!(total_pages(0, 20), 1);
}

#[test]
fn page_zero_is_clamped_to_first_page() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");
    post_status(&db, &alice, "only", "2007-03-01 09:00:00");

    let clamped = list_feed_items(&db, &alice, 0, 20);
    let first = list_feed_items(&db, &alice, 1, 20);
    assert_eq!(clamped.len(), 1);
    assert_eq!(clamped[0].id, first[0].id);
}

#[test]
fn huge_page_number_is_past_the_end_not_a_panic() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");
    post_status(&db, &alice, "only", "2007-03-01 09:00:00");

    // Page numbers arrive unchecked from the query string; the offset math
    // must not overflow u32.
    assert!(list_feed_items(&db, &alice, u32::MAX, 100).is_empty());
    assert!(list_feed_items(&db, &alice, u32::MAX, circa_feed::MAX_PAGE_SIZE).is_empty());
}

#[test]
fn keyset_cursor_returns_strictly_older_items() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");

    let oldest = post_status(&db, &alice, "oldest", "2007-03-01 09:00:00");
    let middle = post_status(&db, &alice, "middle", "2007-03-01 10:00:00");
    let newest = post_status(&db, &alice, "newest", "2007-03-01 11:00:00");

    let older =
        list_feed_items_before(&db, &alice, "2007-03-01 11:00:00", Some(newest.as_str()), 20);
    let ids: Vec<&str> = older.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec![middle.as_str(), oldest.as_str()]);
}

#[test]
fn keyset_cursor_breaks_timestamp_ties_by_id() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");

    // Same timestamp, ids force the order: "b" sorts before "a" descending.
    db.insert_feed_item("a", &alice, "status_update", None).unwrap();
    db.insert_feed_item("b", &alice, "status_update", None).unwrap();
    set_feed_time(&db, "a", "2007-03-01 09:00:00");
    set_feed_time(&db, "b", "2007-03-01 09:00:00");

    let after_b = list_feed_items_before(&db, &alice, "2007-03-01 09:00:00", Some("b"), 20);
    assert_eq!(after_b.len(), 1);
    assert_eq!(after_b[0].id, "a");
}

#[test]
fn resolve_friend_ids_matches_both_orientations() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");
    let bob = user(&db, "Bob");
    let carol = user(&db, "Carol");
    let dave = user(&db, "Dave");

    befriend(&db, &alice, &bob);
    befriend(&db, &carol, &alice);

    // Pending never counts.
    let pending = Uuid::new_v4().to_string();
    db.insert_friendship(&pending, &alice, &dave).unwrap();

    let friends = resolve_friend_ids(&db, &alice);
    assert_eq!(friends, HashSet::from([bob, carol]));

    assert!(resolve_friend_ids(&db, "no-such-user").is_empty());
}

#[test]
fn storage_failure_degrades_to_empty_results() {
    let db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice");
    post_status(&db, &alice, "post", "2007-03-01 09:00:00");

    // Simulate a broken store underneath the aggregator.
    db.with_conn(|conn| {
        conn.execute_batch("DROP TABLE feed_items")?;
        Ok(())
    })
    .unwrap();

    assert!(list_feed_items(&db, &alice, 1, 20).is_empty());
    assert_eq!(count_feed_items(&db, &alice), 0);

    db.with_conn(|conn| {
        conn.execute_batch("DROP TABLE friendships")?;
        Ok(())
    })
    .unwrap();

    assert!(resolve_friend_ids(&db, &alice).is_empty());
}

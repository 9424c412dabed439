//! Behavior-driven tests for the scrap store and session
//!
//! These tests verify what a signed-in user sees when saving, listing and
//! removing scraps, and how sessions persist across store handles.

use tempfile::tempdir;
use tickerboard_warehouse::{
    ContentType, FileSession, NewScrap, ScrapStore, SessionProvider, UserId, Warehouse,
    WarehouseConfig, WarehouseError,
};
use time::macros::datetime;

fn user(raw: &str) -> UserId {
    UserId::parse(raw).expect("valid user")
}

// =============================================================================
// Scraps: saving and listing
// =============================================================================

#[test]
fn when_user_saves_scraps_they_list_newest_first() {
    // Given: A fresh store
    let temp = tempdir().expect("tempdir");
    let warehouse = Warehouse::open(WarehouseConfig::under(temp.path())).expect("open");
    let alice = user("alice");

    // When: Two scraps are saved at different times
    warehouse
        .insert_scrap_at(
            &alice,
            NewScrap::new(ContentType::News, "https://news.test/1").expect("valid"),
            datetime!(2024-03-08 09:00 UTC),
        )
        .expect("insert");
    warehouse
        .insert_scrap_at(
            &alice,
            NewScrap::new(ContentType::Indicator, "VIX")
                .expect("valid")
                .with_notes("volatility creeping up")
                .expect("short note"),
            datetime!(2024-03-08 15:30 UTC),
        )
        .expect("insert");

    // Then: The list is ordered newest first with notes intact
    let scraps = warehouse.list_scraps(&alice).expect("list");
    assert_eq!(scraps.len(), 2);
    assert_eq!(scraps[0].content_id, "VIX");
    assert_eq!(scraps[0].content_type, ContentType::Indicator);
    assert_eq!(scraps[0].notes.as_deref(), Some("volatility creeping up"));
    assert_eq!(scraps[1].content_id, "https://news.test/1");
    assert_eq!(scraps[1].created_at, datetime!(2024-03-08 09:00 UTC));
}

#[test]
fn when_scraps_share_a_timestamp_system_lists_latest_insert_first() {
    // Given: Twenty scraps saved at the same instant
    let temp = tempdir().expect("tempdir");
    let warehouse = Warehouse::open(WarehouseConfig::under(temp.path())).expect("open");
    let alice = user("alice");
    let at = datetime!(2024-03-08 12:00 UTC);

    for n in 0..20 {
        warehouse
            .insert_scrap_at(
                &alice,
                NewScrap::new(ContentType::News, format!("n-{n}")).expect("valid"),
                at,
            )
            .expect("insert");
    }

    // Then: Ties come back in reverse insertion order
    let ids: Vec<String> = warehouse
        .list_scraps(&alice)
        .expect("list")
        .into_iter()
        .map(|scrap| scrap.content_id)
        .collect();
    let expected: Vec<String> = (0..20).rev().map(|n| format!("n-{n}")).collect();
    assert_eq!(ids, expected);
}

#[test]
fn when_scraps_survive_a_reopen_system_returns_the_same_rows() {
    // Given: A scrap saved through one handle
    let temp = tempdir().expect("tempdir");
    let alice = user("alice");
    let saved = {
        let warehouse = Warehouse::open(WarehouseConfig::under(temp.path())).expect("open");
        warehouse
            .insert_scrap(
                &alice,
                NewScrap::new(ContentType::News, "https://news.test/9").expect("valid"),
            )
            .expect("insert")
    };

    // When: The store is reopened
    let reopened = Warehouse::open(WarehouseConfig::under(temp.path())).expect("reopen");

    // Then: The scrap is still there, byte for byte
    assert_eq!(reopened.list_scraps(&alice).expect("list"), vec![saved]);
}

#[test]
fn when_users_share_a_store_each_sees_only_their_own_scraps() {
    let temp = tempdir().expect("tempdir");
    let warehouse = Warehouse::open(WarehouseConfig::under(temp.path())).expect("open");
    let alice = user("alice");
    let bob = user("bob");

    warehouse
        .insert_scrap(&alice, NewScrap::new(ContentType::News, "a").expect("valid"))
        .expect("insert");
    let bobs = warehouse
        .insert_scrap(&bob, NewScrap::new(ContentType::News, "b").expect("valid"))
        .expect("insert");

    assert_eq!(warehouse.list_scraps(&alice).expect("list").len(), 1);
    assert_eq!(warehouse.list_scraps(&bob).expect("list"), vec![bobs.clone()]);

    // And: Alice cannot remove Bob's scrap
    assert!(!warehouse.delete_scrap(&alice, bobs.id).expect("delete"));
    assert!(warehouse.delete_scrap(&bob, bobs.id).expect("delete"));
    assert!(warehouse.list_scraps(&bob).expect("list").is_empty());
}

#[test]
fn when_scrap_input_is_invalid_system_rejects_it_before_storage() {
    assert!(matches!(
        NewScrap::new(ContentType::News, "   "),
        Err(WarehouseError::InvalidRecord(_))
    ));
    assert!(matches!(
        "bookmark".parse::<ContentType>(),
        Err(WarehouseError::InvalidRecord(_))
    ));

    let long_note = "x".repeat(2_001);
    assert!(NewScrap::new(ContentType::News, "id")
        .expect("valid")
        .with_notes(long_note)
        .is_err());
}

// =============================================================================
// Session
// =============================================================================

#[test]
fn when_user_signs_in_then_out_system_forgets_them() {
    // Given: A session file under the tickerboard home with a fallback user
    let temp = tempdir().expect("tempdir");
    let config = WarehouseConfig::under(temp.path());
    let session = FileSession::new(config.session_path()).with_fallback_user(Some(user("env-user")));

    // Then: With no file yet, the fallback user is signed in
    assert_eq!(session.current_user().expect("read"), Some(user("env-user")));

    // When: Someone signs in explicitly
    session.sign_in(&user("alice")).expect("sign in");
    assert_eq!(session.current_user().expect("read"), Some(user("alice")));

    // When: They sign out
    session.sign_out().expect("sign out");

    // Then: Nobody is signed in, not even the fallback
    assert_eq!(session.current_user().expect("read"), None);
}

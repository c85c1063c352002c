mod helpers;

use chrono::{Duration, TimeZone, Utc};
use helpers::*;
use palace::scene::record;
use palace::scene::store::{self, PalaceStore, SqlitePalaceStore, StoreError};

#[tokio::test]
async fn append_then_list_round_trips_every_field() {
    let db = shared_db();
    let user_id = create_user(&db.lock().unwrap(), "asha@example.com");
    let store = SqlitePalaceStore::new(db);

    let created_at = Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 5).unwrap()
        + Duration::nanoseconds(123_456_789);
    let scene = record::build(
        "entropy",
        "Library",
        "Books slide off every shelf into a growing heap.",
        Some("हर शेल्फ से किताबें फिसल रही हैं।".to_string()),
        Some("hi".to_string()),
        created_at,
    )
    .unwrap();

    let id = store.append_scene(&user_id, &scene).await.unwrap();
    let listed = store.list_scenes(&user_id).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].scene, scene);
}

#[test]
fn list_is_newest_first() {
    let conn = test_db();
    let user_id = create_user(&conn, "asha@example.com");
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();

    for (minutes, topic) in [(0, "first"), (20, "third"), (10, "second")] {
        let scene = record::build(
            topic,
            "Library",
            "scene",
            None,
            None,
            base + Duration::minutes(minutes),
        )
        .unwrap();
        store::insert_palace(&conn, &user_id, &scene).unwrap();
    }

    let topics: Vec<String> = store::list_palaces(&conn, &user_id)
        .unwrap()
        .into_iter()
        .map(|p| p.scene.topic)
        .collect();
    assert_eq!(topics, ["third", "second", "first"]);
}

#[test]
fn palaces_are_isolated_per_user() {
    let conn = test_db();
    let asha = create_user(&conn, "asha@example.com");
    let ravi = create_user(&conn, "ravi@example.com");

    let scene = record::build("gravity", "Garden", "Apples rise", None, None, Utc::now()).unwrap();
    store::insert_palace(&conn, &asha, &scene).unwrap();
    store::insert_palace(&conn, &asha, &scene).unwrap();

    assert_eq!(store::count_palaces(&conn, &asha).unwrap(), 2);
    assert_eq!(store::count_palaces(&conn, &ravi).unwrap(), 0);
    assert!(store::list_palaces(&conn, &ravi).unwrap().is_empty());
}

#[test]
fn insert_for_unknown_user_fails() {
    let conn = test_db();
    let scene = record::build("gravity", "Garden", "Apples rise", None, None, Utc::now()).unwrap();

    let err = store::insert_palace(&conn, "ghost", &scene).unwrap_err();
    assert!(matches!(err, StoreError::UnknownUser(id) if id == "ghost"));
}

#[test]
fn deleting_user_cascades_to_palaces() {
    let conn = test_db();
    let user_id = create_user(&conn, "asha@example.com");
    let scene = record::build("gravity", "Garden", "Apples rise", None, None, Utc::now()).unwrap();
    store::insert_palace(&conn, &user_id, &scene).unwrap();

    conn.execute("DELETE FROM users WHERE id = ?1", [&user_id])
        .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM palaces", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

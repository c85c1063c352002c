use palace::db;
use tempfile::TempDir;

#[test]
fn open_creates_new_db_at_nonexistent_path() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("subdir").join("new.db");

    assert!(!db_path.exists());

    let conn = db::open_database(&db_path).unwrap();

    assert!(db_path.exists());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM palaces", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn reopening_keeps_data_and_schema_version() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("palace.db");

    {
        let conn = db::open_database(&db_path).unwrap();
        conn.execute(
            "INSERT INTO users (id, email, password_hash, name, username, created_at, updated_at) \
             VALUES ('u1', 'a@b.co', 'x', 'A', 'a', 'now', 'now')",
            [],
        )
        .unwrap();
    }

    let conn = db::open_database(&db_path).unwrap();
    let report = db::check_database_health(&conn).unwrap();
    assert_eq!(report.user_count, 1);
    assert_eq!(report.schema_version, db::migrations::CURRENT_SCHEMA_VERSION);
}

#[test]
fn health_check_passes_on_valid_db() {
    let conn = db::open_memory_database().unwrap();

    let report = db::check_database_health(&conn).unwrap();
    assert!(report.integrity_ok);
    assert_eq!(report.schema_version, db::migrations::CURRENT_SCHEMA_VERSION);
    assert_eq!(report.user_count, 0);
    assert_eq!(report.palace_count, 0);
    assert_eq!(report.session_count, 0);
}

#[test]
fn busy_timeout_is_set() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("test.db");

    let conn = db::open_database(&db_path).unwrap();

    let timeout: i64 = conn
        .pragma_query_value(None, "busy_timeout", |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 5000);
}

#[test]
fn foreign_keys_are_enforced() {
    let tmp = TempDir::new().unwrap();
    let conn = db::open_database(tmp.path().join("fk.db")).unwrap();

    let result = conn.execute(
        "INSERT INTO palaces (id, user_id, topic, location, scene, created_at) \
         VALUES ('p1', 'ghost', 't', 'l', 's', 'now')",
        [],
    );
    assert!(result.is_err());
}

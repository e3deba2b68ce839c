use smartschedule_core::db::{open_db, open_db_in_memory};
use smartschedule_core::{KvStore, SqliteKvStore};

#[test]
fn sqlite_store_get_set_remove() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);

    assert_eq!(store.get("tasks").unwrap(), None);

    store.set("tasks", "[]").unwrap();
    assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));

    store.set("tasks", "[1]").unwrap();
    assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[1]"));

    store.remove("tasks").unwrap();
    assert_eq!(store.get("tasks").unwrap(), None);
}

#[test]
fn removing_missing_key_is_noop() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    store.remove("never-set").unwrap();
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.db");

    {
        let conn = open_db(&path).unwrap();
        SqliteKvStore::new(&conn)
            .set("smartschedule.theme", "dark")
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let value = SqliteKvStore::new(&conn).get("smartschedule.theme").unwrap();
    assert_eq!(value.as_deref(), Some("dark"));
}

#[test]
fn sqlite_store_can_own_its_connection() {
    let store = SqliteKvStore::new(open_db_in_memory().unwrap());
    store.set("smartschedule.tasks", "[]").unwrap();
    assert_eq!(store.get("smartschedule.tasks").unwrap().as_deref(), Some("[]"));
}

use rusqlite::Connection;
use studyhub_core::db::{open_db, open_db_in_memory};
use studyhub_core::{KvBackend, SqliteKvBackend, StoreAdapter, StoreError, StoreResult};

/// Backend standing in for a disabled or quota-exhausted storage medium.
struct UnavailableBackend;

impl KvBackend for UnavailableBackend {
    fn load(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }

    fn store(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }

    fn remove(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }
}

fn memory_adapter() -> StoreAdapter {
    let conn = open_db_in_memory().unwrap();
    StoreAdapter::new(Box::new(SqliteKvBackend::try_new(conn).unwrap()))
}

#[test]
fn write_then_read_roundtrips_json_values() {
    let adapter = memory_adapter();

    adapter.write("numbers", &vec![1u32, 2, 3]);
    adapter.write("flag", &true);
    adapter.write("label", &"hello".to_string());

    assert_eq!(adapter.read("numbers", Vec::<u32>::new()), vec![1, 2, 3]);
    assert!(adapter.read("flag", false));
    assert_eq!(adapter.read("label", String::new()), "hello");
}

#[test]
fn absent_key_yields_the_default() {
    let adapter = memory_adapter();
    assert_eq!(adapter.read("missing", 42u32), 42);
}

#[test]
fn last_write_wins_per_key() {
    let adapter = memory_adapter();

    adapter.write("counter", &1u32);
    adapter.write("counter", &2u32);
    adapter.write("counter", &3u32);

    assert_eq!(adapter.read("counter", 0u32), 3);
}

#[test]
fn corrupt_entry_falls_back_and_is_not_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyhub.db");

    {
        let conn = open_db(&path).unwrap();
        let backend = SqliteKvBackend::try_new(conn).unwrap();
        backend.store("todo-tasks", "{definitely not json").unwrap();
    }

    {
        let conn = open_db(&path).unwrap();
        let adapter = StoreAdapter::new(Box::new(SqliteKvBackend::try_new(conn).unwrap()));
        assert_eq!(adapter.read("todo-tasks", Vec::<u32>::new()), Vec::<u32>::new());
    }

    // The fallback read must leave the corrupt row untouched.
    let conn = Connection::open(&path).unwrap();
    let raw: String = conn
        .query_row(
            "SELECT value FROM kv_entries WHERE key = 'todo-tasks';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(raw, "{definitely not json");
}

#[test]
fn next_successful_write_overwrites_a_corrupt_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyhub.db");

    {
        let conn = open_db(&path).unwrap();
        let backend = SqliteKvBackend::try_new(conn).unwrap();
        backend.store("counter", "not a number").unwrap();
    }

    let conn = open_db(&path).unwrap();
    let adapter = StoreAdapter::new(Box::new(SqliteKvBackend::try_new(conn).unwrap()));
    assert_eq!(adapter.read("counter", 0u32), 0);

    adapter.write("counter", &7u32);
    assert_eq!(adapter.read("counter", 0u32), 7);
}

#[test]
fn delete_removes_the_entry_and_tolerates_absence() {
    let adapter = memory_adapter();

    adapter.write("scratch", &"temp".to_string());
    adapter.delete("scratch");
    assert_eq!(adapter.read("scratch", String::new()), "");

    // Deleting an absent key is not an error.
    adapter.delete("scratch");
}

#[test]
fn unavailable_medium_degrades_without_failing_the_caller() {
    let adapter = StoreAdapter::new(Box::new(UnavailableBackend));

    // Reads fall back, writes and deletes are absorbed.
    assert_eq!(adapter.read("anything", 9u32), 9);
    adapter.write("anything", &10u32);
    adapter.delete("anything");
}

#[test]
fn backend_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteKvBackend::try_new(conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn backend_rejects_connection_without_kv_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        studyhub_core::db::migrations::latest_version()
    ))
    .unwrap();

    assert!(matches!(
        SqliteKvBackend::try_new(conn),
        Err(StoreError::MissingRequiredTable("kv_entries"))
    ));
}

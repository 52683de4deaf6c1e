//! Workspace store persistence tests.

use strata::repository::{SchemaRecord, SqliteWorkspace};

fn scratch_db() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("strata-workspace-{}.db", uuid::Uuid::new_v4()))
}

#[test]
fn records_survive_reopening_the_store() {
    let path = scratch_db();

    {
        let workspace = SqliteWorkspace::open(&path).unwrap();
        workspace
            .put(&SchemaRecord::new("pg_sales", "pg_sales", "CREATE TABLE t;"))
            .unwrap();
    }

    let reopened = SqliteWorkspace::open(&path).unwrap();
    let record = reopened.get("pg_sales").unwrap().unwrap();
    assert_eq!(record.ddl, "CREATE TABLE t;");
    assert_eq!(reopened.ids().unwrap(), vec!["pg_sales".to_string()]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn clear_keeps_the_store_usable() {
    let workspace = SqliteWorkspace::open_in_memory().unwrap();
    workspace
        .put(&SchemaRecord::new("a", "a", "ddl a"))
        .unwrap();
    workspace
        .put(&SchemaRecord::new("b", "b", "ddl b"))
        .unwrap();

    workspace.clear().unwrap();
    assert!(workspace.ids().unwrap().is_empty());

    workspace
        .put(&SchemaRecord::new("c", "c", "ddl c"))
        .unwrap();
    assert!(workspace.get("c").unwrap().is_some());
}

#[test]
fn default_path_lands_in_the_home_workspace() {
    // Environments without a home directory report the error instead.
    if let Ok(path) = SqliteWorkspace::default_path() {
        assert!(path.ends_with(".strata/workspace.db"));
    }
}

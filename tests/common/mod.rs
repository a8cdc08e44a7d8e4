//! Shared test infrastructure for model-layer tests.
//!
//! `setup_test_db()` opens a temporary SQLite database with the schema
//! applied; the fixture helpers below build catalogs, users and grants.

#![allow(dead_code)]

use rusqlite::{Connection, params};
use tempfile::TempDir;

use permdesk::db::MIGRATIONS;

/// Setup a test database with the schema applied.
///
/// Returns a tuple of (TempDir, Connection) where TempDir must be kept
/// alive for the Connection to remain valid.
pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");

    (dir, conn)
}

pub fn create_group(conn: &Connection, name: &str, sort_order: i64) -> i64 {
    conn.execute(
        "INSERT INTO permission_groups (name, description, sort_order) VALUES (?1, ?2, ?3)",
        params![name, format!("{name} permissions"), sort_order],
    )
    .expect("Failed to create group");
    conn.last_insert_rowid()
}

pub fn create_permission(conn: &Connection, group_id: i64, code: &str, sort_order: i64) -> i64 {
    conn.execute(
        "INSERT INTO permissions (group_id, code, label, description, sort_order) \
         VALUES (?1, ?2, ?3, '', ?4)",
        params![group_id, code, code.replace('.', " "), sort_order],
    )
    .expect("Failed to create permission");
    conn.last_insert_rowid()
}

/// Create a user with a placeholder password hash (not loginable).
pub fn create_user(conn: &Connection, username: &str) -> i64 {
    conn.execute(
        "INSERT INTO users (username, password, display_name) VALUES (?1, 'x', ?2)",
        params![username, username],
    )
    .expect("Failed to create user");
    conn.last_insert_rowid()
}

pub fn grant(conn: &Connection, user_id: i64, permission_id: i64) {
    conn.execute(
        "INSERT INTO user_permissions (user_id, permission_id) VALUES (?1, ?2)",
        params![user_id, permission_id],
    )
    .expect("Failed to grant permission");
}

/// Granted permission ids for a user, ascending.
pub fn granted_ids(conn: &Connection, user_id: i64) -> Vec<i64> {
    let mut stmt = conn
        .prepare("SELECT permission_id FROM user_permissions WHERE user_id = ?1 ORDER BY permission_id")
        .expect("prepare");
    stmt.query_map(params![user_id], |row| row.get(0))
        .expect("query")
        .collect::<Result<Vec<_>, _>>()
        .expect("collect")
}

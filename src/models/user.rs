use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

/// Internal user struct for authentication — includes the password hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub display_name: String,
}

/// Safe version for API responses — no password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserDisplay {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub permission_count: i64,
}

pub fn find_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, password, display_name FROM users WHERE username = ?1",
        params![username],
        |row| {
            Ok(User {
                id: row.get("id")?,
                username: row.get("username")?,
                password: row.get("password")?,
                display_name: row.get("display_name")?,
            })
        },
    )
    .optional()
}

pub fn find_display_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<UserDisplay>> {
    conn.query_row(
        "SELECT u.id, u.username, u.display_name, \
                (SELECT COUNT(*) FROM user_permissions up WHERE up.user_id = u.id) AS permission_count \
         FROM users u WHERE u.id = ?1",
        params![id],
        row_to_user_display,
    )
    .optional()
}

/// All users with their grant counts, for the permission editor's user picker.
pub fn find_all_display(conn: &Connection) -> rusqlite::Result<Vec<UserDisplay>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.username, u.display_name, \
                (SELECT COUNT(*) FROM user_permissions up WHERE up.user_id = u.id) AS permission_count \
         FROM users u ORDER BY u.username",
    )?;
    let users = stmt
        .query_map([], row_to_user_display)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

fn row_to_user_display(row: &rusqlite::Row) -> rusqlite::Result<UserDisplay> {
    Ok(UserDisplay {
        id: row.get("id")?,
        username: row.get("username")?,
        display_name: row.get("display_name")?,
        permission_count: row.get("permission_count")?,
    })
}

use std::collections::BTreeSet;
use std::fmt;

use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

/// One entry of a commit payload: the desired grant state for a single
/// permission. A payload carries one entry for every catalog permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionStatus {
    pub id: i64,
    pub status: bool,
}

#[derive(Debug)]
pub enum GrantError {
    Db(rusqlite::Error),
    UserNotFound(i64),
    UnknownPermission(i64),
    /// Payload does not cover the full catalog; carries the missing count.
    IncompletePayload(usize),
}

impl fmt::Display for GrantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantError::Db(e) => write!(f, "Database error: {e}"),
            GrantError::UserNotFound(id) => write!(f, "User {id} not found"),
            GrantError::UnknownPermission(id) => write!(f, "Unknown permission id {id}"),
            GrantError::IncompletePayload(missing) => {
                write!(f, "Payload missing {missing} catalog permission(s)")
            }
        }
    }
}

impl From<rusqlite::Error> for GrantError {
    fn from(e: rusqlite::Error) -> Self {
        GrantError::Db(e)
    }
}

/// Replace a user's permission set to exactly match `payload` — full replace,
/// not merge. The payload must name every catalog permission; a `false`
/// status is an explicit revocation. Runs in one transaction: on any failure
/// the prior grant state is left untouched.
pub fn replace_permissions(
    conn: &mut Connection,
    user_id: i64,
    payload: &[PermissionStatus],
) -> Result<(), GrantError> {
    let tx = conn.transaction()?;

    let user_exists: bool = tx.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    if !user_exists {
        return Err(GrantError::UserNotFound(user_id));
    }

    let catalog_ids: BTreeSet<i64> = {
        let mut stmt = tx.prepare("SELECT id FROM permissions")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;
        ids
    };

    let mut covered = BTreeSet::new();
    for entry in payload {
        if !catalog_ids.contains(&entry.id) {
            return Err(GrantError::UnknownPermission(entry.id));
        }
        covered.insert(entry.id);
    }
    if covered.len() < catalog_ids.len() {
        return Err(GrantError::IncompletePayload(catalog_ids.len() - covered.len()));
    }

    tx.execute("DELETE FROM user_permissions WHERE user_id = ?1", params![user_id])?;
    {
        let mut insert = tx.prepare(
            "INSERT OR IGNORE INTO user_permissions (user_id, permission_id) VALUES (?1, ?2)",
        )?;
        for entry in payload {
            if entry.status {
                insert.execute(params![user_id, entry.id])?;
            }
        }
    }

    tx.commit()?;
    Ok(())
}

/// All permission codes granted to a user, sorted. Loaded into the session
/// at login and used by `require_permission`.
pub fn find_codes_by_user_id(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT p.code \
         FROM user_permissions up \
         JOIN permissions p ON p.id = up.permission_id \
         WHERE up.user_id = ?1 \
         ORDER BY p.code",
    )?;
    let codes = stmt
        .query_map(params![user_id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(codes)
}

/// Count of granted permissions for a user; used by the user listing.
pub fn count_for_user(conn: &Connection, user_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM user_permissions WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
}

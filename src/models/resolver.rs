use rusqlite::{Connection, params};
use serde::Serialize;

/// A catalog permission with the server-reported grant state for one user.
/// `active` is a snapshot at resolve time, not a live value.
#[derive(Debug, Clone, Serialize)]
pub struct UserPermission {
    pub id: i64,
    pub code: String,
    pub label: String,
    pub description: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserPermissionGroup {
    pub group_id: i64,
    pub group_name: String,
    pub group_description: String,
    pub permissions: Vec<UserPermission>,
}

/// Resolve the full catalog with per-permission active flags for one user.
/// Returns `None` when the user does not exist. Always re-derived fresh from
/// the database — never cached across calls.
pub fn resolve_for_user(
    conn: &Connection,
    user_id: i64,
) -> rusqlite::Result<Option<Vec<UserPermissionGroup>>> {
    let user_exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    if !user_exists {
        return Ok(None);
    }

    let mut group_stmt = conn.prepare(
        "SELECT id, name, description FROM permission_groups ORDER BY sort_order, id",
    )?;
    let mut groups = group_stmt
        .query_map([], |row| {
            Ok(UserPermissionGroup {
                group_id: row.get("id")?,
                group_name: row.get("name")?,
                group_description: row.get("description")?,
                permissions: vec![],
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut perm_stmt = conn.prepare(
        "SELECT p.id, p.code, p.label, p.description, \
                CASE WHEN up.permission_id IS NOT NULL THEN 1 ELSE 0 END AS active \
         FROM permissions p \
         LEFT JOIN user_permissions up \
             ON up.permission_id = p.id AND up.user_id = ?1 \
         WHERE p.group_id = ?2 \
         ORDER BY p.sort_order, p.id",
    )?;
    for group in &mut groups {
        group.permissions = perm_stmt
            .query_map(params![user_id, group.group_id], |row| {
                Ok(UserPermission {
                    id: row.get("id")?,
                    code: row.get("code")?,
                    label: row.get("label")?,
                    description: row.get("description")?,
                    active: row.get::<_, i64>("active")? == 1,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(Some(groups))
}

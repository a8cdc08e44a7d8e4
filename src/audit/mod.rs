use rusqlite::{Connection, params};
use serde::Serialize;
use serde_json::Value;

/// Audit entries older than this are removed at startup.
const RETENTION_DAYS: i64 = 90;

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub details: Value,
    pub created_at: String,
}

/// Record an action in the audit log. Failures are reported to the caller;
/// callers decide whether a failed audit write should abort the operation
/// (it never does — audit is best-effort by convention).
pub fn log(
    conn: &Connection,
    user_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO audit_log (user_id, action, target_type, target_id, details) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![user_id, action, target_type, target_id, details.to_string()],
    )?;
    Ok(())
}

/// The most recent `limit` entries, newest first.
pub fn find_recent(conn: &Connection, limit: i64) -> rusqlite::Result<Vec<AuditEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, action, target_type, target_id, details, created_at \
         FROM audit_log ORDER BY id DESC LIMIT ?1",
    )?;
    let entries = stmt
        .query_map(params![limit], |row| {
            let raw: String = row.get("details")?;
            Ok(AuditEntry {
                id: row.get("id")?,
                user_id: row.get("user_id")?,
                action: row.get("action")?,
                target_type: row.get("target_type")?,
                target_id: row.get("target_id")?,
                details: serde_json::from_str(&raw).unwrap_or(Value::Null),
                created_at: row.get("created_at")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

/// Delete entries past the retention window. Called once at startup.
pub fn cleanup_old_entries(conn: &Connection) {
    match conn.execute(
        "DELETE FROM audit_log WHERE created_at < datetime('now', ?1)",
        params![format!("-{RETENTION_DAYS} days")],
    ) {
        Ok(0) => {}
        Ok(n) => log::info!("Audit cleanup removed {n} entries"),
        Err(e) => log::warn!("Audit cleanup failed: {e}"),
    }
}

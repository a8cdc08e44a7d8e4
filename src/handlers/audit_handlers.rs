use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use std::collections::HashMap;

use crate::audit::{self, AuditEntry};
use crate::auth::session::require_permission;
use crate::db::DbPool;
use crate::errors::AppError;

#[derive(Debug, Serialize)]
pub struct AuditListResponse {
    pub entries: Vec<AuditEntry>,
}

/// GET /api/v1/audit — recent audit entries, newest first.
/// Query params: limit (default 50, capped at 200).
pub async fn list(
    pool: web::Data<DbPool>,
    session: Session,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "audit.view")?;

    let limit = query
        .get("limit")
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(50)
        .clamp(1, 200);

    let conn = pool.get()?;
    let entries = audit::find_recent(&conn, limit)?;

    Ok(HttpResponse::Ok().json(AuditListResponse { entries }))
}

use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::auth::session::{get_user_id, require_permission};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::handlers::ApiMessage;
use crate::models::catalog::{self, PermissionGroup};
use crate::models::grant::{self, PermissionStatus};
use crate::models::resolver::{self, UserPermissionGroup};

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub groups: Vec<PermissionGroup>,
}

/// GET /api/v1/permissions — the complete catalog, no user context.
pub async fn list_catalog(
    pool: web::Data<DbPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "permissions.manage")?;

    let conn = pool.get()?;
    let catalog = catalog::load(&conn)?;

    Ok(HttpResponse::Ok().json(CatalogResponse {
        groups: catalog.groups().to_vec(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub user_id: i64,
    pub groups: Vec<UserPermissionGroup>,
}

/// GET /api/v1/users/{id}/permissions — every group with per-permission
/// active flags for one user. Flags are a snapshot at call time.
pub async fn resolve(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "permissions.manage")?;

    let user_id = path.into_inner();
    let conn = pool.get()?;

    let groups = resolver::resolve_for_user(&conn, user_id)?.ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(ResolveResponse { user_id, groups }))
}

#[derive(Debug, Deserialize)]
pub struct ReplaceRequest {
    pub permissions: Vec<PermissionStatus>,
}

/// PUT /api/v1/users/{id}/permissions — atomic full-replace commit. The
/// payload must carry one entry per catalog permission; on any failure the
/// user's prior grants are unchanged.
pub async fn replace(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<ReplaceRequest>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "permissions.manage")?;

    let user_id = path.into_inner();
    let mut conn = pool.get()?;

    grant::replace_permissions(&mut conn, user_id, &body.permissions)?;

    let granted = body.permissions.iter().filter(|p| p.status).count();
    let current_user_id = get_user_id(&session).unwrap_or(0);
    let details = serde_json::json!({
        "granted_count": granted,
        "catalog_size": body.permissions.len(),
        "summary": format!("Replaced permission set for user {user_id}")
    });
    let _ = crate::audit::log(
        &conn,
        current_user_id,
        "user.permissions_replaced",
        "user",
        user_id,
        details,
    );

    Ok(HttpResponse::Ok().json(ApiMessage::success("Permissions updated")))
}

use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::auth::session::require_permission;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user::{self, UserDisplay};

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserDisplay>,
}

/// GET /api/v1/users — user picker for the permission editor.
pub async fn list(
    pool: web::Data<DbPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "permissions.manage")?;

    let conn = pool.get()?;
    let users = user::find_all_display(&conn)?;

    Ok(HttpResponse::Ok().json(UserListResponse { users }))
}

/// GET /api/v1/users/{id} — single user or 404.
pub async fn read(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "permissions.manage")?;

    let user_id = path.into_inner();
    let conn = pool.get()?;

    let found = user::find_display_by_id(&conn, user_id)?.ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(found))
}

use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::auth::password;
use crate::auth::session::Permissions;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::handlers::ApiMessage;
use crate::models::{grant, user};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub permissions: Vec<String>,
}

/// POST /api/v1/login — verify credentials, load the user's permission codes
/// into the session. Unknown user and wrong password return the same message.
pub async fn login(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;

    let Some(account) = user::find_by_username(&conn, body.username.trim())? else {
        return Ok(HttpResponse::Unauthorized()
            .json(ApiMessage::failure("Invalid username or password")));
    };

    let valid = password::verify_password(&body.password, &account.password)
        .map_err(AppError::Hash)?;
    if !valid {
        return Ok(HttpResponse::Unauthorized()
            .json(ApiMessage::failure("Invalid username or password")));
    }

    let codes = grant::find_codes_by_user_id(&conn, account.id)?;
    let permissions = Permissions(codes.clone());

    session.renew();
    session
        .insert("user_id", account.id)
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert("username", &account.username)
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert("permissions", permissions.to_csv())
        .map_err(|e| AppError::Session(e.to_string()))?;

    let _ = crate::audit::log(
        &conn,
        account.id,
        "auth.login",
        "user",
        account.id,
        serde_json::json!({ "username": account.username }),
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        status: "success",
        user_id: account.id,
        username: account.username,
        display_name: account.display_name,
        permissions: codes,
    }))
}

/// POST /api/v1/logout — discard the session.
pub async fn logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(ApiMessage::success("Logged out"))
}

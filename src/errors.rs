use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::models::catalog::CatalogError;
use crate::models::grant::GrantError;

#[derive(Debug)]
pub enum AppError {
    Db(rusqlite::Error),
    Pool(r2d2::Error),
    Session(String),
    Hash(String),
    Validation(String),
    PermissionDenied(String),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Pool(e) => write!(f, "Pool error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Validation(e) => write!(f, "Validation error: {e}"),
            AppError::PermissionDenied(code) => write!(f, "Permission denied: {code}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

fn failure_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "status": "failure", "message": message })
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(failure_body("Not found")),
            AppError::PermissionDenied(code) => HttpResponse::Forbidden()
                .json(failure_body(&format!("Missing permission: {code}"))),
            AppError::Validation(msg) => HttpResponse::BadRequest().json(failure_body(msg)),
            AppError::Session(msg) => {
                HttpResponse::Unauthorized().json(failure_body(msg))
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(failure_body("Internal server error"))
            }
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Pool(e)
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Db(e) => AppError::Db(e),
            CatalogError::DuplicateId(id) => {
                AppError::Validation(format!("Duplicate permission id {id} in catalog"))
            }
        }
    }
}

impl From<GrantError> for AppError {
    fn from(e: GrantError) -> Self {
        match e {
            GrantError::Db(e) => AppError::Db(e),
            GrantError::UserNotFound(_) => AppError::NotFound,
            GrantError::UnknownPermission(id) => {
                AppError::Validation(format!("Unknown permission id {id} in payload"))
            }
            GrantError::IncompletePayload(missing) => AppError::Validation(format!(
                "Payload must cover the full catalog ({missing} permission(s) missing)"
            )),
        }
    }
}

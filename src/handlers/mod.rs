pub mod audit_handlers;
pub mod auth_handlers;
pub mod permission_handlers;
pub mod user_handlers;

use actix_web::web;
use serde::Serialize;

use crate::auth::middleware::{require_auth, require_json_content_type};

/// Mount the /api/v1 routes. Login is public; everything else sits behind
/// the auth guard. Mutations additionally require a JSON content type.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("/login", web::post().to(auth_handlers::login))
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(require_auth))
                    .route("/logout", web::post().to(auth_handlers::logout))
                    .route("/permissions", web::get().to(permission_handlers::list_catalog))
                    .route("/users", web::get().to(user_handlers::list))
                    .route("/users/{id}", web::get().to(user_handlers::read))
                    .route(
                        "/users/{id}/permissions",
                        web::get().to(permission_handlers::resolve),
                    )
                    .route(
                        "/users/{id}/permissions",
                        web::put().to(permission_handlers::replace),
                    )
                    .route("/audit", web::get().to(audit_handlers::list)),
            ),
    );
}

/// Standard reply shape for mutations: `{status, message}`.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub status: &'static str,
    pub message: String,
}

impl ApiMessage {
    pub fn success(message: impl Into<String>) -> Self {
        ApiMessage {
            status: "success",
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ApiMessage {
            status: "failure",
            message: message.into(),
        }
    }
}

//! HTTP request handlers

pub mod download;
pub mod error;
pub mod health;
pub mod upload;
pub mod upload_form;

use actix_web::web;

/// Register every route. `GET /{identifier}` goes last so it never shadows
/// the named endpoints.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(upload::upload)
        .service(download::download);
}

pub mod chat;
pub mod classes;
pub mod error;
pub mod extract;
pub mod health;
pub mod openapi;
pub mod tools;

use actix_web::web;

/// Register every route of the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(chat::configure)
        .configure(extract::configure)
        .configure(classes::configure)
        .configure(tools::configure)
        .configure(health::configure)
        .configure(openapi::configure);
}

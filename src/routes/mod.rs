// Route exports
pub mod error;
pub mod matches;
pub mod skills;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(skills::configure),
    );
}

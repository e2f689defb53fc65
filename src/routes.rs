use crate::{api::worker, config::Config};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            // /workers
            .service(web::resource("/workers").route(web::get().to(worker::list_workers))),
    );
}

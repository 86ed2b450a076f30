//! HTTP API
//!
//! Public read endpoints under `/api`, administration under `/api/admin`.
//! Errors are JSON bodies of the form `{"detail": "..."}`.

pub mod auth;
pub mod config;
pub mod handlers;

pub use auth::{Admin, Sessions, SESSION_COOKIE};
pub use config::{AppState, ServerConfig};

use actix_web::error::InternalError;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer};

use handlers::Detail;

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(Detail::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

#[rustfmt::skip]
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/districts", web::get().to(handlers::districts))
            .route("/districts/{id}/schools", web::get().to(handlers::district_schools))
            .route("/geo/districts", web::get().to(handlers::geo_districts))
            .route("/geo/region", web::get().to(handlers::geo_region))
            .route("/geo/borders", web::get().to(handlers::geo_borders))
            .service(
                web::scope("/admin")
                    .route("/login", web::post().to(handlers::login))
                    .route("/logout", web::post().to(handlers::logout))
                    .route("/data/upload", web::post().to(handlers::upload))
                    .route("/data/exists", web::get().to(handlers::data_exists))
                    .route("/data/download", web::get().to(handlers::download)),
            ),
    );
}

pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let bind = config.bind.clone();
    let state = AppState::load(config).map_err(|e| std::io::Error::other(format!("{:#}", e)))?;
    let state = web::Data::new(state);

    log::info!("listening on http://{}", bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(&bind)?
    .run()
    .await
}

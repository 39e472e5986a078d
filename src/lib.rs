pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod ml;
pub mod models;
pub mod utils;

use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

/// Registers every route. Shared by the server binary and the test
/// harness so both drive the same table.
pub fn app_config(cfg: &mut web::ServiceConfig) {
    let auth = HttpAuthentication::bearer(utils::jwt::validator);

    cfg.service(
        web::resource("/v1/register")
            .route(web::post().to(handlers::auth::register)),
    )
    .service(
        web::resource("/v1/login")
            .route(web::post().to(handlers::auth::login)),
    )
    .service(
        web::resource("/v1/admin/login")
            .route(web::post().to(handlers::auth::admin_login)),
    )
    .service(
        web::resource("/v1/logout")
            .wrap(auth.clone())
            .route(web::post().to(handlers::auth::logout)),
    )
    .service(
        web::resource("/v1/profile")
            .wrap(auth.clone())
            .route(web::get().to(handlers::profile::get_profile))
            .route(web::patch().to(handlers::profile::update_profile)),
    )
    .service(
        web::resource("/v1/settings")
            .wrap(auth.clone())
            .route(web::get().to(handlers::settings::get_settings)),
    )
    .service(
        web::resource("/v1/records")
            .wrap(auth.clone())
            .route(web::get().to(handlers::records::get_records))
            .route(web::post().to(handlers::records::create_record)),
    )
    .service(
        web::resource("/v1/records/random")
            .wrap(auth.clone())
            .route(web::post().to(handlers::records::create_random_record)),
    )
    .service(
        web::resource("/v1/recommendations")
            .wrap(auth.clone())
            .route(web::get().to(handlers::recommend::get_recommendations)),
    )
    .service(
        web::resource("/v1/stats/progress")
            .wrap(auth.clone())
            .route(web::get().to(handlers::stats::get_progress)),
    )
    .service(
        web::resource("/v1/stats/summary")
            .wrap(auth.clone())
            .route(web::get().to(handlers::stats::get_summary)),
    )
    .service(
        web::resource("/v1/admin/users")
            .wrap(auth.clone())
            .route(web::get().to(handlers::admin::get_users)),
    )
    .service(
        web::resource("/v1/admin/analytics")
            .wrap(auth.clone())
            .route(web::get().to(handlers::admin::get_analytics)),
    )
    .service(
        web::resource("/v1/admin/model/retrain")
            .wrap(auth.clone())
            .route(web::post().to(handlers::admin::retrain_model)),
    )
    .service(
        web::resource("/v1/admin/maintenance/backup")
            .wrap(auth.clone())
            .route(web::post().to(handlers::admin::backup_database)),
    )
    .service(
        web::resource("/v1/admin/maintenance/cache-clear")
            .wrap(auth.clone())
            .route(web::post().to(handlers::admin::clear_cache)),
    )
    .service(
        web::resource("/v1/admin/maintenance/shutdown")
            .wrap(auth.clone())
            .route(web::post().to(handlers::admin::shutdown_system)),
    );
}

use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use drinks_engine::{sqlite::db::create_database_if_missing, DrinkApi, SqliteDatabase};
use log::info;

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    errors::ServerError,
    routes::{configure_drink_routes, not_found},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    create_database_if_missing(&config.database_url)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    } else {
        info!("🚀️ Skipping database migrations");
    }
    let verifier = TokenVerifier::from_config(&config.auth)?;
    let srv = create_server_instance(config, db, verifier)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    verifier: TokenVerifier,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let drinks_api = DrinkApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("drinks::access_log"))
            .app_data(web::Data::new(drinks_api))
            .app_data(web::Data::new(verifier.clone()))
            .configure(configure_drink_routes::<SqliteDatabase>)
            .default_service(web::to(not_found))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

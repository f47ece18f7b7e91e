// storefront/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;
use storefront::config::AppConfig;
use storefront::db::PgStoreRepository;
use storefront::services::build_payment_provider;
use storefront::state::AppState;
use storefront::web::configure_app_routes;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
  tracing::error!(error = %e, "{}", context);
  std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront server...");

  let app_config = AppConfig::from_env()
    .map(Arc::new)
    .map_err(|e| startup_error("Failed to load application configuration", e))?;

  let db_pool = PgPool::connect(&app_config.database_url)
    .await
    .map_err(|e| startup_error("Failed to connect to the database", e))?;
  tracing::info!("Successfully connected to the database.");

  let payments =
    build_payment_provider(&app_config).map_err(|e| startup_error("Failed to set up the payment provider", e))?;
  let app_state = AppState::new(app_config.clone(), Arc::new(PgStoreRepository::new(db_pool)), payments);
  tracing::info!("Pipelines registered.");

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}

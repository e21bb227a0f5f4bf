//! BookStar recommendation service
//!
//! Serves hybrid book recommendations over HTTP, backed by the shared
//! PostgreSQL catalog and member store.

use actix_web::{web, App, HttpServer};
use bookstar_core::config::{ConfigLoader, DatabaseConfig, RecommendationConfig, ServiceConfig};
use bookstar_core::database::DatabasePool;
use bookstar_core::observability::{init_logging, LogConfig};
use bookstar_core::retry::{retry_with_backoff, RetryPolicy};
use bookstar_core::BookstarError;
use bookstar_recommend::http::{self, AppState};
use bookstar_recommend::recommendation::RecommendationService;
use bookstar_recommend::store::PgBookStore;
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    bookstar_core::config::load_dotenv();

    let service_config = ServiceConfig::from_env().map_err(to_io_error)?;
    service_config.validate().map_err(to_io_error)?;

    init_logging(&LogConfig::from_level(&service_config.log_level));

    let database_config = DatabaseConfig::from_env().map_err(to_io_error)?;
    database_config.validate().map_err(to_io_error)?;

    let recommendation_config = RecommendationConfig::from_env().map_err(to_io_error)?;
    recommendation_config.validate().map_err(to_io_error)?;

    let pool = retry_with_backoff(
        || DatabasePool::new(&database_config),
        RetryPolicy::startup(),
        BookstarError::is_retryable,
    )
    .await
    .map_err(to_io_error)?;

    let store: Arc<dyn bookstar_recommend::store::BookStore> =
        Arc::new(PgBookStore::new(pool.pool().clone()));
    let service = Arc::new(RecommendationService::new(
        store.clone(),
        recommendation_config,
    ));

    let state = web::Data::new(AppState {
        store,
        service,
    });

    info!(
        host = %service_config.host,
        port = service_config.port,
        "Starting recommendation service"
    );

    HttpServer::new(move || App::new().app_data(state.clone()).configure(http::configure))
        .workers(service_config.workers)
        .bind((service_config.host.as_str(), service_config.port))?
        .run()
        .await
}

fn to_io_error(e: BookstarError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

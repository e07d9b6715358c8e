mod handlers;

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::API;
use crate::config::Config;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{health, quotes};

type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router<T: API + Sync + Send + 'static>(api: T) -> Router {
    let api = Arc::new(api) as DynAPI;

    Router::new()
        .route("/api/quotes", post(quotes::create))
        .route("/api/quotes/:quote_id", get(quotes::find))
        .route("/api/health", get(health::check))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, config: Config) -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let app = router(api);

    tracing::info!("listening on {}", config.addr);

    axum::Server::try_bind(&config.addr)
        .map_err(|err| {
            tracing::error!("failed to bind {}: {}", config.addr, err);
            unexpected_error()
        })?
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server error: {}", err);
            unexpected_error()
        })
}

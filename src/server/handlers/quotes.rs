use axum::extract::{rejection::JsonRejection, Extension, Json, Path};

use crate::entities::{QuoteRequest, QuoteResponse};
use crate::error::{validation_error, Error, FieldError};
use crate::server::DynAPI;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>, Error> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::info!("malformed quote request: {}", rejection);
        validation_error(vec![FieldError::new("body", rejection.to_string())])
    })?;

    let quote = api.create_quote(request).await?;

    Ok(quote.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(quote_id): Path<String>,
) -> Result<Json<QuoteResponse>, Error> {
    let quote = api.find_quote(quote_id).await?;

    Ok(quote.into())
}

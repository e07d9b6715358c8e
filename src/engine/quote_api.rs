use super::Engine;

use async_trait::async_trait;

use crate::{
    api::QuoteAPI,
    entities::{QuoteLookup, QuoteRequest, QuoteResponse},
    error::{expired_error, not_found_error, validation_error, Error},
    pricing::calculate_quote_at,
};

#[async_trait]
impl QuoteAPI for Engine {
    #[tracing::instrument(skip(self, request))]
    async fn create_quote(&self, request: QuoteRequest) -> Result<QuoteResponse, Error> {
        let now = self.now();

        let errors = request.validate(now.date_naive());
        if !errors.is_empty() {
            tracing::info!("rejecting quote request with {} invalid fields", errors.len());
            return Err(validation_error(errors));
        }

        let quote = self.store.save_quote(calculate_quote_at(request, now));

        tracing::info!(quote_id = %quote.quote_id, total = quote.total, "quote created");

        Ok(quote)
    }

    #[tracing::instrument(skip(self))]
    async fn find_quote(&self, quote_id: String) -> Result<QuoteResponse, Error> {
        let lookup = self.store.find_quote(&quote_id, self.now());
        tracing::info!("quote lookup: {}", lookup.name());

        match lookup {
            QuoteLookup::Valid(quote) => Ok(quote),
            QuoteLookup::Expired(quote) => {
                tracing::info!("quote expired at {}", quote.expires_at);
                Err(expired_error())
            }
            QuoteLookup::Absent => Err(not_found_error()),
        }
    }
}

#[cfg(test)]
fn new_engine() -> Engine {
    use crate::store::MemoryQuoteStore;
    use std::sync::Arc;

    Engine::new(Arc::new(MemoryQuoteStore::new()))
}

#[test]
fn create_quote_stores_priced_quote() {
    use crate::entities::trip::sample_request;
    use tokio_test::block_on;

    let engine = new_engine();

    let quote = block_on(engine.create_quote(sample_request())).unwrap();
    assert_eq!(quote.total, 687.75);

    let found = block_on(engine.find_quote(quote.quote_id.clone())).unwrap();
    assert_eq!(found, quote);
    assert_eq!(engine.store().get_all_quotes().len(), 1);
}

#[test]
fn create_quote_rejects_invalid_request_without_storing() {
    use crate::entities::trip::sample_request;
    use tokio_test::block_on;

    let engine = new_engine();

    let mut request = sample_request();
    request.num_passengers = 0;
    request.dropoff_location.place_id = request.pickup_location.place_id.clone();

    let err = block_on(engine.create_quote(request)).unwrap_err();
    assert!(err.is_invalid_input_error());
    assert_eq!(err.errors.len(), 2);
    assert!(engine.store().get_all_quotes().is_empty());
}

#[test]
fn find_quote_distinguishes_missing_and_expired() {
    use crate::entities::trip::sample_request;
    use crate::pricing::calculate_quote_at;
    use chrono::{Duration, Utc};
    use tokio_test::block_on;

    let engine = new_engine();

    let err = block_on(engine.find_quote("no-such-quote".into())).unwrap_err();
    assert!(err.is_not_found_error());

    let stale = calculate_quote_at(sample_request(), Utc::now() - Duration::hours(25));
    engine.store().save_quote(stale.clone());

    let err = block_on(engine.find_quote(stale.quote_id)).unwrap_err();
    assert!(err.is_expired_error());
}

#[test]
fn injected_clock_drives_validation() {
    use crate::entities::trip::sample_request;
    use chrono::{DateTime, TimeZone, Utc};
    use tokio_test::block_on;

    fn far_future() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap()
    }

    let engine = new_engine().with_clock(far_future);

    let err = block_on(engine.create_quote(sample_request())).unwrap_err();
    assert_eq!(err.errors[0].field, "departureDate");
}

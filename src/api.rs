use async_trait::async_trait;

use crate::entities::{QuoteRequest, QuoteResponse};
use crate::error::Error;

#[async_trait]
pub trait QuoteAPI {
    /// Validates, prices and stores a new quote.
    async fn create_quote(&self, request: QuoteRequest) -> Result<QuoteResponse, Error>;

    /// Returns a stored quote if it exists and has not expired.
    async fn find_quote(&self, quote_id: String) -> Result<QuoteResponse, Error>;
}

pub trait API: QuoteAPI {}

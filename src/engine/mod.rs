mod quote_api;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{api::API, store::QuoteStore};

pub type Clock = fn() -> DateTime<Utc>;

pub struct Engine {
    store: Arc<dyn QuoteStore>,
    clock: Clock,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self {
            store,
            clock: Utc::now,
        }
    }

    /// Replaces the time source used for validation, stamping and expiry.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<dyn QuoteStore> {
        &self.store
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

impl API for Engine {}

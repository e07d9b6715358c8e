use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::entities::{QuoteLookup, QuoteResponse};

/// Keyed storage for generated quotes. Implementations never mutate quote
/// contents; expiry is decided by `find_quote`, not by the raw getters.
pub trait QuoteStore: Send + Sync {
    fn save_quote(&self, quote: QuoteResponse) -> QuoteResponse;

    fn get_quote(&self, quote_id: &str) -> Option<QuoteResponse>;

    fn get_all_quotes(&self) -> Vec<QuoteResponse>;

    fn find_quote(&self, quote_id: &str, now: DateTime<Utc>) -> QuoteLookup {
        QuoteLookup::classify(self.get_quote(quote_id), now)
    }
}

#[derive(Debug, Default)]
struct Quotes {
    by_id: HashMap<String, QuoteResponse>,
    order: Vec<String>,
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryQuoteStore {
    quotes: RwLock<Quotes>,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuoteStore for MemoryQuoteStore {
    fn save_quote(&self, quote: QuoteResponse) -> QuoteResponse {
        // writes replace whole entries, so a poisoned lock still guards consistent data
        let mut quotes = self.quotes.write().unwrap_or_else(PoisonError::into_inner);

        if quotes
            .by_id
            .insert(quote.quote_id.clone(), quote.clone())
            .is_none()
        {
            quotes.order.push(quote.quote_id.clone());
        }

        quote
    }

    fn get_quote(&self, quote_id: &str) -> Option<QuoteResponse> {
        let quotes = self.quotes.read().unwrap_or_else(PoisonError::into_inner);

        quotes.by_id.get(quote_id).cloned()
    }

    fn get_all_quotes(&self) -> Vec<QuoteResponse> {
        let quotes = self.quotes.read().unwrap_or_else(PoisonError::into_inner);

        quotes
            .order
            .iter()
            .filter_map(|id| quotes.by_id.get(id).cloned())
            .collect()
    }
}

#[test]
fn unknown_id_is_absent() {
    let store = MemoryQuoteStore::new();

    assert!(store.get_quote("missing").is_none());
    assert_eq!(store.find_quote("missing", Utc::now()), QuoteLookup::Absent);
    assert!(store.get_all_quotes().is_empty());
}

#[test]
fn save_is_idempotent_and_keeps_insertion_order() {
    use crate::entities::trip::sample_request;
    use crate::pricing::calculate_quote;

    let store = MemoryQuoteStore::new();
    let first = calculate_quote(sample_request());
    let second = calculate_quote(sample_request());

    assert_eq!(store.save_quote(first.clone()), first);
    store.save_quote(second.clone());
    store.save_quote(first.clone());

    let ids: Vec<String> = store
        .get_all_quotes()
        .into_iter()
        .map(|quote| quote.quote_id)
        .collect();
    assert_eq!(ids, vec![first.quote_id.clone(), second.quote_id.clone()]);
    assert_eq!(store.get_quote(&first.quote_id), Some(first));
}

#[test]
fn expired_quotes_are_still_returned_by_get() {
    use crate::entities::trip::sample_request;
    use crate::pricing::calculate_quote_at;
    use chrono::Duration;

    let store = MemoryQuoteStore::new();
    let created = Utc::now() - Duration::hours(48);
    let quote = store.save_quote(calculate_quote_at(sample_request(), created));

    assert_eq!(store.get_quote(&quote.quote_id), Some(quote.clone()));
    assert!(matches!(
        store.find_quote(&quote.quote_id, Utc::now()),
        QuoteLookup::Expired(_)
    ));
    assert!(matches!(
        store.find_quote(&quote.quote_id, created + Duration::hours(1)),
        QuoteLookup::Valid(_)
    ));
}

#[test]
fn concurrent_saves_do_not_interfere() {
    use crate::entities::trip::sample_request;
    use crate::pricing::calculate_quote;
    use std::sync::Arc;
    use std::thread;

    let store = Arc::new(MemoryQuoteStore::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                let quote = store.save_quote(calculate_quote(sample_request()));
                assert_eq!(store.get_quote(&quote.quote_id), Some(quote));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.get_all_quotes().len(), 8);
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::QuoteRequest;

/// One line of the price explanation. Multiplier lines carry a zero amount
/// and exist for display only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteBreakdownItem {
    pub name: String,
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
}

impl QuoteBreakdownItem {
    pub fn charge(name: impl Into<String>, description: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            amount,
            multiplier: None,
        }
    }

    pub fn multiplier(
        name: impl Into<String>,
        description: impl Into<String>,
        multiplier: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            amount: 0.0,
            multiplier: Some(multiplier),
        }
    }

    pub fn is_multiplier(&self) -> bool {
        self.multiplier.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quote_id: String,
    pub trip_details: QuoteRequest,
    pub breakdown: Vec<QuoteBreakdownItem>,
    pub subtotal: f64,
    pub service_fee: f64,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl QuoteResponse {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Outcome of looking a quote up with its validity window enforced.
#[derive(Clone, Debug, PartialEq)]
pub enum QuoteLookup {
    Valid(QuoteResponse),
    Expired(QuoteResponse),
    Absent,
}

impl QuoteLookup {
    pub fn classify(maybe_quote: Option<QuoteResponse>, now: DateTime<Utc>) -> Self {
        match maybe_quote {
            Some(quote) if quote.is_expired_at(now) => Self::Expired(quote),
            Some(quote) => Self::Valid(quote),
            None => Self::Absent,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Valid(_) => "valid",
            Self::Expired(_) => "expired",
            Self::Absent => "absent",
        }
    }
}

#[test]
fn multiplier_lines_have_zero_amount() {
    let line = QuoteBreakdownItem::multiplier("Round Trip", "Return journey", 1.8);

    assert!(line.is_multiplier());
    assert_eq!(line.amount, 0.0);

    let json = serde_json::to_value(&QuoteBreakdownItem::charge("Duration Fee", "", 120.0)).unwrap();
    assert!(json.get("multiplier").is_none());
}

#[test]
fn classify_uses_strict_expiry() {
    use crate::entities::trip::sample_request;
    use chrono::Duration;

    let now = Utc::now();
    let quote = QuoteResponse {
        quote_id: "q".into(),
        trip_details: sample_request(),
        breakdown: vec![],
        subtotal: 0.0,
        service_fee: 0.0,
        total: 0.0,
        created_at: now - Duration::hours(24),
        expires_at: now,
    };

    assert_eq!(QuoteLookup::classify(Some(quote.clone()), now).name(), "valid");
    assert_eq!(
        QuoteLookup::classify(Some(quote), now + Duration::seconds(1)).name(),
        "expired"
    );
    assert_eq!(QuoteLookup::classify(None, now), QuoteLookup::Absent);
}

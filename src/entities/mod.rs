mod location;
mod quote;
pub(crate) mod trip;

pub use location::{Coordinates, Location};
pub use quote::{QuoteBreakdownItem, QuoteLookup, QuoteResponse};
pub use trip::{BusType, QuoteRequest, TripType};

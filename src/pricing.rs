use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::entities::{BusType, QuoteBreakdownItem, QuoteRequest, QuoteResponse};

pub const SERVICE_FEE_RATE: f64 = 0.05;
pub const ROUND_TRIP_MULTIPLIER: f64 = 1.8;
pub const FALLBACK_DISTANCE_FEE: f64 = 85.0;
pub const DURATION_FEE: f64 = 120.0;
pub const QUOTE_VALIDITY_HOURS: i64 = 24;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BusRate {
    pub rate_per_mile: f64,
    pub minimum_fare: f64,
}

impl BusRate {
    pub fn for_bus(bus_type: BusType) -> Self {
        match bus_type {
            BusType::Standard => Self {
                rate_per_mile: 3.25,
                minimum_fare: 350.0,
            },
            BusType::Luxury => Self {
                rate_per_mile: 4.5,
                minimum_fare: 450.0,
            },
        }
    }

    pub fn base_fare(&self, miles: f64) -> f64 {
        (miles * self.rate_per_mile).max(self.minimum_fare)
    }
}

/// Flat surcharge for larger groups.
pub fn passenger_surcharge(num_passengers: i32) -> f64 {
    match num_passengers {
        n if n > 50 => 150.0,
        n if n > 30 => 100.0,
        n if n > 15 => 50.0,
        _ => 0.0,
    }
}

/// Unknown tags are free.
pub fn amenity_fee(tag: &str) -> f64 {
    match tag {
        "wifi" => 25.0,
        "power_outlets" => 25.0,
        "restroom" => 50.0,
        "entertainment" => 40.0,
        "refreshments" => 60.0,
        "luggage_trailer" => 75.0,
        _ => 0.0,
    }
}

pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn calculate_quote(request: QuoteRequest) -> QuoteResponse {
    calculate_quote_at(request, Utc::now())
}

#[tracing::instrument(skip(request), fields(bus_type = request.bus_type.name()))]
pub fn calculate_quote_at(request: QuoteRequest, now: DateTime<Utc>) -> QuoteResponse {
    let mut breakdown = vec![];

    let distance = match (
        request.pickup_location.coordinates(),
        request.dropoff_location.coordinates(),
    ) {
        (Some(pickup), Some(dropoff)) => Some(pickup.distance_miles(&dropoff)),
        _ => None,
    };

    let rate = BusRate::for_bus(request.bus_type);
    let base_fare = round_currency(rate.base_fare(distance.unwrap_or(0.0)));
    let base_description = match distance {
        Some(miles) => format!(
            "{} miles at ${:.2}/mile (${:.2} minimum)",
            miles, rate.rate_per_mile, rate.minimum_fare
        ),
        None => format!("Minimum fare for a {} charter bus", request.bus_type.name()),
    };
    breakdown.push(QuoteBreakdownItem::charge(
        format!("Base Fare ({})", request.bus_type.name()),
        base_description,
        base_fare,
    ));

    breakdown.push(QuoteBreakdownItem::charge(
        "Passenger Count Adjustment",
        format!("Based on {} passengers", request.num_passengers),
        passenger_surcharge(request.num_passengers),
    ));

    if distance.is_none() {
        tracing::info!("coordinates unavailable, using fallback distance fee");
        breakdown.push(QuoteBreakdownItem::charge(
            "Distance Fee",
            format!(
                "Estimated, from {} to {}",
                request.pickup_location.short_name(),
                request.dropoff_location.short_name()
            ),
            FALLBACK_DISTANCE_FEE,
        ));
    }

    breakdown.push(QuoteBreakdownItem::charge(
        "Duration Fee",
        "Estimated trip time",
        DURATION_FEE,
    ));

    let amenities = request.distinct_amenities();
    if !amenities.is_empty() {
        let fees: f64 = amenities.iter().map(|tag| amenity_fee(tag)).sum();
        breakdown.push(QuoteBreakdownItem::charge(
            "Additional Amenities",
            format!("{} amenities selected", amenities.len()),
            round_currency(fees),
        ));
    }

    if request.is_round_trip() {
        breakdown.push(QuoteBreakdownItem::multiplier(
            "Round Trip Multiplier",
            "Base fare scaled for the return journey",
            ROUND_TRIP_MULTIPLIER,
        ));
        breakdown.push(QuoteBreakdownItem::charge(
            "Return Leg Surcharge",
            format!(
                "Base fare x {:.1} for the return journey",
                ROUND_TRIP_MULTIPLIER - 1.0
            ),
            round_currency(base_fare * (ROUND_TRIP_MULTIPLIER - 1.0)),
        ));
    }

    let subtotal = round_currency(breakdown.iter().map(|item| item.amount).sum());
    let service_fee = round_currency(subtotal * SERVICE_FEE_RATE);
    let total = round_currency(subtotal + service_fee);

    QuoteResponse {
        quote_id: Uuid::new_v4().to_string(),
        trip_details: request,
        breakdown,
        subtotal,
        service_fee,
        total,
        created_at: now,
        expires_at: now + Duration::hours(QUOTE_VALIDITY_HOURS),
    }
}

#[cfg(test)]
fn assert_cents(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.005,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[cfg(test)]
fn place_hundred_miles_apart(request: &mut QuoteRequest) {
    request.pickup_location.lat = Some(0.0);
    request.pickup_location.lng = Some(0.0);
    request.dropoff_location.lat = Some(0.0);
    request.dropoff_location.lng = Some((100.0_f64 / 3958.8).to_degrees());
}

#[test]
fn forty_passengers_standard_without_coordinates() {
    use crate::entities::trip::sample_request;

    let quote = calculate_quote(sample_request());

    let amounts: Vec<f64> = quote.breakdown.iter().map(|item| item.amount).collect();
    assert_eq!(amounts, vec![350.0, 100.0, 85.0, 120.0]);
    assert_cents(quote.subtotal, 655.0);
    assert_cents(quote.service_fee, 32.75);
    assert_cents(quote.total, 687.75);
    assert_eq!(quote.breakdown[2].description, "Estimated, from Union Station to Navy Pier");
}

#[test]
fn luxury_round_trip_hundred_miles() {
    use crate::entities::trip::sample_request;
    use crate::entities::TripType;

    let mut request = sample_request();
    request.bus_type = BusType::Luxury;
    request.trip_type = TripType::RoundTrip;
    request.return_date = Some("2030-06-02".into());
    request.num_passengers = 10;
    place_hundred_miles_apart(&mut request);

    let quote = calculate_quote(request);

    assert_cents(quote.breakdown[0].amount, 450.0);
    assert!(quote.breakdown.iter().all(|item| item.name != "Distance Fee"));

    let multiplier = quote
        .breakdown
        .iter()
        .find(|item| item.is_multiplier())
        .unwrap();
    assert_eq!(multiplier.multiplier, Some(1.8));
    assert_eq!(multiplier.amount, 0.0);

    let surcharge = quote.breakdown.last().unwrap();
    assert_eq!(surcharge.name, "Return Leg Surcharge");
    assert_cents(surcharge.amount, 360.0);

    assert_cents(quote.subtotal, 930.0);
    assert_cents(quote.service_fee, 46.5);
    assert_cents(quote.total, 976.5);
}

#[test]
fn long_distance_exceeds_minimum_fare() {
    use crate::entities::trip::sample_request;

    let mut request = sample_request();
    request.pickup_location.lat = Some(0.0);
    request.pickup_location.lng = Some(0.0);
    request.dropoff_location.lat = Some(0.0);
    request.dropoff_location.lng = Some((200.0_f64 / 3958.8).to_degrees());

    let quote = calculate_quote(request);
    assert_cents(quote.breakdown[0].amount, 650.0);
}

#[test]
fn luxury_costs_more_than_standard() {
    use crate::entities::trip::sample_request;

    for miles_apart in [false, true] {
        let mut standard = sample_request();
        if miles_apart {
            place_hundred_miles_apart(&mut standard);
        }
        let mut luxury = standard.clone();
        luxury.bus_type = BusType::Luxury;

        let standard = calculate_quote(standard);
        let luxury = calculate_quote(luxury);
        assert!(luxury.breakdown[0].amount > standard.breakdown[0].amount);
        assert!(luxury.total > standard.total);
    }

    let standard = BusRate::for_bus(BusType::Standard);
    let luxury = BusRate::for_bus(BusType::Luxury);
    assert!(luxury.rate_per_mile > standard.rate_per_mile);
    assert!(luxury.minimum_fare > standard.minimum_fare);
}

#[test]
fn round_trip_costs_more_than_one_way() {
    use crate::entities::trip::sample_request;
    use crate::entities::TripType;

    let one_way = sample_request();
    let mut round_trip = one_way.clone();
    round_trip.trip_type = TripType::RoundTrip;
    round_trip.return_date = Some("2030-06-05".into());

    assert!(calculate_quote(round_trip).total > calculate_quote(one_way).total);
}

#[test]
fn passenger_bands() {
    assert_eq!(passenger_surcharge(1), 0.0);
    assert_eq!(passenger_surcharge(15), 0.0);
    assert_eq!(passenger_surcharge(16), 50.0);
    assert_eq!(passenger_surcharge(30), 50.0);
    assert_eq!(passenger_surcharge(31), 100.0);
    assert_eq!(passenger_surcharge(50), 100.0);
    assert_eq!(passenger_surcharge(51), 150.0);
    assert_eq!(passenger_surcharge(100), 150.0);
}

#[test]
fn amenities_sum_known_tags_only() {
    use crate::entities::trip::sample_request;

    let mut request = sample_request();
    request.amenities = vec![
        "wifi".into(),
        "restroom".into(),
        "hot_tub".into(),
        "wifi".into(),
    ];

    let quote = calculate_quote(request);
    let amenities = quote
        .breakdown
        .iter()
        .find(|item| item.name == "Additional Amenities")
        .unwrap();
    assert_cents(amenities.amount, 75.0);
    assert_eq!(amenities.description, "3 amenities selected");
    assert_cents(quote.subtotal, 730.0);
}

#[test]
fn totals_are_consistent_and_non_negative() {
    use crate::entities::trip::sample_request;
    use crate::entities::TripType;

    for passengers in [1, 16, 31, 51, 100] {
        for bus_type in [BusType::Standard, BusType::Luxury] {
            for trip_type in [TripType::OneWay, TripType::RoundTrip] {
                let mut request = sample_request();
                request.num_passengers = passengers;
                request.bus_type = bus_type;
                request.trip_type = trip_type;
                request.amenities = vec!["entertainment".into(), "unknown".into()];

                let quote = calculate_quote(request);
                assert!(quote.subtotal >= 0.0);
                assert!(quote.breakdown.iter().all(|item| item.amount >= 0.0));
                assert!(quote
                    .breakdown
                    .iter()
                    .filter(|item| item.is_multiplier())
                    .all(|item| item.amount == 0.0));
                assert_cents(quote.service_fee, round_currency(quote.subtotal * SERVICE_FEE_RATE));
                assert_cents(quote.total, quote.subtotal + quote.service_fee);
            }
        }
    }
}

#[test]
fn quote_expires_a_day_after_creation() {
    use crate::entities::trip::sample_request;

    let now = Utc::now();
    let first = calculate_quote_at(sample_request(), now);
    let second = calculate_quote_at(sample_request(), now);

    assert_eq!(first.created_at, now);
    assert_eq!(first.expires_at - first.created_at, Duration::hours(24));
    assert_ne!(first.quote_id, second.quote_id);
    assert!(Uuid::parse_str(&first.quote_id).is_ok());
}

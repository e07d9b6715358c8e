use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::Location;
use crate::error::FieldError;

pub const MIN_PASSENGERS: i32 = 1;
pub const MAX_PASSENGERS: i32 = 100;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TripType {
    OneWay,
    RoundTrip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BusType {
    Standard,
    Luxury,
}

impl BusType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Luxury => "luxury",
        }
    }
}

/// Trip parameters submitted by the customer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub trip_type: TripType,
    pub num_passengers: i32,
    pub departure_date: String,
    pub departure_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    pub bus_type: BusType,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<String>,
}

impl QuoteRequest {
    pub fn is_round_trip(&self) -> bool {
        self.trip_type == TripType::RoundTrip
    }

    /// Selected amenity tags with duplicates removed, first occurrence wins.
    pub fn distinct_amenities(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::with_capacity(self.amenities.len());

        for tag in self.amenities.iter().map(|tag| tag.trim()) {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        tags
    }

    /// Collects every structural problem with the request. An empty result
    /// means the request can be priced.
    pub fn validate(&self, today: NaiveDate) -> Vec<FieldError> {
        let mut errors = vec![];

        let departure = match NaiveDate::parse_from_str(&self.departure_date, DATE_FORMAT) {
            Ok(date) => {
                if date < today {
                    errors.push(FieldError::new(
                        "departureDate",
                        "Departure date cannot be in the past",
                    ));
                }
                Some(date)
            }
            Err(_) => {
                errors.push(FieldError::new(
                    "departureDate",
                    "Departure date must be a valid date (YYYY-MM-DD)",
                ));
                None
            }
        };

        if self.departure_time.trim().is_empty() {
            errors.push(FieldError::new(
                "departureTime",
                "Departure time is required",
            ));
        }

        if self.is_round_trip() {
            match self.return_date.as_deref().map(str::trim) {
                None | Some("") => errors.push(FieldError::new(
                    "returnDate",
                    "Return date is required for round trips",
                )),
                Some(raw) => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                    Ok(date) => {
                        if departure.map_or(false, |departure| date < departure) {
                            errors.push(FieldError::new(
                                "returnDate",
                                "Return date must be after departure date",
                            ));
                        }
                    }
                    Err(_) => errors.push(FieldError::new(
                        "returnDate",
                        "Return date must be a valid date (YYYY-MM-DD)",
                    )),
                },
            }
        }

        if self.num_passengers < MIN_PASSENGERS {
            errors.push(FieldError::new(
                "numPassengers",
                "Number of passengers must be at least 1",
            ));
        }

        if self.num_passengers > MAX_PASSENGERS {
            errors.push(FieldError::new(
                "numPassengers",
                "Number of passengers cannot exceed 100",
            ));
        }

        if !self.pickup_location.is_resolved() {
            errors.push(FieldError::new(
                "pickupLocation",
                "Valid pickup location is required",
            ));
        }

        if !self.dropoff_location.is_resolved() {
            errors.push(FieldError::new(
                "dropoffLocation",
                "Valid dropoff location is required",
            ));
        }

        if self.pickup_location.is_resolved()
            && self.pickup_location.place_id == self.dropoff_location.place_id
        {
            errors.push(FieldError::new(
                "dropoffLocation",
                "Pickup and dropoff locations cannot be the same",
            ));
        }

        errors
    }
}

#[cfg(test)]
pub(crate) fn sample_request() -> QuoteRequest {
    QuoteRequest {
        trip_type: TripType::OneWay,
        num_passengers: 40,
        departure_date: "2030-06-01".into(),
        departure_time: "09:30".into(),
        return_date: None,
        pickup_location: Location {
            place_id: "pickup-place".into(),
            formatted_address: "Union Station, Chicago, IL, USA".into(),
            address_input: "union station".into(),
            lat: None,
            lng: None,
        },
        dropoff_location: Location {
            place_id: "dropoff-place".into(),
            formatted_address: "Navy Pier, Chicago, IL, USA".into(),
            address_input: "navy pier".into(),
            lat: None,
            lng: None,
        },
        bus_type: BusType::Standard,
        amenities: vec![],
        special_requirements: None,
    }
}

#[cfg(test)]
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()
}

#[test]
fn valid_request_has_no_errors() {
    assert!(sample_request().validate(today()).is_empty());
}

#[test]
fn request_deserializes_from_camel_case_without_optionals() {
    let request: QuoteRequest = serde_json::from_value(serde_json::json!({
        "tripType": "roundTrip",
        "numPassengers": 12,
        "departureDate": "2030-06-01",
        "departureTime": "08:00",
        "returnDate": "2030-06-03",
        "pickupLocation": {
            "placeId": "a",
            "formattedAddress": "A Street, Town",
            "addressInput": "a street"
        },
        "dropoffLocation": {
            "placeId": "b",
            "formattedAddress": "B Avenue, Town",
            "addressInput": "b avenue",
            "lat": 41.0,
            "lng": -87.0
        },
        "busType": "luxury"
    }))
    .unwrap();

    assert_eq!(request.trip_type, TripType::RoundTrip);
    assert_eq!(request.bus_type, BusType::Luxury);
    assert!(request.amenities.is_empty());
    assert!(request.pickup_location.coordinates().is_none());
    assert!(request.dropoff_location.coordinates().is_some());
}

#[test]
fn past_departure_and_passenger_range_are_reported() {
    let mut request = sample_request();
    request.departure_date = "2029-12-31".into();
    request.num_passengers = 101;

    let errors = request.validate(today());
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["departureDate", "numPassengers"]);

    request.num_passengers = 0;
    let errors = request.validate(today());
    assert!(errors
        .iter()
        .any(|e| e.message == "Number of passengers must be at least 1"));
}

#[test]
fn round_trip_requires_ordered_return_date() {
    let mut request = sample_request();
    request.trip_type = TripType::RoundTrip;

    let errors = request.validate(today());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "returnDate");

    request.return_date = Some("2030-05-30".into());
    let errors = request.validate(today());
    assert_eq!(errors[0].message, "Return date must be after departure date");

    request.return_date = Some("2030-06-01".into());
    assert!(request.validate(today()).is_empty());
}

#[test]
fn unresolved_and_identical_locations_are_reported() {
    let mut request = sample_request();
    request.pickup_location.place_id = "".into();

    let errors = request.validate(today());
    assert_eq!(errors, vec![FieldError::new("pickupLocation", "Valid pickup location is required")]);

    request.pickup_location.place_id = "same".into();
    request.dropoff_location.place_id = "same".into();
    let errors = request.validate(today());
    assert_eq!(
        errors,
        vec![FieldError::new(
            "dropoffLocation",
            "Pickup and dropoff locations cannot be the same"
        )]
    );
}

#[test]
fn malformed_dates_are_reported() {
    let mut request = sample_request();
    request.departure_date = "next tuesday".into();

    let errors = request.validate(today());
    assert_eq!(errors[0].field, "departureDate");
}

#[test]
fn duplicate_amenities_count_once() {
    let mut request = sample_request();
    request.amenities = vec!["wifi".into(), "restroom".into(), "wifi".into(), " ".into()];

    assert_eq!(request.distinct_amenities(), vec!["wifi", "restroom"]);
}

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_MILES: f64 = 3958.8;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Great-circle distance in miles, rounded to one decimal place.
    pub fn distance_miles(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        (EARTH_RADIUS_MILES * c * 10.0).round() / 10.0
    }
}

/// A place picked by the customer. An empty `place_id` means the address
/// has not been resolved yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub place_id: String,
    pub formatted_address: String,
    pub address_input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl Location {
    pub fn is_resolved(&self) -> bool {
        !self.place_id.is_empty()
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }

    /// First component of the formatted address, e.g. the venue or street.
    pub fn short_name(&self) -> &str {
        let source = if self.formatted_address.is_empty() {
            &self.address_input
        } else {
            &self.formatted_address
        };

        source.split(',').next().unwrap_or_default().trim()
    }
}

#[test]
fn distance_between_identical_points_is_zero() {
    let point = Coordinates {
        lat: 40.7128,
        lng: -74.006,
    };

    assert_eq!(point.distance_miles(&point), 0.0);
}

#[test]
fn distance_along_equator_matches_arc_length() {
    let origin = Coordinates { lat: 0.0, lng: 0.0 };
    let destination = Coordinates {
        lat: 0.0,
        lng: (100.0 / EARTH_RADIUS_MILES).to_degrees(),
    };

    assert_eq!(origin.distance_miles(&destination), 100.0);
    assert_eq!(destination.distance_miles(&origin), 100.0);
}

#[test]
fn distance_new_york_to_philadelphia() {
    let new_york = Coordinates {
        lat: 40.7128,
        lng: -74.006,
    };
    let philadelphia = Coordinates {
        lat: 39.9526,
        lng: -75.1652,
    };

    let miles = new_york.distance_miles(&philadelphia);
    assert!(miles > 80.0 && miles < 81.0, "got {}", miles);
}

#[test]
fn coordinates_require_both_components() {
    let mut location = Location {
        place_id: "ChIJOwg_06VPwokRYv534QaPC8g".into(),
        formatted_address: "Times Square, Manhattan, NY, USA".into(),
        address_input: "times sq".into(),
        lat: Some(40.758),
        lng: None,
    };
    assert!(location.coordinates().is_none());

    location.lng = Some(-73.9855);
    assert_eq!(
        location.coordinates(),
        Some(Coordinates {
            lat: 40.758,
            lng: -73.9855
        })
    );
    assert_eq!(location.short_name(), "Times Square");
}

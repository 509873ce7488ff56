use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoordinateError;

/// Point on the map a request is issued for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        // `contains` is false for NaN, so non-finite input is rejected too.
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Normalized, UI-ready result of a current-weather request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: Option<String>,
    /// Kelvin, truncated toward zero.
    pub temperature: Option<i64>,
    pub summary: Option<String>,
    pub country_code: Option<String>,
    pub timestamp: DateTime<Utc>,
}

//! Classification and decoding of current-weather response bodies.
//!
//! The error envelope `{"cod": .., "message": ..}` overlaps structurally with
//! the success envelope (which also carries `"cod": 200`), so decoding is an
//! ordered check: error envelope with a non-200 code first, success envelope
//! second.
//!
//! Docs: https://openweathermap.org/current

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::model::WeatherSnapshot;

/// Code the provider reports alongside a successful payload.
const SUCCESS_CODE: i64 = 200;

/// Error envelope reported by the provider, e.g. `{"cod":401,"message":"Invalid API key."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestErrorPayload {
    #[serde(rename = "cod", deserialize_with = "code_from_int_or_string")]
    pub code: i64,
    pub message: String,
}

impl RequestErrorPayload {
    pub fn is_error(&self) -> bool {
        self.code != SUCCESS_CODE
    }
}

/// Structural view of the success envelope. Only lives during decoding.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWeatherPayload {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub dt: DateTime<Utc>,
    pub name: Option<String>,
    pub sys: RawSys,
    pub weather: Vec<RawCondition>,
    pub main: RawMain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSys {
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCondition {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMain {
    pub temp: Option<f64>,
}

/// Why a body did not decode into a [`RawWeatherPayload`].
#[derive(Debug)]
pub enum DecodeOutcome {
    RequestError(RequestErrorPayload),
    MalformedPayload(serde_json::Error),
}

/// Decode a response body.
pub fn decode(bytes: &[u8]) -> Result<RawWeatherPayload, DecodeOutcome> {
    if let Ok(payload) = serde_json::from_slice::<RequestErrorPayload>(bytes) {
        if payload.is_error() {
            return Err(DecodeOutcome::RequestError(payload));
        }
    }

    serde_json::from_slice(bytes).map_err(DecodeOutcome::MalformedPayload)
}

impl From<RawWeatherPayload> for WeatherSnapshot {
    fn from(raw: RawWeatherPayload) -> Self {
        Self {
            name: raw.name,
            // Truncation toward zero, not rounding.
            temperature: raw.main.temp.map(|t| t.trunc() as i64),
            summary: raw.weather.into_iter().next().and_then(|w| w.description),
            country_code: raw.sys.country,
            timestamp: raw.dt,
        }
    }
}

// The endpoint reports `cod` as a number for most errors and as a string for some.
fn code_from_int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Number(i64),
        Text(String),
    }

    match Code::deserialize(deserializer)? {
        Code::Number(code) => Ok(code),
        Code::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

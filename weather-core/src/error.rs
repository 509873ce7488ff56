//! Error taxonomy of the weather subsystem.
//!
//! Configuration-time failures (`InitError`) block provider construction;
//! everything a single request can run into is a `CurrentWeatherError`.

use thiserror::Error;

use crate::decode::RequestErrorPayload;

/// Failure to turn raw configuration into a `ServiceHandle`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    #[error("API key is missing or empty")]
    EmptyAuthKey,

    #[error("base address is not a valid absolute URL")]
    InvalidBaseAddress,
}

/// Failure to assemble a request URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unable to construct URL components from '{0}'")]
    UnableToConstructComponents(String),

    #[error("unable to construct final URL: {0}")]
    UnableToConstructFinalUrl(String),
}

/// Rejected latitude/longitude pair.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Failure of the byte-fetching step.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("fetch worker terminated: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Everything a current-weather request can complete with besides a snapshot.
#[derive(Error, Debug)]
pub enum CurrentWeatherError {
    #[error("weather provider is unavailable: {0}")]
    ProviderUnavailable(InitError),

    #[error("unable to construct endpoint: {0}")]
    UnableToConstructEndpoint(QueryError),

    #[error("failed to fetch data: {0}")]
    FailedToFetchData(TransportError),

    #[error("failed to decode response: {0}")]
    FailedToDecode(serde_json::Error),

    #[error("request rejected by provider (code {}): {}", .0.code, .0.message)]
    InvalidRequest(RequestErrorPayload),
}

impl CurrentWeatherError {
    /// User-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::ProviderUnavailable(InitError::EmptyAuthKey) => {
                "Weather service is not configured: no API key.".to_string()
            }
            Self::ProviderUnavailable(InitError::InvalidBaseAddress) => {
                "Weather service is not configured: the service address is invalid.".to_string()
            }
            Self::UnableToConstructEndpoint(_) => {
                "Could not build a request for this location.".to_string()
            }
            Self::FailedToFetchData(_) => {
                "Network problem while contacting the weather service. Try again.".to_string()
            }
            Self::FailedToDecode(_) => {
                "The weather service sent a response that could not be read.".to_string()
            }
            Self::InvalidRequest(payload) => {
                format!("The weather service refused the request: {}", payload.message)
            }
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FailedToFetchData(_) | Self::InvalidRequest(_))
    }
}

//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Validated service configuration (`ServiceHandle`) and on-disk settings
//! - Query construction and response decoding for the current-weather endpoint
//! - The `WeatherProvider` pipeline and its error taxonomy
//! - `LocationInfo` and the `WeatherSession` that drives it
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod decode;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod query;
pub mod service;
pub mod session;
pub mod transport;

pub use config::Config;
pub use decode::{DecodeOutcome, RawWeatherPayload, RequestErrorPayload};
pub use error::{CoordinateError, CurrentWeatherError, InitError, QueryError, TransportError};
pub use location::LocationInfo;
pub use model::{Coordinate, WeatherSnapshot};
pub use provider::WeatherProvider;
pub use service::{DEFAULT_BASE_ADDRESS, ServiceHandle};
pub use session::{Completion, Delivery, RequestId, WeatherSession};
pub use transport::{HttpTransport, Transport};

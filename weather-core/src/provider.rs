use std::sync::Arc;

use url::Url;

use crate::{
    Config,
    decode::{self, DecodeOutcome},
    error::{CurrentWeatherError, InitError},
    model::{Coordinate, WeatherSnapshot},
    service::ServiceHandle,
    transport::Transport,
};

/// Endpoint path of the current-weather resource, relative to the base address.
pub const CURRENT_WEATHER_PATH: &str = "weather";

/// Turns a coordinate into a weather result.
///
/// Construction never fails: invalid configuration is captured as
/// `Unavailable` and reported by every request.
#[derive(Debug, Clone)]
pub enum WeatherProvider {
    Ready(Arc<ServiceHandle>),
    Unavailable(InitError),
}

impl WeatherProvider {
    pub fn new(auth_key: Option<&str>, base_address: Option<&str>) -> Self {
        match ServiceHandle::initialize(auth_key, base_address) {
            Ok(handle) => Self::Ready(Arc::new(handle)),
            Err(err) => {
                tracing::warn!(error = %err, "weather provider unavailable");
                Self::Unavailable(err)
            }
        }
    }

    /// Construct the provider from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_key.as_deref(), config.base_address.as_deref())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Fetch current weather for `coordinate`.
    ///
    /// Never resolves on its first poll, including the early-failure paths
    /// that perform no I/O. Fetch and decode run on a spawned worker task; the
    /// result is handed back to the task awaiting this future.
    pub async fn request_current_weather(
        &self,
        transport: Arc<dyn Transport>,
        coordinate: Coordinate,
    ) -> Result<WeatherSnapshot, CurrentWeatherError> {
        let handle = match self {
            Self::Ready(handle) => handle,
            Self::Unavailable(err) => {
                tokio::task::yield_now().await;
                return Err(CurrentWeatherError::ProviderUnavailable(*err));
            }
        };

        let params = [
            ("lat", coordinate.latitude().to_string()),
            ("lon", coordinate.longitude().to_string()),
        ];

        let query = match handle.prepare_query(CURRENT_WEATHER_PATH, &params) {
            Ok(query) => query,
            Err(err) => {
                tokio::task::yield_now().await;
                return Err(CurrentWeatherError::UnableToConstructEndpoint(err));
            }
        };

        let worker = tokio::spawn(fetch_and_decode(transport, query));

        match worker.await {
            Ok(result) => result,
            Err(join_err) => Err(CurrentWeatherError::FailedToFetchData(join_err.into())),
        }
    }
}

async fn fetch_and_decode(
    transport: Arc<dyn Transport>,
    query: Url,
) -> Result<WeatherSnapshot, CurrentWeatherError> {
    let bytes = transport
        .fetch(&query)
        .await
        .map_err(CurrentWeatherError::FailedToFetchData)?;

    match decode::decode(&bytes) {
        Ok(raw) => Ok(WeatherSnapshot::from(raw)),
        Err(DecodeOutcome::RequestError(payload)) => {
            tracing::warn!(code = payload.code, message = %payload.message, "provider rejected request");
            Err(CurrentWeatherError::InvalidRequest(payload))
        }
        Err(DecodeOutcome::MalformedPayload(err)) => {
            tracing::warn!(error = %err, "failed to decode current weather payload");
            Err(CurrentWeatherError::FailedToDecode(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::TransportError;

    #[derive(Debug)]
    struct StaticTransport(&'static str);

    #[async_trait]
    impl Transport for StaticTransport {
        async fn fetch(&self, _url: &Url) -> Result<Vec<u8>, TransportError> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    #[derive(Debug)]
    struct PanickingTransport;

    #[async_trait]
    impl Transport for PanickingTransport {
        async fn fetch(&self, _url: &Url) -> Result<Vec<u8>, TransportError> {
            panic!("transport must not be reached");
        }
    }

    fn coordinate() -> Coordinate {
        Coordinate::new(35.0, 139.0).unwrap()
    }

    #[test]
    fn construction_captures_init_errors() {
        assert!(matches!(
            WeatherProvider::new(None, None),
            WeatherProvider::Unavailable(InitError::EmptyAuthKey)
        ));
        assert!(matches!(
            WeatherProvider::new(Some(""), None),
            WeatherProvider::Unavailable(InitError::EmptyAuthKey)
        ));
        assert!(matches!(
            WeatherProvider::new(Some("KEY"), Some("nope")),
            WeatherProvider::Unavailable(InitError::InvalidBaseAddress)
        ));
        assert!(WeatherProvider::new(Some("NonEmptyKey"), None).is_ready());
    }

    #[test]
    fn from_config_uses_key_and_address() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_address: Some("http://ok.com".into()),
        };
        match WeatherProvider::from_config(&cfg) {
            WeatherProvider::Ready(handle) => assert_eq!(handle.base_address(), "http://ok.com"),
            other => panic!("expected ready provider, got {other:?}"),
        }

        assert!(!WeatherProvider::from_config(&Config::default()).is_ready());
    }

    #[tokio::test]
    async fn unavailable_provider_never_touches_transport() {
        let provider = WeatherProvider::new(None, None);
        let err = provider
            .request_current_weather(Arc::new(PanickingTransport), coordinate())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CurrentWeatherError::ProviderUnavailable(InitError::EmptyAuthKey)
        ));
    }

    #[tokio::test]
    async fn endpoint_failure_skips_network() {
        let provider = WeatherProvider::new(Some("KEY"), Some("http://ok.com/?preset=1"));
        let err = provider
            .request_current_weather(Arc::new(PanickingTransport), coordinate())
            .await
            .unwrap_err();

        assert!(matches!(err, CurrentWeatherError::UnableToConstructEndpoint(_)));
    }

    #[tokio::test]
    async fn request_error_envelope_maps_to_invalid_request() {
        let provider = WeatherProvider::new(Some("KEY"), None);
        let transport = Arc::new(StaticTransport(r#"{"cod":401,"message":"Invalid API key."}"#));

        let err = provider
            .request_current_weather(transport, coordinate())
            .await
            .unwrap_err();

        match err {
            CurrentWeatherError::InvalidRequest(payload) => assert_eq!(payload.code, 401),
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_maps_to_failed_to_decode() {
        let provider = WeatherProvider::new(Some("KEY"), None);
        let err = provider
            .request_current_weather(Arc::new(StaticTransport("{}")), coordinate())
            .await
            .unwrap_err();

        assert!(matches!(err, CurrentWeatherError::FailedToDecode(_)));
    }

    #[tokio::test]
    async fn worker_panic_maps_to_failed_to_fetch() {
        let provider = WeatherProvider::new(Some("KEY"), None);
        let err = provider
            .request_current_weather(Arc::new(PanickingTransport), coordinate())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CurrentWeatherError::FailedToFetchData(TransportError::Worker(_))
        ));
    }

    #[tokio::test]
    async fn success_body_maps_to_snapshot() {
        let provider = WeatherProvider::new(Some("KEY"), None);
        let transport = Arc::new(StaticTransport(
            r#"{"dt":1369824698,"name":"Shuzenji","sys":{"country":"JP"},
                "weather":[{"description":"overcast clouds"}],"main":{"temp":289.5},"cod":200}"#,
        ));

        let snapshot = provider
            .request_current_weather(transport, coordinate())
            .await
            .expect("request should succeed");

        assert_eq!(snapshot.temperature, Some(289));
        assert_eq!(snapshot.country_code.as_deref(), Some("JP"));
    }
}

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{error::TransportError, query::redacted};

/// Byte-fetching collaborator used by the provider for its single network step.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError>;
}

/// HTTP GET transport backed by `reqwest`.
///
/// The body is returned for every HTTP status: the provider reports request
/// errors as JSON envelopes on 4xx responses, and those belong to the decoder.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    /// Transport whose requests fail once `timeout` elapses.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        let res = self.http.get(url.clone()).send().await?;

        let status = res.status();
        let body = res.bytes().await?;

        tracing::debug!(
            url = %redacted(url),
            %status,
            bytes = body.len(),
            "fetched response"
        );

        Ok(body.to_vec())
    }
}

use url::Url;

use crate::error::InitError;

/// Endpoint used when no base address override is configured.
pub const DEFAULT_BASE_ADDRESS: &str = "https://api.openweathermap.org/data/2.5/";

/// Validated, immutable configuration required to issue requests.
///
/// The only way to obtain one is [`ServiceHandle::initialize`], so every live
/// handle carries a non-empty key and an absolute base address.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceHandle {
    auth_key: String,
    base_address: String,
}

impl ServiceHandle {
    /// Validate raw configuration values.
    ///
    /// `base_address` of `None` means [`DEFAULT_BASE_ADDRESS`].
    pub fn initialize(
        auth_key: Option<&str>,
        base_address: Option<&str>,
    ) -> Result<Self, InitError> {
        let auth_key = match auth_key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(InitError::EmptyAuthKey),
        };

        let base_address = base_address.unwrap_or(DEFAULT_BASE_ADDRESS);

        // `Url::parse` only accepts absolute URLs.
        Url::parse(base_address).map_err(|_| InitError::InvalidBaseAddress)?;

        Ok(Self {
            auth_key: auth_key.to_owned(),
            base_address: base_address.to_owned(),
        })
    }

    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }
}

// Keeps the key out of logs and panic messages.
impl std::fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("auth_key", &"<redacted>")
            .field("base_address", &self.base_address)
            .finish()
    }
}

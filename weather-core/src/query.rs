use url::Url;

use crate::{error::QueryError, service::ServiceHandle};

/// Name of the query item carrying the API key. Always appended last.
pub const AUTH_PARAM: &str = "appid";

impl ServiceHandle {
    /// Build `base/path?params...&appid=<key>`.
    ///
    /// `params` are appended in the given order, followed by exactly one
    /// `appid` item. A caller-supplied `appid` is rejected.
    ///
    /// A base address that carries its own query or fragment is rejected
    /// rather than having that query replaced.
    pub fn prepare_query(&self, path: &str, params: &[(&str, String)]) -> Result<Url, QueryError> {
        let joined = format!(
            "{}/{}",
            self.base_address().trim_end_matches('/'),
            path.trim_start_matches('/')
        );

        let mut url = Url::parse(&joined)
            .map_err(|_| QueryError::UnableToConstructComponents(joined.clone()))?;

        if url.cannot_be_a_base() || url.query().is_some() || url.fragment().is_some() {
            return Err(QueryError::UnableToConstructComponents(joined));
        }

        if let Some((name, _)) = params.iter().find(|(name, _)| name.is_empty()) {
            return Err(QueryError::UnableToConstructFinalUrl(format!(
                "query item with empty name {name:?}"
            )));
        }

        if params.iter().any(|(name, _)| *name == AUTH_PARAM) {
            return Err(QueryError::UnableToConstructFinalUrl(format!(
                "query item {AUTH_PARAM:?} is reserved for the API key"
            )));
        }

        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
            pairs.append_pair(AUTH_PARAM, self.auth_key());
        }

        // The serialized form must be a URL in its own right.
        let url = Url::parse(url.as_str())
            .map_err(|e| QueryError::UnableToConstructFinalUrl(e.to_string()))?;

        tracing::debug!(url = %redacted(&url), "prepared query");

        Ok(url)
    }
}

/// Render `url` with the value of the auth item masked.
pub(crate) fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == AUTH_PARAM { "<redacted>".to_string() } else { value.into_owned() };
            (name.into_owned(), value)
        })
        .collect();

    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(base: &str) -> ServiceHandle {
        ServiceHandle::initialize(Some("K"), Some(base)).expect("valid handle")
    }

    fn coordinate_params() -> Vec<(&'static str, String)> {
        vec![("lat", 37.947_f64.to_string()), ("lon", (-122.953_f64).to_string())]
    }

    #[test]
    fn builds_exact_url_with_appid_last() {
        let url = handle("http://ok.com")
            .prepare_query("weather", &coordinate_params())
            .expect("query should build");

        assert_eq!(
            url.as_str(),
            "http://ok.com/weather?lat=37.947&lon=-122.953&appid=K"
        );
    }

    #[test]
    fn preserves_parameter_order() {
        let params = vec![("lon", "1".to_string()), ("lat", "2".to_string())];
        let url = handle("http://ok.com").prepare_query("weather", &params).unwrap();

        let names: Vec<String> = url.query_pairs().map(|(n, _)| n.into_owned()).collect();
        assert_eq!(names, ["lon", "lat", "appid"]);
    }

    #[test]
    fn appid_appears_exactly_once_even_without_params() {
        let url = handle("http://ok.com").prepare_query("weather", &[]).unwrap();
        assert_eq!(url.as_str(), "http://ok.com/weather?appid=K");
    }

    #[test]
    fn caller_supplied_appid_is_rejected() {
        let params = vec![("lat", "1".to_string()), ("appid", "EVIL".to_string())];
        let err = handle("http://ok.com").prepare_query("weather", &params).unwrap_err();
        assert!(matches!(err, QueryError::UnableToConstructFinalUrl(_)));
    }

    #[test]
    fn trailing_slash_in_base_is_not_doubled() {
        let url = handle("https://api.openweathermap.org/data/2.5/")
            .prepare_query("weather", &[])
            .unwrap();
        assert_eq!(url.path(), "/data/2.5/weather");
    }

    #[test]
    fn values_are_escaped() {
        let params = vec![("q", "San José & co".to_string())];
        let url = handle("http://ok.com").prepare_query("weather", &params).unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("q".to_string(), "San José & co".to_string()));
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn base_with_query_cannot_form_components() {
        let err = handle("http://ok.com/?x=1").prepare_query("weather", &[]).unwrap_err();
        assert!(matches!(err, QueryError::UnableToConstructComponents(_)));
    }

    #[test]
    fn opaque_base_cannot_form_components() {
        let err = handle("mailto:someone").prepare_query("weather", &[]).unwrap_err();
        assert!(matches!(err, QueryError::UnableToConstructComponents(_)));
    }

    #[test]
    fn empty_param_name_cannot_form_final_url() {
        let params = vec![("", "1".to_string())];
        let err = handle("http://ok.com").prepare_query("weather", &params).unwrap_err();
        assert!(matches!(err, QueryError::UnableToConstructFinalUrl(_)));
    }

    #[test]
    fn redaction_masks_only_the_key() {
        let url = handle("http://ok.com")
            .prepare_query("weather", &coordinate_params())
            .unwrap();
        let shown = redacted(&url);

        assert!(shown.contains("lat=37.947"));
        assert!(!shown.contains("appid=K"));
        assert!(shown.contains("appid=%3Credacted%3E"));
    }
}

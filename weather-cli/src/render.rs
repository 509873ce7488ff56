use chrono::Local;
use weather_core::{CurrentWeatherError, LocationInfo, WeatherSnapshot};

const KELVIN_OFFSET: i64 = 273;

pub fn location_info(info: &LocationInfo) -> String {
    match info {
        LocationInfo::Unknown => "No location selected.".to_string(),
        LocationInfo::Loading(c) => {
            format!("Loading weather for {:.3}, {:.3}...", c.latitude(), c.longitude())
        }
        LocationInfo::Ready(snapshot) => snapshot_text(snapshot),
        LocationInfo::FailedToLoad(err) => format!("{} {}", error_label(err), err.user_message()),
    }
}

fn snapshot_text(snapshot: &WeatherSnapshot) -> String {
    let place = match (&snapshot.name, &snapshot.country_code) {
        (Some(name), Some(country)) if !name.is_empty() => format!("{name}, {country}"),
        (Some(name), _) if !name.is_empty() => name.clone(),
        (_, Some(country)) => country.clone(),
        _ => "Unnamed location".to_string(),
    };

    let temperature = snapshot
        .temperature
        .map(|k| format!("{k} K ({} °C)", k.saturating_sub(KELVIN_OFFSET)))
        .unwrap_or_else(|| "temperature unavailable".to_string());

    let summary = snapshot.summary.as_deref().unwrap_or("no description");
    let observed = snapshot.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M %Z");

    format!("{place}: {temperature}, {summary} (observed {observed})")
}

fn error_label(err: &CurrentWeatherError) -> &'static str {
    match err {
        CurrentWeatherError::ProviderUnavailable(_) => "[not configured]",
        CurrentWeatherError::UnableToConstructEndpoint(_) => "[bad request]",
        CurrentWeatherError::FailedToFetchData(_) => "[network]",
        CurrentWeatherError::FailedToDecode(_) => "[bad response]",
        CurrentWeatherError::InvalidRequest(_) => "[refused]",
    }
}

/// What the user can do about a failure, if anything.
pub fn hint(err: &CurrentWeatherError) -> Option<&'static str> {
    match err {
        CurrentWeatherError::ProviderUnavailable(_) => {
            Some("Hint: run `weather configure` or set WEATHER_API_KEY.")
        }
        _ if err.is_retryable() => Some("Hint: this may be temporary, try again."),
        _ => None,
    }
}

use crate::{
    error::CurrentWeatherError,
    model::{Coordinate, WeatherSnapshot},
};

/// What the UI currently knows about the selected location.
#[derive(Debug, Default)]
pub enum LocationInfo {
    #[default]
    Unknown,
    Loading(Coordinate),
    Ready(WeatherSnapshot),
    FailedToLoad(CurrentWeatherError),
}

impl LocationInfo {
    /// A fetch was requested. Preempts whatever state is live.
    pub fn start_loading(self, coordinate: Coordinate) -> Self {
        Self::Loading(coordinate)
    }

    /// The provider completed. Only `Loading` reacts; other states are kept.
    pub fn complete(self, outcome: Result<WeatherSnapshot, CurrentWeatherError>) -> Self {
        match (self, outcome) {
            (Self::Loading(_), Ok(snapshot)) => Self::Ready(snapshot),
            (Self::Loading(_), Err(err)) => Self::FailedToLoad(err),
            (state, _) => {
                tracing::debug!(state = state.label(), "completion ignored outside of loading");
                state
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Loading(_) => "loading",
            Self::Ready(_) => "ready",
            Self::FailedToLoad(_) => "failed_to_load",
        }
    }
}

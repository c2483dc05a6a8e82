//! Lookup orchestration
//!
//! Chains place resolution (by name or device position), weather retrieval
//! and rendering, and drives the screen through `Loading` to either `Content`
//! or `Error`. Calls are strictly sequential: weather is never requested
//! before the place is known.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::LookupError;
use crate::location::LocationProvider;
use crate::models::{Coordinates, Place, WeatherSnapshot};
use crate::presenter::{WeatherView, render};
use crate::screen::{Screen, Ticket};
use crate::weather::{ForecastProvider, Geocoder};

/// How a user-triggered lookup ended
#[derive(Debug)]
pub enum Outcome {
    /// Blank input; nothing was requested and the screen is untouched
    Skipped,
    /// The weather view is on screen
    Shown,
    /// The error banner is on screen
    Failed(LookupError),
    /// A newer lookup started meanwhile; this result was dropped
    Superseded,
}

impl Outcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// Called with the screen every time a lookup moves it to a new state
pub type ScreenObserver = Arc<dyn Fn(&Screen) + Send + Sync>;

/// Service driving both lookup entry points
pub struct Lookup<G, F, L> {
    geocoder: G,
    forecaster: F,
    locator: L,
    screen: Arc<Mutex<Screen>>,
    observer: Option<ScreenObserver>,
}

impl<G, F, L> Lookup<G, F, L>
where
    G: Geocoder,
    F: ForecastProvider,
    L: LocationProvider,
{
    pub fn new(geocoder: G, forecaster: F, locator: L) -> Self {
        Self::with_screen(geocoder, forecaster, locator, Arc::new(Mutex::new(Screen::new())))
    }

    pub fn with_screen(geocoder: G, forecaster: F, locator: L, screen: Arc<Mutex<Screen>>) -> Self {
        Self {
            geocoder,
            forecaster,
            locator,
            screen,
            observer: None,
        }
    }

    /// Notify `observer` on every state change, including `Loading`, while
    /// the screen lock is held
    #[must_use]
    pub fn on_change<O>(mut self, observer: O) -> Self
    where
        O: Fn(&Screen) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Shared handle to the screen this service drives
    #[must_use]
    pub fn screen(&self) -> Arc<Mutex<Screen>> {
        Arc::clone(&self.screen)
    }

    /// Look up the weather for a typed place name
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> Outcome {
        let query = text.trim();
        if query.is_empty() {
            debug!("Ignoring blank search");
            return Outcome::Skipped;
        }

        let ticket = self.begin().await;
        let result = match self.resolve_by_name(query).await {
            Ok(place) => self.weather_view(&place).await,
            Err(e) => Err(e),
        };
        self.finish(ticket, result).await
    }

    /// Look up the weather at the device position
    #[instrument(skip(self))]
    pub async fn locate(&self) -> Outcome {
        let ticket = self.begin().await;
        let result = match self.resolve_by_device().await {
            Ok(place) => self.weather_view(&place).await,
            Err(e) => Err(e),
        };
        self.finish(ticket, result).await
    }

    /// Resolve a place name through the geocoder; the first match wins
    pub async fn resolve_by_name(&self, text: &str) -> Result<Place, LookupError> {
        let query = text.trim();
        if query.is_empty() {
            return Err(LookupError::NotFound {
                query: query.to_string(),
            });
        }

        debug!("Geocoding location name: {}", query);
        let place = self
            .geocoder
            .search(query)
            .await?
            .ok_or_else(|| LookupError::NotFound {
                query: query.to_string(),
            })?;

        debug!(
            "Found location: {} ({})",
            place.label(),
            place.coordinates.format()
        );
        Ok(place)
    }

    /// Resolve the device position into the "Your Location" place
    pub async fn resolve_by_device(&self) -> Result<Place, LookupError> {
        let coordinates = self.locator.current_position().await?;
        Ok(Place::device(coordinates))
    }

    pub async fn fetch_weather(&self, coordinates: Coordinates) -> Result<WeatherSnapshot, LookupError> {
        self.forecaster.forecast(coordinates).await
    }

    async fn weather_view(&self, place: &Place) -> Result<WeatherView, LookupError> {
        let snapshot = self.fetch_weather(place.coordinates).await?;
        let today = chrono::Local::now().date_naive();
        Ok(render(&snapshot, place, today))
    }

    async fn begin(&self) -> Ticket {
        let mut screen = self.screen.lock().await;
        let ticket = screen.begin();
        self.notify(&screen);
        ticket
    }

    fn notify(&self, screen: &Screen) {
        if let Some(observer) = &self.observer {
            observer(screen);
        }
    }

    async fn finish(&self, ticket: Ticket, result: Result<WeatherView, LookupError>) -> Outcome {
        let mut screen = self.screen.lock().await;
        match result {
            Ok(view) => {
                info!("Showing weather for {}", view.label);
                if screen.show(ticket, view) {
                    self.notify(&screen);
                    Outcome::Shown
                } else {
                    Outcome::Superseded
                }
            }
            Err(e) => {
                warn!("Lookup failed: {}", e);
                if screen.fail(ticket, e.user_message()) {
                    self.notify(&screen);
                    Outcome::Failed(e)
                } else {
                    Outcome::Superseded
                }
            }
        }
    }
}

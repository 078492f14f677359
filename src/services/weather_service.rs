use std::sync::Arc;

use super::{Cache, NotificationSink};
use crate::clients::WeatherClient;
use crate::domain::{weather_cache_key, Coordinates, WeatherSeries, EVENT_CACHE_HIT};
use crate::errors::FetchError;

pub struct WeatherService {
    cache: Cache,
    client: WeatherClient,
    notifier: Arc<dyn NotificationSink>,
}

impl WeatherService {
    pub fn new(cache: Cache, client: WeatherClient, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            cache,
            client,
            notifier,
        }
    }

    /// Daily forecast series for a location, from cache when fresh
    pub async fn fetch(&self, coordinates: Coordinates) -> Result<WeatherSeries, FetchError> {
        let key = weather_cache_key(coordinates);

        let fetched = self
            .cache
            .get_or_fetch(&key, move || async move {
                let series = self.client.fetch(coordinates).await?;
                // A forecast of nulls only is not worth caching
                if !series.has_readings() {
                    return Err(FetchError::not_found(format!(
                        "no weather readings for lat={} lon={}",
                        coordinates.latitude, coordinates.longitude
                    )));
                }
                Ok(series)
            })
            .await?;

        if fetched.from_cache {
            self.notifier.trigger(
                EVENT_CACHE_HIT,
                &format!(
                    "LAT:{:.6}, LONG:{:.6}",
                    coordinates.latitude, coordinates.longitude
                ),
            );
        }

        Ok(fetched.value)
    }
}

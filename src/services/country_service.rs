use std::sync::Arc;

use super::{Cache, NotificationSink};
use crate::clients::CountryClient;
use crate::domain::{CountryInfo, CountryQuery, EVENT_CACHE_HIT};
use crate::errors::FetchError;

pub struct CountryService {
    cache: Cache,
    client: CountryClient,
    notifier: Arc<dyn NotificationSink>,
}

impl CountryService {
    pub fn new(cache: Cache, client: CountryClient, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            cache,
            client,
            notifier,
        }
    }

    /// Country facts for the query, from cache when fresh
    pub async fn fetch(&self, query: &CountryQuery) -> Result<CountryInfo, FetchError> {
        let key = query.cache_key();

        let fetched = self
            .cache
            .get_or_fetch(&key, move || async move {
                let mut records = self.client.fetch(query).await?;
                if records.is_empty() {
                    return Err(FetchError::not_found(format!(
                        "no country matches '{}'",
                        query.identifier()
                    )));
                }
                Ok(records.swap_remove(0))
            })
            .await?;

        if fetched.from_cache {
            self.notifier.trigger(EVENT_CACHE_HIT, query.identifier());
        }

        Ok(fetched.value)
    }
}

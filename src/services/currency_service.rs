use super::Cache;
use crate::clients::CurrencyClient;
use crate::domain::{currency_cache_key, normalize_codes, GroupedCurrencyResult};
use crate::errors::FetchError;

pub struct CurrencyService {
    cache: Cache,
    client: CurrencyClient,
}

impl CurrencyService {
    pub fn new(cache: Cache, client: CurrencyClient) -> Self {
        Self { cache, client }
    }

    /// Rates from `base` to every code in `targets`.
    ///
    /// All or nothing: a single absent target fails the whole lookup.
    pub async fn fetch(
        &self,
        base: &str,
        targets: &[String],
    ) -> Result<GroupedCurrencyResult, FetchError> {
        let base = base.trim().to_uppercase();
        let targets = normalize_codes(targets);
        let key = currency_cache_key(&base, &targets);

        let fetched = self
            .cache
            .get_or_fetch(&key, move || async move {
                let table = self.client.fetch_rates(&base).await?;
                let mut group = table.project(&targets).map_err(|code| {
                    FetchError::not_found(format!(
                        "currency code {} not found in rates for {}",
                        code, base
                    ))
                })?;
                if group.base_code.is_empty() {
                    group.base_code = base;
                }
                Ok(group)
            })
            .await?;

        Ok(fetched.value)
    }
}

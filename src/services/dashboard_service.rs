use chrono::Utc;
use futures::future::try_join_all;
use tracing::info;

use super::{CountryService, CurrencyService, WeatherService};
use crate::domain::{
    CountryInfo, CountryQuery, CurrencyGroups, DashboardFeatures, FeatureFlags,
    GroupedCurrencyResult, PopulatedDashboard, Registration, WeatherSeries,
};
use crate::errors::FetchError;

/// Builds dashboards out of the three upstream fetchers.
pub struct DashboardService {
    countries: CountryService,
    weather: WeatherService,
    currencies: CurrencyService,
}

impl DashboardService {
    pub fn new(
        countries: CountryService,
        weather: WeatherService,
        currencies: CurrencyService,
    ) -> Self {
        Self {
            countries,
            weather,
            currencies,
        }
    }

    /// Populate a dashboard for a registration.
    ///
    /// Any fetcher error aborts the whole dashboard, partial results are dropped.
    pub async fn render(&self, registration: &Registration) -> Result<PopulatedDashboard, FetchError> {
        info!("Rendering dashboard {}", registration.id);

        let query = CountryQuery::new(&registration.iso_code, &registration.country)
            .ok_or_else(|| {
                FetchError::not_found(format!(
                    "registration {} has neither isoCode nor country",
                    registration.id
                ))
            })?;

        // Source of coordinates and base currencies for everything else
        let country = self.countries.fetch(&query).await?;
        let flags = &registration.features;

        let (weather, target_currencies) = tokio::try_join!(
            self.weather_for(&country, flags),
            self.currencies_for(&country, flags),
        )?;

        let coordinates = if flags.coordinates {
            Some(country.coordinates().ok_or_else(|| {
                FetchError::not_found(format!("no coordinates for {}", query.identifier()))
            })?)
        } else {
            None
        };

        let features = DashboardFeatures {
            capital: flags.capital.then(|| country.capital.clone()),
            coordinates,
            population: flags.population.then_some(country.population),
            area: flags.area.then_some(country.area),
            temperature: enabled_mean(
                flags.temperature,
                weather.as_ref(),
                WeatherSeries::mean_temperature,
                "temperature",
                &country,
            )?,
            precipitation: enabled_mean(
                flags.precipitation,
                weather.as_ref(),
                WeatherSeries::mean_precipitation,
                "precipitation",
                &country,
            )?,
            target_currencies,
        };

        Ok(PopulatedDashboard {
            id: registration.id.clone(),
            country: if registration.country.is_empty() {
                country.name.common.clone()
            } else {
                registration.country.clone()
            },
            iso_code: if registration.iso_code.is_empty() {
                country.cca2.clone()
            } else {
                registration.iso_code.clone()
            },
            features,
            last_retrieval: Utc::now(),
        })
    }

    async fn weather_for(
        &self,
        country: &CountryInfo,
        flags: &FeatureFlags,
    ) -> Result<Option<WeatherSeries>, FetchError> {
        if !flags.needs_weather() {
            return Ok(None);
        }

        let coordinates = country.coordinates().ok_or_else(|| {
            FetchError::not_found(format!("no coordinates for {}", country.name.common))
        })?;

        self.weather.fetch(coordinates).await.map(Some)
    }

    /// One lookup per base currency of the country, merged by base code.
    async fn currencies_for(
        &self,
        country: &CountryInfo,
        flags: &FeatureFlags,
    ) -> Result<Option<Vec<GroupedCurrencyResult>>, FetchError> {
        if !flags.needs_currencies() {
            return Ok(None);
        }

        let bases = country.currency_codes();
        if bases.is_empty() {
            return Err(FetchError::not_found(format!(
                "{} has no currencies",
                country.name.common
            )));
        }

        let results = try_join_all(
            bases
                .iter()
                .map(|base| self.currencies.fetch(base, &flags.target_currencies)),
        )
        .await?;

        let mut groups = CurrencyGroups::new();
        for result in results {
            groups.merge(result);
        }

        Ok(Some(groups.into_vec()))
    }
}

/// Mean of one weather series when its feature is enabled.
///
/// An enabled feature whose series carries no readings fails the dashboard.
fn enabled_mean(
    enabled: bool,
    weather: Option<&WeatherSeries>,
    mean: fn(&WeatherSeries) -> Option<f64>,
    series: &str,
    country: &CountryInfo,
) -> Result<Option<f64>, FetchError> {
    if !enabled {
        return Ok(None);
    }

    weather
        .and_then(mean)
        .map(Some)
        .ok_or_else(|| {
            FetchError::not_found(format!(
                "no {} readings for {}",
                series, country.name.common
            ))
        })
}

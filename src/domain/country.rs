use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryName {
    #[serde(default)]
    pub common: String,
    #[serde(default)]
    pub official: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

/// One country record as served by the country-facts provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    #[serde(default)]
    pub name: CountryName,
    #[serde(default)]
    pub cca2: String,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub latlng: Vec<f64>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub area: f64,
    /// Keyed by ISO 4217 code.
    #[serde(default)]
    pub currencies: BTreeMap<String, CurrencyInfo>,
}

impl CountryInfo {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self.latlng.as_slice() {
            [latitude, longitude, ..] => Some(Coordinates {
                latitude: *latitude,
                longitude: *longitude,
            }),
            _ => None,
        }
    }

    pub fn currency_codes(&self) -> Vec<String> {
        self.currencies.keys().cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// How a country is looked up upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryQuery {
    Code(String),
    Name(String),
}

impl CountryQuery {
    /// Prefers the ISO code, falls back to the name.
    pub fn new(iso_code: &str, name: &str) -> Option<Self> {
        let iso_code = iso_code.trim();
        let name = name.trim();
        if !iso_code.is_empty() {
            Some(Self::Code(iso_code.to_uppercase()))
        } else if !name.is_empty() {
            Some(Self::Name(name.to_string()))
        } else {
            None
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            Self::Code(code) => format!("country:alpha:{}", code.to_uppercase()),
            Self::Name(name) => format!("country:name:{}", name.to_lowercase()),
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            Self::Code(value) | Self::Name(value) => value,
        }
    }
}

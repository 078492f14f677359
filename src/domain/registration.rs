use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    pub temperature: bool,
    pub precipitation: bool,
    pub capital: bool,
    pub coordinates: bool,
    pub population: bool,
    pub area: bool,
    pub target_currencies: Vec<String>,
}

impl FeatureFlags {
    pub fn needs_weather(&self) -> bool {
        self.temperature || self.precipitation
    }

    pub fn needs_currencies(&self) -> bool {
        !self.target_currencies.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub iso_code: String,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default = "Utc::now")]
    pub last_change: DateTime<Utc>,
}

impl Registration {
    /// Identifier used when emitting events about this registration.
    pub fn country_identifier(&self) -> &str {
        if self.iso_code.trim().is_empty() {
            self.country.trim()
        } else {
            self.iso_code.trim()
        }
    }
}

/// Body accepted when creating or replacing a registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub iso_code: String,
    #[serde(default)]
    pub features: FeatureFlags,
}

impl RegistrationInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.country.trim().is_empty() && self.iso_code.trim().is_empty() {
            return Err("either country or isoCode must be provided".to_string());
        }
        Ok(())
    }

    pub fn into_registration(self, id: String) -> Registration {
        Registration {
            id,
            country: self.country.trim().to_string(),
            iso_code: self.iso_code.trim().to_uppercase(),
            features: self.features,
            last_change: Utc::now(),
        }
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Exchange-rate table as served by the currency provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateTable {
    #[serde(default)]
    pub base_code: String,
    #[serde(default)]
    pub time_last_update_utc: String,
    #[serde(default)]
    pub time_next_update_utc: String,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    /// Picks the requested codes out of the table. Fails on the first absent code.
    pub fn project(&self, targets: &[String]) -> Result<GroupedCurrencyResult, String> {
        let rates = targets
            .iter()
            .map(|code| {
                self.rates
                    .get(code)
                    .map(|rate| CurrencyRate {
                        code: code.clone(),
                        rate: *rate,
                    })
                    .ok_or_else(|| code.clone())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GroupedCurrencyResult {
            base_code: self.base_code.clone(),
            time_last_update: self.time_last_update_utc.clone(),
            time_next_update: self.time_next_update_utc.clone(),
            rates,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub code: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedCurrencyResult {
    pub base_code: String,
    pub time_last_update: String,
    pub time_next_update: String,
    pub rates: Vec<CurrencyRate>,
}

/// Uppercased, deduplicated and sorted target codes.
pub fn normalize_codes(codes: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = codes
        .iter()
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// Expects targets already passed through [`normalize_codes`].
pub fn currency_cache_key(base: &str, targets: &[String]) -> String {
    format!("currency:{}:{}", base.trim().to_uppercase(), targets.join(","))
}

/// Rate groups collected during one aggregation, one per base code.
#[derive(Debug, Default)]
pub struct CurrencyGroups {
    groups: IndexMap<String, GroupedCurrencyResult>,
}

impl CurrencyGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, result: GroupedCurrencyResult) {
        match self.groups.get_mut(&result.base_code) {
            Some(group) => {
                for rate in result.rates {
                    if !group.rates.iter().any(|r| r.code == rate.code) {
                        group.rates.push(rate);
                    }
                }
            }
            None => {
                self.groups.insert(result.base_code.clone(), result);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_vec(self) -> Vec<GroupedCurrencyResult> {
        self.groups.into_values().collect()
    }
}

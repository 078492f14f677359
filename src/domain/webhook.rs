use serde::{Deserialize, Serialize};

pub const EVENT_REGISTER: &str = "REGISTER";
pub const EVENT_CHANGE: &str = "CHANGE";
pub const EVENT_DELETE: &str = "DELETE";
pub const EVENT_INVOKE: &str = "INVOKE";
pub const EVENT_CACHE_HIT: &str = "CACHE_HIT";

pub const KNOWN_EVENTS: [&str; 5] = [
    EVENT_REGISTER,
    EVENT_CHANGE,
    EVENT_DELETE,
    EVENT_INVOKE,
    EVENT_CACHE_HIT,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookSubscription {
    #[serde(default)]
    pub id: String,
    pub url: String,
    /// Empty matches every country.
    #[serde(default)]
    pub country: String,
    pub event: String,
}

impl WebhookSubscription {
    pub fn matches(&self, event: &str, country: &str) -> bool {
        let own_country = canonical(&self.country);
        canonical(&self.event) == canonical(event)
            && (own_country.is_empty() || own_country == canonical(country))
    }
}

/// Payload POSTed to a subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookInvocation {
    pub id: String,
    pub country: String,
    pub event: String,
    pub time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionInput {
    pub url: String,
    #[serde(default)]
    pub country: String,
    pub event: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionPatch {
    pub url: Option<String>,
    pub country: Option<String>,
    pub event: Option<String>,
}

pub fn canonical(value: &str) -> String {
    value.trim().to_uppercase()
}

pub fn validate_url(url: &str) -> Result<(), String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(format!("webhook url '{}' must be http or https", url))
    }
}

pub fn validate_event(event: &str) -> Result<(), String> {
    let event = canonical(event);
    if KNOWN_EVENTS.contains(&event.as_str()) {
        Ok(())
    } else {
        Err(format!(
            "unknown event '{}', expected one of {}",
            event,
            KNOWN_EVENTS.join(", ")
        ))
    }
}

impl SubscriptionInput {
    pub fn validate(&self) -> Result<(), String> {
        validate_url(&self.url)?;
        validate_event(&self.event)
    }

    pub fn into_subscription(self, id: String) -> WebhookSubscription {
        WebhookSubscription {
            id,
            url: self.url.trim().to_string(),
            country: self.country.trim().to_string(),
            event: canonical(&self.event),
        }
    }
}

impl SubscriptionPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.url {
            validate_url(url)?;
        }
        if let Some(event) = &self.event {
            validate_event(event)?;
        }
        Ok(())
    }

    pub fn apply(self, subscription: &mut WebhookSubscription) {
        if let Some(url) = self.url {
            subscription.url = url.trim().to_string();
        }
        if let Some(country) = self.country {
            subscription.country = country.trim().to_string();
        }
        if let Some(event) = self.event {
            subscription.event = canonical(&event);
        }
    }
}

use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::{canonical, WebhookInvocation};
use crate::errors::StoreError;
use crate::repo::SubscriptionStore;

/// Capability to announce that something happened for a country.
///
/// Implementations must return immediately; delivery happens in the background.
pub trait NotificationSink: Send + Sync {
    fn trigger(&self, event: &str, country: &str);
}

/// Delivers events to every matching webhook subscription.
///
/// Delivery is best effort: each POST runs in its own detached task, is never
/// retried, and may be lost if the process exits first.
#[derive(Clone)]
pub struct WebhookDispatcher {
    subscriptions: Arc<dyn SubscriptionStore>,
    client: Client,
}

impl WebhookDispatcher {
    pub fn new(subscriptions: Arc<dyn SubscriptionStore>, client: Client) -> Self {
        Self {
            subscriptions,
            client,
        }
    }

    /// Spawns one delivery per matching subscription and returns their handles.
    pub async fn dispatch(
        &self,
        event: &str,
        country: &str,
    ) -> Result<Vec<JoinHandle<()>>, StoreError> {
        let event = canonical(event);
        let country = country.trim().to_string();

        let hooks = self.subscriptions.list().await?;
        debug!(
            "Matching event {} for country {} against {} webhook(s)",
            event,
            country,
            hooks.len()
        );

        let handles = hooks
            .into_iter()
            .filter(|hook| hook.matches(&event, &country))
            .map(|hook| {
                // Carries the subscription's own country, empty for wildcards
                let invocation = WebhookInvocation {
                    id: hook.id,
                    country: hook.country,
                    event: event.clone(),
                    time: Utc::now().to_rfc3339(),
                };
                tokio::spawn(deliver(self.client.clone(), hook.url, invocation))
            })
            .collect();

        Ok(handles)
    }
}

impl NotificationSink for WebhookDispatcher {
    fn trigger(&self, event: &str, country: &str) {
        let dispatcher = self.clone();
        let event = event.to_string();
        let country = country.to_string();

        // Handles are dropped on purpose, deliveries are never joined
        tokio::spawn(async move {
            match dispatcher.dispatch(&event, &country).await {
                Ok(handles) => {
                    debug!("Triggered {} webhook(s) for event {}", handles.len(), event)
                }
                Err(e) => error!("Error retrieving webhooks for event {}: {}", event, e),
            }
        });
    }
}

async fn deliver(client: Client, url: String, invocation: WebhookInvocation) {
    match client.post(&url).json(&invocation).send().await {
        Ok(response) if response.status().is_success() => {
            info!(
                "Webhook {} triggered at: {}, status code: {}",
                invocation.id,
                url,
                response.status().as_u16()
            );
        }
        Ok(response) => {
            warn!(
                "Webhook {} at {} answered with status code: {}",
                invocation.id,
                url,
                response.status().as_u16()
            );
        }
        Err(e) => {
            error!("Error triggering webhook {} at {}: {}", invocation.id, url, e);
        }
    }
}

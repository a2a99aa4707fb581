mod client;
mod incoming;
mod model;
mod outgoing;

pub use incoming::{HaAttributeReader, HaChangeListener};
pub use outgoing::HaStatePublisher;

use client::HaHttpClient;
use infrastructure::Mqtt;
use serde::Deserialize;

const DEFAULT_REMOTE_ENTITY_SUFFIX: &str = "_slave";

#[derive(Debug, Deserialize, Clone)]
pub struct HomeAssistant {
    pub url: String,
    pub token: String,
    pub topic_event: String,
}

/// Another Home Assistant instance receiving the derived sensors instead of the one the raw sensors live in.
#[derive(Debug, Deserialize, Clone)]
pub struct PublishTarget {
    pub url: String,
    pub token: String,
    #[serde(default = "default_entity_suffix")]
    pub entity_suffix: String,
}

fn default_entity_suffix() -> String {
    DEFAULT_REMOTE_ENTITY_SUFFIX.to_string()
}

impl HomeAssistant {
    pub async fn new_change_listener(&self, mqtt: &mut Mqtt) -> anyhow::Result<HaChangeListener> {
        let subscription = mqtt.subscribe(self.topic_event.clone()).await?;
        Ok(HaChangeListener::new(subscription))
    }

    pub fn new_attribute_reader(&self) -> anyhow::Result<HaAttributeReader> {
        let client = HaHttpClient::new(&self.url, &self.token)?;
        Ok(HaAttributeReader::new(client))
    }

    pub fn new_state_publisher(&self, target: Option<&PublishTarget>) -> anyhow::Result<HaStatePublisher> {
        match target {
            Some(target) => {
                tracing::info!(
                    "Publishing derived sensors to {} with entity suffix {:?}",
                    target.url,
                    target.entity_suffix
                );
                let client = HaHttpClient::new(&target.url, &target.token)?;
                Ok(HaStatePublisher::new(client, Some(target.entity_suffix.clone())))
            }
            None => {
                let client = HaHttpClient::new(&self.url, &self.token)?;
                Ok(HaStatePublisher::new(client, None))
            }
        }
    }
}

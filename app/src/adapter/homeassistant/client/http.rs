use anyhow::Context;
use infrastructure::HttpClientConfig;
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::json;

use crate::adapter::homeassistant::model::HaState;
use crate::core::{Attributes, BinaryState, EntityId};

#[derive(Debug, Clone)]
pub struct HaHttpClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl HaHttpClient {
    pub fn new(url: &str, token: &str) -> anyhow::Result<Self> {
        let client = HttpClientConfig::with_bearer_token(token)
            .new_tracing_client()
            .context("Error creating Home Assistant HTTP client")?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_owned(),
        })
    }

    fn state_url(&self, entity_id: &EntityId) -> String {
        format!("{}/api/states/{}", self.base_url, entity_id)
    }
}

impl HaHttpClient {
    pub async fn get_state(&self, entity_id: &EntityId) -> anyhow::Result<Option<HaState>> {
        let response = self.client.get(self.state_url(entity_id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        response
            .error_for_status()?
            .json::<HaState>()
            .await
            .map(Some)
            .with_context(|| format!("Error getting state of {}", entity_id))
    }

    #[tracing::instrument(skip(self, attributes))]
    pub async fn set_state(
        &self,
        entity_id: &EntityId,
        state: BinaryState,
        attributes: &Attributes,
    ) -> anyhow::Result<()> {
        let url = self.state_url(entity_id);

        tracing::debug!("Setting HA state {} to {}", url, state);

        let response = self
            .client
            .post(url)
            .json(&set_state_payload(state, attributes))
            .send()
            .await?;

        tracing::debug!("Response: {}", response.status());
        response.error_for_status()?;

        Ok(())
    }
}

fn set_state_payload(state: BinaryState, attributes: &Attributes) -> serde_json::Value {
    json!({
        "state": state,
        "attributes": attributes,
    })
}

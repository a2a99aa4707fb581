use super::HaHttpClient;
use crate::core::port::StatePublisher;
use crate::core::{Attributes, BinaryState, EntityId};

pub struct HaStatePublisher {
    client: HaHttpClient,
    entity_suffix: Option<String>,
}

impl HaStatePublisher {
    pub fn new(client: HaHttpClient, entity_suffix: Option<String>) -> Self {
        Self { client, entity_suffix }
    }

    fn target_id(&self, id: &EntityId) -> EntityId {
        match &self.entity_suffix {
            Some(suffix) => id.with_suffix(suffix),
            None => id.clone(),
        }
    }
}

impl StatePublisher for HaStatePublisher {
    async fn publish_state(&self, id: &EntityId, state: BinaryState, attributes: &Attributes) -> anyhow::Result<()> {
        self.client.set_state(&self.target_id(id), state, attributes).await
    }
}

use infrastructure::MqttSubscription;

use super::HaHttpClient;
use super::model::HaEvent;
use crate::core::EntityId;
use crate::core::port::{AttributeReader, SensorSnapshot, StateChange, StateChangeSource};

pub struct HaAttributeReader {
    client: HaHttpClient,
}

impl HaAttributeReader {
    pub fn new(client: HaHttpClient) -> Self {
        Self { client }
    }
}

impl AttributeReader for HaAttributeReader {
    async fn read_sensor(&self, id: &EntityId) -> anyhow::Result<Option<SensorSnapshot>> {
        let state = self.client.get_state(id).await?;
        Ok(state.map(SensorSnapshot::from))
    }
}

/// State changes from Home Assistant's MQTT event stream.
pub struct HaChangeListener {
    subscription: MqttSubscription,
}

impl HaChangeListener {
    pub fn new(subscription: MqttSubscription) -> Self {
        Self { subscription }
    }
}

impl StateChangeSource for HaChangeListener {
    async fn next_change(&mut self) -> Option<StateChange> {
        loop {
            let msg = self.subscription.recv().await?;

            if let Some(change) = to_state_change(&msg.payload) {
                return Some(change);
            }
        }
    }
}

fn to_state_change(payload: &str) -> Option<StateChange> {
    match serde_json::from_str::<HaEvent>(payload) {
        Ok(HaEvent::Unknown(_)) => {
            tracing::trace!("Received unsupported event: {:?}", payload);
            None
        }
        Ok(event) => event.into_state_change(),
        Err(e) => {
            tracing::error!("Error parsing HA event: {}", e);
            None
        }
    }
}

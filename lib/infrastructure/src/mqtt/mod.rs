mod client;
mod receiver;

pub use client::Mqtt;
pub use receiver::{MqttInMessage, MqttSubscription};

use serde::Deserialize;

/// Broker connection of the `[mqtt]` config section.
#[derive(Debug, Deserialize, Clone)]
pub struct MqttConfig {
    host: String,
    port: u16,
    client_id: String,
}

impl MqttConfig {
    /// Client is not connected before [`Mqtt::process`] polls its event loop.
    pub fn new_client(&self) -> Mqtt {
        Mqtt::connect(&self.host, self.port, &self.client_id)
    }
}

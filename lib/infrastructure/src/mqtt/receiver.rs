use std::str::Utf8Error;

use tokio::sync::mpsc;

/// Publish received on a subscribed topic, payload decoded as UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttInMessage {
    pub topic: String,
    pub payload: String,
}

/// Receiving end of [`super::Mqtt::subscribe`].
pub struct MqttSubscription {
    rx: mpsc::Receiver<MqttInMessage>,
}

impl MqttSubscription {
    pub(super) fn new(rx: mpsc::Receiver<MqttInMessage>) -> Self {
        Self { rx }
    }

    /// Next message of the subscribed topic, `None` once the MQTT client is gone.
    pub async fn recv(&mut self) -> Option<MqttInMessage> {
        self.rx.recv().await
    }
}

impl TryInto<MqttInMessage> for &rumqttc::v5::mqttbytes::v5::Publish {
    type Error = Utf8Error;

    fn try_into(self) -> Result<MqttInMessage, Self::Error> {
        Ok(MqttInMessage {
            topic: std::str::from_utf8(&self.topic)?.to_string(),
            payload: std::str::from_utf8(&self.payload)?.to_string(),
        })
    }
}

//feeding a subscription without a broker
impl From<mpsc::Receiver<MqttInMessage>> for MqttSubscription {
    fn from(rx: mpsc::Receiver<MqttInMessage>) -> Self {
        Self::new(rx)
    }
}

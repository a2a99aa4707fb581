use rumqttc::v5::Event::Incoming;
use rumqttc::v5::mqttbytes::v5::{ConnectProperties, Packet, Publish, SubscribeProperties};
use rumqttc::v5::mqttbytes::QoS;
use rumqttc::v5::{AsyncClient, EventLoop, MqttOptions};
use tokio::sync::mpsc;

use super::{MqttInMessage, MqttSubscription};

/// MQTT v5 client dispatching incoming publishes to subscribers by subscription identifier.
pub struct Mqtt {
    client: AsyncClient,
    event_loop: EventLoop,
    subscriptions: Vec<SubscriptionHandle>,
}

struct SubscriptionHandle {
    topic: String,
    txs: Vec<mpsc::Sender<MqttInMessage>>,
}

impl Mqtt {
    pub fn connect(host: &str, port: u16, client_id: &str) -> Self {
        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(std::time::Duration::from_secs(5));
        options.set_clean_start(false);

        let mut connect_props = ConnectProperties::new();
        connect_props.session_expiry_interval = 60.into();
        connect_props.max_packet_size = Some(1024 * 1024);
        options.set_connect_properties(connect_props);

        let (client, event_loop) = AsyncClient::new(options, 10);

        Mqtt {
            client,
            event_loop,
            subscriptions: vec![],
        }
    }

    /// Every call gets its own receiver. Subscribing twice to the same topic reuses the broker subscription.
    pub async fn subscribe(&mut self, topic: impl Into<String>) -> anyhow::Result<MqttSubscription> {
        let topic = topic.into();
        let (tx, rx) = mpsc::channel::<MqttInMessage>(64);

        if let Some(existing) = self.subscriptions.iter_mut().find(|s| s.topic == topic) {
            tracing::info!("Adding receiver to existing subscription of topic {}", topic);
            existing.txs.push(tx);
            return Ok(MqttSubscription::new(rx));
        }

        tracing::info!("Subscribing to MQTT topic {}", topic);

        self.subscriptions.push(SubscriptionHandle {
            topic: topic.clone(),
            txs: vec![tx],
        });

        self.client
            .subscribe_with_properties(
                topic,
                QoS::AtLeastOnce,
                SubscribeProperties {
                    id: Some(self.subscriptions.len()), //must be > 0
                    user_properties: vec![],
                },
            )
            .await?;

        Ok(MqttSubscription::new(rx))
    }

    /// Drives the connection for the lifetime of the process, reconnecting after errors.
    pub async fn process(mut self) {
        loop {
            match self.event_loop.poll().await {
                Ok(Incoming(Packet::Publish(publish))) => self.forward(publish).await,
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("MQTT error: {}", e);
                    //connection errors are returned immediately on every poll until the broker is back
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }

    async fn forward(&self, publish: Publish) {
        let message: MqttInMessage = match (&publish).try_into() {
            Ok(m) => m,
            Err(e) => {
                tracing::error!("Error parsing MQTT message: {}", e);
                return;
            }
        };

        tracing::trace!("Received MQTT message on topic {}", message.topic);

        let subscription_ids = match publish.properties {
            Some(p) => p.subscription_identifiers,
            None => {
                tracing::error!("No subscription identifiers in MQTT message on {}", message.topic);
                return;
            }
        };

        for id in subscription_ids {
            let Some(subscription) = id.checked_sub(1).and_then(|idx| self.subscriptions.get(idx)) else {
                tracing::error!("No subscription for id: {}", id);
                continue;
            };

            for tx in subscription.txs.iter() {
                if let Err(e) = tx
                    .send_timeout(message.clone(), tokio::time::Duration::from_secs(5))
                    .await
                {
                    tracing::error!("Failed to forward MQTT message to subscriber of {}: {}", subscription.topic, e);
                }
            }
        }
    }
}

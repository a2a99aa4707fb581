#![allow(async_fn_in_trait)]

use super::time::DateTime;
use super::{Attributes, BinaryState, EntityId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSnapshot {
    pub attributes: Attributes,
    pub last_changed: Option<DateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateChange {
    pub entity_id: EntityId,
    pub old_state: Option<String>,
    pub new_state: Option<String>,
}

pub trait AttributeReader {
    /// Current metadata of a sensor, `None` if the host doesn't know the entity (yet).
    async fn read_sensor(&self, id: &EntityId) -> anyhow::Result<Option<SensorSnapshot>>;
}

pub trait StatePublisher {
    async fn publish_state(&self, id: &EntityId, state: BinaryState, attributes: &Attributes) -> anyhow::Result<()>;
}

pub trait StateChangeSource {
    /// Next observed change of any entity. `None` means the source is closed for good.
    async fn next_change(&mut self) -> Option<StateChange>;
}

#[cfg(test)]
pub mod fake {
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    use tokio::sync::mpsc;

    use super::*;

    #[derive(Default)]
    pub struct FakeSensors {
        sensors: HashMap<EntityId, SensorSnapshot>,
        broken: HashSet<EntityId>,
    }

    impl FakeSensors {
        pub fn with_sensor(mut self, id: &str, attributes: serde_json::Value, last_changed: Option<DateTime>) -> Self {
            let attributes = serde_json::from_value(attributes).expect("attributes must be a JSON object");
            self.sensors.insert(
                id.into(),
                SensorSnapshot {
                    attributes,
                    last_changed,
                },
            );
            self
        }

        pub fn with_broken_sensor(mut self, id: &str) -> Self {
            self.broken.insert(id.into());
            self
        }
    }

    impl AttributeReader for FakeSensors {
        async fn read_sensor(&self, id: &EntityId) -> anyhow::Result<Option<SensorSnapshot>> {
            if self.broken.contains(id) {
                anyhow::bail!("Connection refused reading {}", id);
            }
            Ok(self.sensors.get(id).cloned())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Published {
        pub id: EntityId,
        pub state: BinaryState,
        pub attributes: Attributes,
        pub at: DateTime,
    }

    #[derive(Clone, Default)]
    pub struct RecordingPublisher {
        published: Arc<Mutex<Vec<Published>>>,
        unreachable: bool,
    }

    impl RecordingPublisher {
        pub fn unreachable() -> Self {
            Self {
                unreachable: true,
                ..Default::default()
            }
        }

        pub fn published(&self) -> Vec<Published> {
            self.published.lock().unwrap().clone()
        }

        pub fn published_states(&self) -> Vec<(String, BinaryState)> {
            self.published()
                .into_iter()
                .map(|p| (p.id.to_string(), p.state))
                .collect()
        }

        pub fn clear(&self) {
            self.published.lock().unwrap().clear();
        }
    }

    impl StatePublisher for RecordingPublisher {
        async fn publish_state(&self, id: &EntityId, state: BinaryState, attributes: &Attributes) -> anyhow::Result<()> {
            self.published.lock().unwrap().push(Published {
                id: id.clone(),
                state,
                attributes: attributes.clone(),
                at: DateTime::now(),
            });

            if self.unreachable {
                anyhow::bail!("Home Assistant unreachable");
            }
            Ok(())
        }
    }

    pub struct ChannelChangeSource {
        rx: mpsc::Receiver<StateChange>,
    }

    impl ChannelChangeSource {
        pub fn open() -> (mpsc::Sender<StateChange>, Self) {
            let (tx, rx) = mpsc::channel(16);
            (tx, Self { rx })
        }
    }

    impl StateChangeSource for ChannelChangeSource {
        async fn next_change(&mut self) -> Option<StateChange> {
            self.rx.recv().await
        }
    }

    pub fn change_of(id: &str, old: &str, new: &str) -> StateChange {
        StateChange {
            entity_id: id.into(),
            old_state: Some(old.to_string()),
            new_state: Some(new.to_string()),
        }
    }
}

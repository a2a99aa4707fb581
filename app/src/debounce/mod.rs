mod binding;
mod config;
mod runner;

pub use binding::{RawSensorBinding, derive_id};
pub use config::{DebounceConfig, SettingsError};
pub use runner::DebounceRunner;

use std::collections::BTreeMap;

use infrastructure::meter::increment;

use crate::core::port::{AttributeReader, SensorSnapshot, StateChange, StatePublisher};
use crate::core::time::Duration;
use crate::core::EntityId;
use crate::t;

/// Turns bursty raw sensors into derived binary sensors that are on while the raw sensor changed within the
/// configured timeout and off otherwise. The raw value itself is never looked at, only the fact that it changed.
pub struct RawSensorDebouncer<P> {
    bindings: BTreeMap<EntityId, RawSensorBinding>,
    timeout: Duration,
    publisher: P,
}

impl<P: StatePublisher> RawSensorDebouncer<P> {
    /// Creates one binding per raw sensor and publishes all derived sensors as off.
    pub async fn initialize(config: &DebounceConfig, reader: &impl AttributeReader, publisher: P) -> Self {
        let now = t!(now);
        let mut bindings = BTreeMap::new();

        for raw_id in config.raw_sensors.iter() {
            let snapshot = match reader.read_sensor(raw_id).await {
                Ok(Some(snapshot)) => snapshot,
                Ok(None) => {
                    tracing::warn!("Raw sensor {} not found, derived sensor gets no attributes", raw_id);
                    SensorSnapshot::default()
                }
                Err(e) => {
                    tracing::error!("Error reading raw sensor {}, derived sensor gets no attributes: {:?}", raw_id, e);
                    SensorSnapshot::default()
                }
            };

            let binding = RawSensorBinding::new(raw_id.clone(), &config.suffix, snapshot, now);

            if binding.derived_id() == binding.raw_id() {
                tracing::warn!(
                    "Raw sensor {} doesn't contain suffix {:?}, derived sensor is published under the same id",
                    raw_id,
                    config.suffix
                );
            }

            bindings.insert(raw_id.clone(), binding);
        }

        let debouncer = Self {
            bindings,
            timeout: config.timeout(),
            publisher,
        };

        for binding in debouncer.bindings.values() {
            publish(&debouncer.publisher, binding).await;
        }

        tracing::info!(
            "Debouncing {} raw sensors, switching off after {} seconds without change",
            debouncer.bindings.len(),
            debouncer.timeout.as_secs()
        );

        debouncer
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn bindings(&self) -> impl Iterator<Item = &RawSensorBinding> {
        self.bindings.values()
    }

    pub async fn on_change(&mut self, change: &StateChange) {
        let Some(binding) = self.bindings.get_mut(&change.entity_id) else {
            return;
        };

        if binding.record_change(t!(now)) {
            tracing::info!(
                "Turning on {} ({} changed from {:?} to {:?})",
                binding.derived_id(),
                change.entity_id,
                change.old_state,
                change.new_state
            );
            publish(&self.publisher, binding).await;
        } else {
            tracing::trace!("Refreshed {} without publishing", binding.derived_id());
        }
    }

    pub async fn sweep(&mut self) {
        let now = t!(now);

        for binding in self.bindings.values_mut() {
            let last_change = binding.last_change();

            if binding.expire(now, self.timeout) {
                tracing::info!("Turning off {} (last change: {})", binding.derived_id(), last_change);
                publish(&self.publisher, binding).await;
            }
        }
    }
}

async fn publish(publisher: &impl StatePublisher, binding: &RawSensorBinding) {
    let state = binding.state();
    let state_name = state.to_string();
    let entity = binding.derived_id();

    match publisher
        .publish_state(entity, state, binding.copied_attributes())
        .await
    {
        Ok(()) => increment("raw_sensor_published", &[("entity", entity.as_str()), ("state", state_name.as_str())]),
        Err(e) => {
            tracing::error!("Error publishing {} as {}: {:?}", entity, state_name, e);
            increment("raw_sensor_publish_failed", &[("entity", entity.as_str())]);
        }
    }
}

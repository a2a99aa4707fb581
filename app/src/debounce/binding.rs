use crate::core::port::SensorSnapshot;
use crate::core::time::{DateTime, Duration};
use crate::core::{Attributes, BinaryState, EntityId};

/// Debounce state of one raw sensor and the derived sensor published for it.
#[derive(Debug, Clone)]
pub struct RawSensorBinding {
    raw_id: EntityId,
    derived_id: EntityId,
    copied_attributes: Attributes,
    last_change: DateTime,
    active: bool,
}

/// Id of the derived sensor: `raw_id` without `suffix`. Ids not containing the suffix pass through unchanged.
pub fn derive_id(raw_id: &EntityId, suffix: &str) -> EntityId {
    raw_id.without(suffix)
}

impl RawSensorBinding {
    pub fn new(raw_id: EntityId, suffix: &str, snapshot: SensorSnapshot, now: DateTime) -> Self {
        Self {
            derived_id: derive_id(&raw_id, suffix),
            raw_id,
            copied_attributes: snapshot.attributes,
            last_change: snapshot.last_changed.unwrap_or(now),
            active: false,
        }
    }

    pub fn raw_id(&self) -> &EntityId {
        &self.raw_id
    }

    pub fn derived_id(&self) -> &EntityId {
        &self.derived_id
    }

    pub fn copied_attributes(&self) -> &Attributes {
        &self.copied_attributes
    }

    pub fn last_change(&self) -> DateTime {
        self.last_change
    }

    pub fn state(&self) -> BinaryState {
        if self.active { BinaryState::On } else { BinaryState::Off }
    }

    /// Returns `true` if the derived sensor has to be switched on.
    pub fn record_change(&mut self, now: DateTime) -> bool {
        self.last_change = now;

        if self.active {
            return false;
        }

        self.active = true;
        true
    }

    /// Returns `true` if the derived sensor has to be switched off.
    pub fn expire(&mut self, now: DateTime, timeout: Duration) -> bool {
        if !self.active || now.elapsed_since(self.last_change).as_secs_ceil() < timeout.as_secs() {
            return false;
        }

        self.active = false;
        self.last_change = now;
        true
    }
}

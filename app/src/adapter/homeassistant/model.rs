use serde::Deserialize;

use crate::core::port::{SensorSnapshot, StateChange};
use crate::core::time::DateTime;
use crate::core::{Attributes, EntityId};

#[derive(Deserialize, Debug, Clone)]
pub struct HaState {
    pub state: String,
    #[serde(default)]
    pub attributes: Attributes,
    pub last_changed: Option<DateTime>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "event_type", content = "event_data")]
#[allow(dead_code)]
pub enum HaEvent {
    #[serde(rename = "state_changed")]
    StateChanged {
        entity_id: EntityId,
        old_state: Option<HaState>,
        new_state: Option<HaState>,
    },

    #[serde(untagged)]
    Unknown(serde_json::Value),
}

impl From<HaState> for SensorSnapshot {
    fn from(state: HaState) -> Self {
        SensorSnapshot {
            attributes: state.attributes,
            last_changed: state.last_changed,
        }
    }
}

impl HaEvent {
    /// State change carried by the event. Attribute-only updates don't count as a change.
    pub fn into_state_change(self) -> Option<StateChange> {
        match self {
            HaEvent::StateChanged {
                entity_id,
                old_state,
                new_state,
            } => {
                let old_state = old_state.map(|s| s.state);
                let new_state = new_state.map(|s| s.state);

                if old_state == new_state {
                    return None;
                }

                Some(StateChange {
                    entity_id,
                    old_state,
                    new_state,
                })
            }
            HaEvent::Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    fn state_json(entity_id: &str, state: &str) -> serde_json::Value {
        json!({
            "entity_id": entity_id,
            "state": state,
            "attributes": { "friendly_name": "Cam 1", "device_class": "motion" },
            "last_changed": "2025-03-01T09:00:00.123456+00:00",
            "last_updated": "2025-03-01T09:00:00.123456+00:00",
            "context": { "id": "01JNBW", "parent_id": null, "user_id": null }
        })
    }

    #[test]
    fn rest_state_to_snapshot() {
        let state: HaState = serde_json::from_value(state_json("binary_sensor.cam_1_raw", "on")).unwrap();

        let snapshot: SensorSnapshot = state.into();

        assert_json_eq!(
            serde_json::to_value(&snapshot.attributes).unwrap(),
            json!({ "friendly_name": "Cam 1", "device_class": "motion" })
        );
        assert_eq!(
            snapshot.last_changed,
            Some(DateTime::from_iso("2025-03-01T09:00:00.123456Z").unwrap())
        );
    }

    #[test]
    fn state_changed_event_to_change() {
        let event: HaEvent = serde_json::from_value(json!({
            "event_type": "state_changed",
            "event_data": {
                "entity_id": "binary_sensor.cam_1_raw",
                "old_state": state_json("binary_sensor.cam_1_raw", "off"),
                "new_state": state_json("binary_sensor.cam_1_raw", "on"),
            }
        }))
        .unwrap();

        assert_eq!(
            event.into_state_change(),
            Some(StateChange {
                entity_id: "binary_sensor.cam_1_raw".into(),
                old_state: Some("off".to_string()),
                new_state: Some("on".to_string()),
            })
        );
    }

    #[test]
    fn newly_created_entity_is_a_change() {
        let event: HaEvent = serde_json::from_value(json!({
            "event_type": "state_changed",
            "event_data": {
                "entity_id": "binary_sensor.cam_1_raw",
                "old_state": null,
                "new_state": state_json("binary_sensor.cam_1_raw", "on"),
            }
        }))
        .unwrap();

        let change = event.into_state_change().unwrap();

        assert_eq!(change.old_state, None);
        assert_eq!(change.new_state, Some("on".to_string()));
    }

    #[test]
    fn attribute_only_update_is_no_change() {
        let event: HaEvent = serde_json::from_value(json!({
            "event_type": "state_changed",
            "event_data": {
                "entity_id": "binary_sensor.cam_1_raw",
                "old_state": state_json("binary_sensor.cam_1_raw", "on"),
                "new_state": state_json("binary_sensor.cam_1_raw", "on"),
            }
        }))
        .unwrap();

        assert_eq!(event.into_state_change(), None);
    }

    #[test]
    fn other_events_are_unknown() {
        let event: HaEvent = serde_json::from_value(json!({
            "event_type": "call_service",
            "event_data": { "domain": "light", "service": "turn_on" }
        }))
        .unwrap();

        assert!(matches!(event, HaEvent::Unknown(_)));
        assert_eq!(event.into_state_change(), None);
    }
}

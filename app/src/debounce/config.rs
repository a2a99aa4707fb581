use serde::{Deserialize, Deserializer};

use crate::core::EntityId;
use crate::core::time::Duration;

pub const DEFAULT_SUFFIX: &str = "_raw";
pub const DEFAULT_SECONDS_TO_OFF: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct DebounceConfig {
    #[serde(deserialize_with = "comma_separated")]
    pub raw_sensors: Vec<EntityId>,
    #[serde(default = "default_suffix")]
    pub suffix: String,
    #[serde(default = "default_seconds_to_off")]
    pub seconds_to_off: u32,
}

#[derive(Debug, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SettingsError {
    #[display("No raw sensors configured")]
    NoRawSensors,

    #[display("seconds_to_off must be greater than zero")]
    ZeroTimeout,
}

impl DebounceConfig {
    #[cfg(test)]
    pub fn new(raw_sensors: Vec<EntityId>, suffix: impl Into<String>, seconds_to_off: u32) -> Self {
        Self {
            raw_sensors: normalize(raw_sensors.into_iter().map(|id| id.to_string())),
            suffix: suffix.into(),
            seconds_to_off,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.raw_sensors.is_empty() {
            return Err(SettingsError::NoRawSensors);
        }

        if self.seconds_to_off == 0 {
            return Err(SettingsError::ZeroTimeout);
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::seconds(self.seconds_to_off as i64)
    }
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

fn default_seconds_to_off() -> u32 {
    DEFAULT_SECONDS_TO_OFF
}

/// Accepts `"a,b,c"` as well as a proper list.
fn comma_separated<'de, D>(de: D) -> Result<Vec<EntityId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum JoinedOrList {
        Joined(String),
        List(Vec<String>),
    }

    let ids = match JoinedOrList::deserialize(de)? {
        JoinedOrList::Joined(joined) => joined.split(',').map(str::to_owned).collect::<Vec<_>>(),
        JoinedOrList::List(list) => list,
    };

    Ok(normalize(ids))
}

fn normalize(ids: impl IntoIterator<Item = String>) -> Vec<EntityId> {
    let mut result: Vec<EntityId> = vec![];

    for id in ids {
        let id = EntityId::new(id.trim());
        if id.as_str().is_empty() || result.contains(&id) {
            continue;
        }
        result.push(id);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse(toml: &str) -> DebounceConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn comma_separated_sensors_with_defaults() {
        let config = parse(r#"raw_sensors = "binary_sensor.cam_1_raw, binary_sensor.cam_2_raw,,""#);

        assert_eq!(
            config.raw_sensors,
            vec![
                EntityId::from("binary_sensor.cam_1_raw"),
                EntityId::from("binary_sensor.cam_2_raw")
            ]
        );
        assert_eq!(config.suffix, "_raw");
        assert_eq!(config.seconds_to_off, 10);
    }

    #[test]
    fn sensor_list_with_explicit_options() {
        let config = parse(
            r#"
            raw_sensors = ["binary_sensor.pir_1_in", "binary_sensor.pir_1_in", "binary_sensor.pir_2_in"]
            suffix = "_in"
            seconds_to_off = 5
            "#,
        );

        assert_eq!(config.raw_sensors.len(), 2);
        assert_eq!(config.suffix, "_in");
        assert_eq!(config.timeout(), Duration::seconds(5));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = DebounceConfig::new(vec!["binary_sensor.pir_raw".into()], "_raw", 0);

        assert_eq!(config.validate(), Err(SettingsError::ZeroTimeout));
    }

    #[test]
    fn empty_sensor_list_is_rejected() {
        let config = parse(r#"raw_sensors = " , ""#);

        assert_eq!(config.validate(), Err(SettingsError::NoRawSensors));
    }
}

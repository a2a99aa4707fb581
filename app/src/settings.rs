use config::{Config, ConfigError, Environment, File};
use infrastructure::{MonitoringConfig, MqttConfig};
use serde::Deserialize;

use crate::adapter::homeassistant::{HomeAssistant, PublishTarget};
use crate::debounce::DebounceConfig;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub monitoring: MonitoringConfig,
    pub mqtt: MqttConfig,
    pub homeassistant: HomeAssistant,
    pub raw_sensors: DebounceConfig,
    pub publish_target: Option<PublishTarget>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(File::with_name("config.toml"))
    }

    fn load<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        //double underscore, single ones are part of the keys
        let env = Environment::default()
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("raw_sensors.raw_sensors");

        Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    #[cfg(test)]
    fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::load(File::from_str(toml, config::FileFormat::Toml))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_is_valid() {
        let settings = Settings::from_toml(include_str!("../../config.toml")).unwrap();

        assert!(settings.raw_sensors.validate().is_ok());
        assert!(settings.publish_target.is_none());
        assert_eq!(settings.raw_sensors.raw_sensors.len(), 3);
    }

    #[test]
    fn publish_target_with_default_suffix() {
        let toml = r#"
            [monitoring]
            service_name = "raw-sensors"
            logs = { default_level = "info" }

            [mqtt]
            host = "localhost"
            port = 1883
            client_id = "raw-sensors"

            [homeassistant]
            url = "http://slave.local:8123"
            token = "abc"
            topic_event = "homeassistant/events"

            [raw_sensors]
            raw_sensors = "binary_sensor.pir_1_raw"

            [publish_target]
            url = "http://master.local:8123"
            token = "def"
        "#;

        let settings = Settings::from_toml(toml).unwrap();

        let target = settings.publish_target.unwrap();
        assert_eq!(target.url, "http://master.local:8123");
        assert_eq!(target.entity_suffix, "_slave");
        assert_eq!(settings.raw_sensors.seconds_to_off, 10);
    }
}

mod http;
mod monitoring;
mod mqtt;

pub use http::HttpClientConfig;
pub use monitoring::MonitoringConfig;
pub use mqtt::{Mqtt, MqttConfig, MqttInMessage, MqttSubscription};

pub mod meter {
    pub use super::monitoring::meter::increment;
}

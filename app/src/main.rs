use debounce::{DebounceRunner, RawSensorDebouncer};
use settings::Settings;

mod adapter;
mod core;
mod debounce;
mod settings;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");

    settings.monitoring.init().expect("Error initializing monitoring");

    settings
        .raw_sensors
        .validate()
        .expect("Invalid raw sensor configuration");

    let mut mqtt = settings.mqtt.new_client();

    let changes = settings
        .homeassistant
        .new_change_listener(&mut mqtt)
        .await
        .expect("Error subscribing to Home Assistant events");

    let reader = settings
        .homeassistant
        .new_attribute_reader()
        .expect("Error initializing Home Assistant REST client");

    let publisher = settings
        .homeassistant
        .new_state_publisher(settings.publish_target.as_ref())
        .expect("Error initializing Home Assistant REST client");

    tracing::info!("Initializing raw sensors");
    let debouncer = RawSensorDebouncer::initialize(&settings.raw_sensors, &reader, publisher).await;
    for binding in debouncer.bindings() {
        tracing::info!("Raw sensor {} -> {}", binding.raw_id(), binding.derived_id());
    }

    let runner = DebounceRunner::new(debouncer, changes);

    tracing::info!("Starting main loop");

    tokio::select!(
        _ = mqtt.process() => {},
        _ = runner.run() => {},
    );
}

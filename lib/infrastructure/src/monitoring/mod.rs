pub mod meter;

use std::error::Error;

use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{ExporterBuildError, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

//KNOWN ISSUES:
// - EnvFilter on layer-level looses log-statements in some tracing-subscriber versions, filters are
//   therefore built per layer from the same config

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MonitoringConfig {
    pub service_name: String,
    pub logs: EnvFilterConfig,
    pub traces: Option<EnvFilterConfig>,
    pub otlp: Option<OtlpConfig>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct EnvFilterConfig {
    pub default_level: String,
    #[serde(default)]
    pub filters: Vec<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct OtlpConfig {
    pub url: Option<String>,
    #[serde(default = "default_metrics_interval_secs")]
    pub metrics_interval_secs: u64,
}

fn default_metrics_interval_secs() -> u64 {
    15
}

impl TryInto<EnvFilter> for EnvFilterConfig {
    type Error = tracing_subscriber::filter::ParseError;

    fn try_into(self) -> Result<EnvFilter, Self::Error> {
        EnvFilter::builder()
            .with_default_directive(self.default_level.parse()?)
            .parse(self.filters.join(","))
    }
}

impl MonitoringConfig {
    pub fn init(&self) -> Result<(), Box<dyn Error>> {
        match &self.otlp {
            Some(otlp) => self.init_with_otlp(otlp),
            None => {
                let filter: EnvFilter = self.logs.clone().try_into()?;
                tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer())
                    .with(filter)
                    .init();
                Ok(())
            }
        }
    }

    fn init_with_otlp(&self, otlp: &OtlpConfig) -> Result<(), Box<dyn Error>> {
        let resource = Resource::builder()
            .with_attribute(KeyValue::new("service.name", self.service_name.clone()))
            .build();

        opentelemetry::global::set_text_map_propagator(TraceContextPropagator::default());

        let fmt_filter: EnvFilter = self.logs.clone().try_into()?;
        let fmt_layer = tracing_subscriber::fmt::layer().with_filter(fmt_filter);

        let logger_provider = init_logs(resource.clone(), otlp.url.clone())?;
        let logs_filter: EnvFilter = self.logs.clone().try_into()?;
        let logs_layer = OpenTelemetryTracingBridge::new(&logger_provider).with_filter(logs_filter);

        let tracer_provider = init_traces(resource.clone(), otlp.url.clone())?;
        let tracer = tracer_provider.tracer(self.service_name.clone());
        let traces_filter: EnvFilter = self.traces.clone().unwrap_or_else(|| self.logs.clone()).try_into()?;
        let traces_layer = OpenTelemetryLayer::new(tracer).with_filter(traces_filter);

        let meter_provider = init_metrics(resource, otlp)?;
        opentelemetry::global::set_meter_provider(meter_provider);

        tracing_subscriber::registry()
            .with(traces_layer)
            .with(logs_layer)
            .with(fmt_layer)
            .init();

        Ok(())
    }
}

fn init_traces(resource: Resource, url: Option<String>) -> Result<SdkTracerProvider, ExporterBuildError> {
    let builder = SdkTracerProvider::builder().with_resource(resource);

    match url {
        Some(url) => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(url)
                .build()?;
            Ok(builder.with_batch_exporter(exporter).build())
        }
        None => Ok(builder
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build()),
    }
}

fn init_metrics(resource: Resource, otlp: &OtlpConfig) -> Result<SdkMeterProvider, ExporterBuildError> {
    let interval = std::time::Duration::from_secs(otlp.metrics_interval_secs.max(1));

    let builder = SdkMeterProvider::builder().with_resource(resource);

    match &otlp.url {
        Some(url) => {
            let exporter = opentelemetry_otlp::MetricExporter::builder()
                .with_tonic()
                .with_endpoint(url.clone())
                .build()?;
            let reader = PeriodicReader::builder(exporter).with_interval(interval).build();
            Ok(builder.with_reader(reader).build())
        }
        None => {
            let reader = PeriodicReader::builder(opentelemetry_stdout::MetricExporter::default())
                .with_interval(interval)
                .build();
            Ok(builder.with_reader(reader).build())
        }
    }
}

fn init_logs(resource: Resource, url: Option<String>) -> Result<SdkLoggerProvider, ExporterBuildError> {
    let builder = SdkLoggerProvider::builder().with_resource(resource);

    match url {
        Some(url) => {
            let exporter = opentelemetry_otlp::LogExporter::builder()
                .with_tonic()
                .with_endpoint(url)
                .build()?;
            Ok(builder.with_batch_exporter(exporter).build())
        }
        None => Ok(builder
            .with_simple_exporter(opentelemetry_stdout::LogExporter::default())
            .build()),
    }
}

mod client;

pub use client::HttpClientConfig;

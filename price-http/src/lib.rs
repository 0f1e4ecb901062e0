//! HTTP backend for the prediction client.

mod client;
mod factory;

pub use client::HttpPredictionClient;
pub use factory::HttpClientFactory;

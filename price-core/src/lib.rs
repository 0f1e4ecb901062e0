pub mod client;
pub mod controller;
pub mod format;
pub mod models;

pub use client::{ClientConfig, ClientError, ClientFactory, ClientRegistry, PredictionClient};
pub use controller::{Phase, PredictionController, SubmitRejected};
pub use format::NumberFormat;
pub use models::*;

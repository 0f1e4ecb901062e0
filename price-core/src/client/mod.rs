pub mod factory;
pub mod prediction_client;

pub use factory::{ClientConfig, ClientFactory, ClientRegistry, DEFAULT_BASE_URL, DEFAULT_PREDICT_PATH};
pub use prediction_client::{ClientError, PredictionClient};

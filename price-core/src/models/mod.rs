mod form_field;
mod form_state;
mod prediction;
mod property_title;
mod request_payload;
mod town;

use thiserror::Error;

pub use form_field::{FormField, UnknownFieldError};
pub use form_state::{FieldError, FieldErrorKind, FormState};
pub use prediction::{
    PredictionError, PredictionResponse, PredictionResult, ResponseError, UNAVAILABLE_MESSAGE,
    UNEXPECTED_RESPONSE_MESSAGE,
};
pub use property_title::PropertyTitle;
pub use request_payload::RequestPayload;
pub use town::Town;

/// A select value that is not one of the listed options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not one of the listed options")]
pub struct UnknownOptionError(pub String);

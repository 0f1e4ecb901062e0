//! The prediction form controller.
//!
//! Owns the form values and the outcome of the most recent submission and
//! enforces the `Idle → Submitting → Idle` cycle. Submission is split in
//! two halves so the request can be built and checked without a network:
//!
//! 1. [`PredictionController::begin_submit`] validates the form and hands
//!    back the [`RequestPayload`] to send.
//! 2. [`PredictionController::complete_submit`] takes whatever the client
//!    returned and records the result.
//!
//! [`PredictionController::submit`] runs both halves around one call to a
//! [`PredictionClient`].

use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::client::{ClientError, PredictionClient};
use crate::models::{
    FieldError, FormField, FormState, PredictionError, PredictionResponse, PredictionResult,
    RequestPayload,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
}

/// Why [`PredictionController::begin_submit`] refused to start a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a prediction request is already in flight")]
    InFlight,

    #[error("form is incomplete or invalid")]
    Invalid(Vec<FieldError>),
}

#[derive(Debug, Clone, Default)]
pub struct PredictionController {
    form: FormState,
    phase: Phase,
    result: Option<PredictionResult>,
}

impl PredictionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from pre-filled values, e.g. taken from the command line.
    pub fn with_form(form: FormState) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn price(&self) -> Option<Decimal> {
        self.result.as_ref().and_then(PredictionResult::price)
    }

    pub fn error(&self) -> Option<&PredictionError> {
        self.result.as_ref().and_then(PredictionResult::error)
    }

    /// Stores a raw value for `field` and clears any displayed error.
    ///
    /// A previously displayed price stays until the next submission.
    pub fn update_field(
        &mut self,
        field: FormField,
        value: impl Into<String>,
    ) {
        self.form.set(field, value);
        if matches!(self.result, Some(PredictionResult::Failed(_))) {
            self.result = None;
        }
    }

    /// First half of a submission.
    ///
    /// On success the controller is `Submitting`, the previous result is
    /// cleared and the payload to send is returned. A submission that is
    /// already running is left untouched; an invalid form is recorded as a
    /// failed result without ever reaching the network.
    pub fn begin_submit(&mut self) -> Result<RequestPayload, SubmitRejected> {
        if self.is_submitting() {
            warn!("submit ignored: a request is already in flight");
            return Err(SubmitRejected::InFlight);
        }

        match self.form.to_payload() {
            Ok(payload) => {
                self.phase = Phase::Submitting;
                self.result = None;
                debug!(?payload, "submitting prediction request");
                Ok(payload)
            }
            Err(errors) => {
                for error in &errors {
                    warn!(%error, "validation error");
                }
                self.result = Some(PredictionResult::Failed(PredictionError::InvalidForm(
                    errors.clone(),
                )));
                Err(SubmitRejected::Invalid(errors))
            }
        }
    }

    /// Second half of a submission: records the outcome and returns to
    /// `Idle` whatever happened.
    pub fn complete_submit(
        &mut self,
        outcome: Result<Value, ClientError>,
    ) -> &PredictionResult {
        let result = match outcome {
            Ok(body) => match PredictionResponse::from_json(&body) {
                Ok(response) => {
                    info!(price = %response.predicted_price, "prediction received");
                    PredictionResult::Price(response.predicted_price)
                }
                Err(error) => {
                    error!(%error, %body, "prediction service returned an unexpected response");
                    PredictionResult::Failed(error.into())
                }
            },
            Err(error) => {
                error!(%error, "prediction request failed");
                PredictionResult::Failed(error.into())
            }
        };

        self.phase = Phase::Idle;
        self.result.insert(result)
    }

    /// Validates, sends one request through `client` and records the
    /// outcome.
    ///
    /// Returns `None` only when a submission was already in flight. If the
    /// returned future is dropped while the request is pending, the
    /// controller goes back to `Idle` with no result.
    pub async fn submit<C>(
        &mut self,
        client: &C,
    ) -> Option<&PredictionResult>
    where
        C: PredictionClient + ?Sized,
    {
        let payload = match self.begin_submit() {
            Ok(payload) => payload,
            Err(SubmitRejected::InFlight) => return None,
            Err(SubmitRejected::Invalid(_)) => return self.result.as_ref(),
        };

        let pending = PendingSubmit {
            controller: Some(self),
        };
        let outcome = client.predict(&payload).await;
        pending.finish(outcome)
    }
}

/// Holds a controller in `Submitting` across the request.
struct PendingSubmit<'a> {
    controller: Option<&'a mut PredictionController>,
}

impl<'a> PendingSubmit<'a> {
    fn finish(
        mut self,
        outcome: Result<Value, ClientError>,
    ) -> Option<&'a PredictionResult> {
        self.controller
            .take()
            .map(|controller| controller.complete_submit(outcome))
    }
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        if let Some(controller) = self.controller.take() {
            warn!("prediction request abandoned before a response arrived");
            controller.phase = Phase::Idle;
            controller.result = None;
        }
    }
}

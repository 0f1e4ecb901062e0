use std::io::{BufRead, Write};

use price_core::{
    ClientRegistry, FormField, PredictionClient, PredictionController, SubmitRejected,
};
use price_http::HttpClientFactory;
use rust_decimal::Decimal;
use tracing::{Instrument, debug, info, info_span};

use crate::{
    prompt::{PromptError, Prompter},
    view::Renderer,
};

pub const AGAIN_QUESTION: &str = "Predict another?";

/// Builds the registry with every supported backend.
pub fn build_registry() -> ClientRegistry {
    let mut registry = ClientRegistry::new();
    registry.register(Box::new(HttpClientFactory));
    debug!(backends = ?registry.available_backends(), "client registry built");
    registry
}

/// Parses a `FIELD=VALUE` command-line assignment. The field is named by
/// its wire key (`parking_space`) or its label (`Parking Space`).
pub fn parse_assignment(arg: &str) -> Result<(FormField, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{arg}'"))?;
    let field = name.parse::<FormField>().map_err(|e| e.to_string())?;
    Ok((field, value.trim().to_string()))
}

/// One run of the form: render, collect input, submit, display the outcome.
pub struct Session<R, W> {
    controller: PredictionController,
    client: Box<dyn PredictionClient>,
    renderer: Renderer,
    prompter: Prompter<R, W>,
    interactive: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// With `interactive` off the form is submitted once with whatever
    /// values the controller already holds.
    pub fn new(
        controller: PredictionController,
        client: Box<dyn PredictionClient>,
        renderer: Renderer,
        prompter: Prompter<R, W>,
        interactive: bool,
    ) -> Self {
        Self {
            controller,
            client,
            renderer,
            prompter,
            interactive,
        }
    }

    pub fn controller(&self) -> &PredictionController {
        &self.controller
    }

    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Runs until the user stops asking for predictions.
    ///
    /// The first pass only asks for fields that are still blank; later
    /// passes offer every field with its current value as the default.
    /// Returns the price shown last, if any.
    pub async fn run(&mut self) -> Result<Option<Decimal>, PromptError> {
        let header = self.renderer.header();
        writeln!(self.prompter.output(), "{header}")?;

        let mut fields = self.controller.form().missing_fields();
        loop {
            if self.interactive {
                self.prompter.fill_form(&mut self.controller, &fields)?;
            }

            self.submit_once().await?;

            if !self.interactive || !self.prompter.confirm(AGAIN_QUESTION)? {
                break;
            }
            fields = FormField::all().to_vec();
        }

        Ok(self.controller.price())
    }

    /// Submits the current form and prints the outcome.
    pub async fn submit_once(&mut self) -> Result<(), PromptError> {
        match self.controller.begin_submit() {
            Ok(payload) => {
                let view = self.renderer.view(&self.controller);
                let button = self.renderer.submit_button(&view);
                writeln!(self.prompter.output(), "{button}")?;
                self.prompter.output().flush()?;

                let span = info_span!("submit", town = %payload.town, title = %payload.title);
                let outcome = async {
                    info!("requesting prediction");
                    self.client.predict(&payload).await
                }
                .instrument(span.clone())
                .await;
                span.in_scope(|| {
                    self.controller.complete_submit(outcome);
                });
            }
            Err(SubmitRejected::InFlight) => return Ok(()),
            Err(SubmitRejected::Invalid(_)) => {}
        }

        let view = self.renderer.view(&self.controller);
        if let Some(outcome) = self.renderer.outcome(&view) {
            writeln!(self.prompter.output(), "{outcome}\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use price_core::{ClientError, FormState, NumberFormat, RequestPayload};
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};

    use super::*;

    /// Answers every request with the same body and keeps what it was sent.
    struct FixedClient {
        body: Result<Value, ClientError>,
        sent: Arc<Mutex<Vec<RequestPayload>>>,
    }

    #[async_trait]
    impl PredictionClient for FixedClient {
        async fn predict(
            &self,
            payload: &RequestPayload,
        ) -> Result<Value, ClientError> {
            self.sent.lock().unwrap().push(payload.clone());
            self.body.clone()
        }
    }

    type TestSession = Session<Cursor<Vec<u8>>, Vec<u8>>;

    fn session(
        form: FormState,
        body: Result<Value, ClientError>,
        input: &str,
        interactive: bool,
    ) -> (TestSession, Arc<Mutex<Vec<RequestPayload>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let client = FixedClient {
            body,
            sent: sent.clone(),
        };
        let session = Session::new(
            PredictionController::with_form(form),
            Box::new(client),
            Renderer::new(NumberFormat::default(), false),
            Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()),
            interactive,
        );
        (session, sent)
    }

    fn complete_form() -> FormState {
        FormState {
            bedrooms: "3".into(),
            bathrooms: "3".into(),
            toilets: "4".into(),
            parking_space: "2".into(),
            town: "Surulere".into(),
            title: "Block of Flats".into(),
        }
    }

    #[test]
    fn registry_offers_http() {
        assert_eq!(build_registry().available_backends(), vec!["http"]);
    }

    #[test]
    fn assignments_name_fields_by_key_or_label() {
        assert_eq!(
            parse_assignment("parking_space=2"),
            Ok((FormField::ParkingSpace, "2".to_string()))
        );
        assert_eq!(
            parse_assignment("Property Type= Block of Flats"),
            Ok((FormField::Title, "Block of Flats".to_string()))
        );
        assert_eq!(
            parse_assignment("town=Victoria Island=x"),
            Ok((FormField::Town, "Victoria Island=x".to_string()))
        );
    }

    #[test]
    fn malformed_assignments_are_rejected() {
        assert_eq!(
            parse_assignment("bedrooms"),
            Err("expected FIELD=VALUE, got 'bedrooms'".to_string())
        );
        assert_eq!(
            parse_assignment("garage=1"),
            Err("unknown form field 'garage'".to_string())
        );
    }

    #[tokio::test]
    async fn non_interactive_run_submits_once_and_prints_price() {
        let (mut session, sent) = session(
            complete_form(),
            Ok(json!({ "predicted_price": 45000000 })),
            "",
            false,
        );

        let price = session.run().await.unwrap();

        assert_eq!(price, Some(dec!(45000000)));
        assert_eq!(sent.lock().unwrap().len(), 1);
        let shown = String::from_utf8(session.into_output()).unwrap();
        assert!(shown.starts_with("Lagos House Price Predictor"));
        assert!(shown.contains("[ Predicting... ]"));
        assert!(shown.contains("Predicted Price:\n₦45,000,000"));
    }

    #[tokio::test]
    async fn non_interactive_incomplete_form_reports_without_request() {
        let mut form = complete_form();
        form.town.clear();
        let (mut session, sent) = session(form, Ok(json!({ "predicted_price": 1 })), "", false);

        let price = session.run().await.unwrap();

        assert_eq!(price, None);
        assert!(sent.lock().unwrap().is_empty());
        let shown = String::from_utf8(session.into_output()).unwrap();
        assert!(shown.contains("error: Please check the form: Town is required"));
    }

    #[tokio::test]
    async fn interactive_run_asks_only_missing_fields_first() {
        let mut form = complete_form();
        form.town.clear();
        form.bedrooms.clear();
        // town, bedrooms, then decline another round
        let (mut session, sent) = session(
            form,
            Ok(json!({ "predicted_price": 30000000 })),
            "2\n5\nn\n",
            true,
        );

        session.run().await.unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].bedrooms, 5);
        assert_eq!(sent[0].town.label(), "Lekki");
    }

    #[tokio::test]
    async fn another_round_reuses_current_values_as_defaults() {
        // round two: keep everything but bedrooms
        let input = "y\n\n\n6\n\n\n\nn\n";
        let (mut session, sent) = session(
            complete_form(),
            Ok(json!({ "predicted_price": 50000000 })),
            input,
            true,
        );

        session.run().await.unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].bedrooms, 3);
        assert_eq!(sent[1].bedrooms, 6);
        assert_eq!(sent[1].town, sent[0].town);
    }

    #[tokio::test]
    async fn service_failure_is_shown_not_raised() {
        let (mut session, _) = session(
            complete_form(),
            Err(ClientError::Status {
                status: 503,
                body: String::new(),
            }),
            "",
            false,
        );

        let price = session.run().await.unwrap();

        assert_eq!(price, None);
        assert!(session.controller().error().is_some());
        let shown = String::from_utf8(session.into_output()).unwrap();
        assert!(shown.contains("error: Unable to fetch prediction. Please try again."));
    }

    #[tokio::test]
    async fn interactive_end_of_input_is_reported() {
        let (mut session, sent) = session(
            FormState::new(),
            Ok(json!({ "predicted_price": 1 })),
            "1\n",
            true,
        );

        assert!(matches!(session.run().await, Err(PromptError::EndOfInput)));
        assert!(sent.lock().unwrap().is_empty());
    }
}

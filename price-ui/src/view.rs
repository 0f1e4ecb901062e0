//! Text rendering of the form state.

use price_core::{NumberFormat, PredictionController};

pub const TITLE: &str = "Lagos House Price Predictor";
pub const SUBMIT_LABEL: &str = "Get Prediction";
pub const SUBMITTING_LABEL: &str = "Predicting...";

const BOLD_BLUE: &str = "\x1b[1;34m";
const BOLD_RED: &str = "\x1b[1;31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// What the screen should show for the current controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    /// Formatted price, e.g. `₦45,000,000`.
    pub price: Option<String>,
    pub error: Option<String>,
}

impl ViewModel {
    pub fn from_controller(
        controller: &PredictionController,
        format: &NumberFormat,
    ) -> Self {
        let submitting = controller.is_submitting();
        Self {
            submit_label: if submitting {
                SUBMITTING_LABEL
            } else {
                SUBMIT_LABEL
            },
            submit_enabled: !submitting,
            price: controller.price().map(|price| format.currency(price)),
            error: controller.error().map(|error| error.user_message()),
        }
    }
}

pub struct Renderer {
    format: NumberFormat,
    ansi: bool,
}

impl Renderer {
    pub fn new(
        format: NumberFormat,
        ansi: bool,
    ) -> Self {
        Self { format, ansi }
    }

    pub fn view(
        &self,
        controller: &PredictionController,
    ) -> ViewModel {
        ViewModel::from_controller(controller, &self.format)
    }

    pub fn header(&self) -> String {
        let rule = "=".repeat(TITLE.chars().count());
        format!("{TITLE}\n{rule}\n")
    }

    /// The submit control; dimmed while disabled.
    pub fn submit_button(
        &self,
        view: &ViewModel,
    ) -> String {
        let button = format!("[ {} ]", view.submit_label);
        if self.ansi && !view.submit_enabled {
            format!("{DIM}{button}{RESET}")
        } else {
            button
        }
    }

    /// Result block: the price, the error, or nothing before the first
    /// submission.
    pub fn outcome(
        &self,
        view: &ViewModel,
    ) -> Option<String> {
        if let Some(error) = &view.error {
            return Some(if self.ansi {
                format!("{BOLD_RED}{error}{RESET}")
            } else {
                format!("error: {error}")
            });
        }
        view.price.as_ref().map(|price| {
            if self.ansi {
                format!("Predicted Price:\n{BOLD_BLUE}{price}{RESET}")
            } else {
                format!("Predicted Price:\n{price}")
            }
        })
    }
}

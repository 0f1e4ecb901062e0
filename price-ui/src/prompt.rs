//! Line-oriented form input.
//!
//! Count fields take free text (checked at submission, like a number
//! input). Select fields only accept a listed option, by number or by name.

use std::io::{self, BufRead, Write};

use price_core::{FormField, PredictionController, PropertyTitle, Town};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("input ended before the form was complete")]
    EndOfInput,
}

/// Options offered for a select field, `None` for free-text fields.
pub fn options_for(field: FormField) -> Option<Vec<&'static str>> {
    match field {
        FormField::Town => Some(Town::all().iter().map(Town::label).collect()),
        FormField::Title => Some(PropertyTitle::all().iter().map(PropertyTitle::label).collect()),
        _ => None,
    }
}

/// Maps an answer to a canonical option: a 1-based number or a name
/// matched without regard to case.
pub fn resolve_option(
    options: &[&'static str],
    answer: &str,
) -> Option<&'static str> {
    let answer = answer.trim();
    if let Ok(index) = answer.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| options.get(i)).copied();
    }
    options
        .iter()
        .copied()
        .find(|option| option.eq_ignore_ascii_case(answer))
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(
        input: R,
        output: W,
    ) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Asks for each of `fields` in turn and stores the answers.
    pub fn fill_form(
        &mut self,
        controller: &mut PredictionController,
        fields: &[FormField],
    ) -> Result<(), PromptError> {
        for field in fields {
            let current = controller.form().get(*field).to_string();
            if let Some(value) = self.ask_field(*field, &current)? {
                controller.update_field(*field, value);
            }
        }
        Ok(())
    }

    /// Asks for one field.
    ///
    /// Returns `None` when the user kept the current value by answering
    /// with an empty line. A blank field is asked again until answered;
    /// picking the `0) Select ...` placeholder blanks a select first.
    pub fn ask_field(
        &mut self,
        field: FormField,
        current: &str,
    ) -> Result<Option<String>, PromptError> {
        let options = options_for(field);
        let mut current = current;

        if let Some(options) = &options {
            writeln!(self.output, "{}:", field.label())?;
            writeln!(self.output, "   0) Select {}", field.label())?;
            for (i, option) in options.iter().enumerate() {
                writeln!(self.output, "  {:>2}) {option}", i + 1)?;
            }
        }

        loop {
            if current.is_empty() {
                write!(self.output, "{}: ", field.label())?;
            } else {
                write!(self.output, "{} [{current}]: ", field.label())?;
            }
            self.output.flush()?;

            let answer = self.read_line()?;
            let answer = answer.trim();

            let placeholder = options.is_some() && answer == "0";
            if placeholder {
                current = "";
            }
            if answer.is_empty() || placeholder {
                if current.is_empty() {
                    writeln!(self.output, "{} is required.", field.label())?;
                    continue;
                }
                return Ok(None);
            }

            match &options {
                Some(options) => match resolve_option(options, answer) {
                    Some(option) => return Ok(Some(option.to_string())),
                    None => writeln!(self.output, "Please choose one of the listed options.")?,
                },
                None => return Ok(Some(answer.to_string())),
            }
        }
    }

    /// Yes/no question defaulting to no.
    pub fn confirm(
        &mut self,
        question: &str,
    ) -> Result<bool, PromptError> {
        write!(self.output, "{question} [y/N]: ")?;
        self.output.flush()?;
        let answer = match self.read_line() {
            Ok(answer) => answer,
            Err(PromptError::EndOfInput) => return Ok(false),
            Err(other) => return Err(other),
        };
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn read_line(&mut self) -> Result<String, PromptError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::EndOfInput);
        }
        Ok(line)
    }
}

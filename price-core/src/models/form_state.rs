use std::fmt;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

use super::{FormField, PropertyTitle, RequestPayload, Town};

/// Why a single field blocks submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Missing,
    NotAWholeNumber,
    Negative,
    TooLarge,
    UnknownOption,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            FieldErrorKind::Missing => "is required",
            FieldErrorKind::NotAWholeNumber => "must be a whole number",
            FieldErrorKind::Negative => "cannot be negative",
            FieldErrorKind::TooLarge => "is too large",
            FieldErrorKind::UnknownOption => "must be one of the listed options",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field} {kind}")]
pub struct FieldError {
    pub field: FormField,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(
        field: FormField,
        kind: FieldErrorKind,
    ) -> Self {
        Self { field, kind }
    }
}

/// Raw values as the user typed or selected them.
///
/// Nothing here is validated until [`FormState::to_payload`] runs at
/// submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub bedrooms: String,
    pub bathrooms: String,
    pub toilets: String,
    pub parking_space: String,
    pub town: String,
    pub title: String,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        field: FormField,
    ) -> &str {
        match field {
            FormField::Bedrooms => &self.bedrooms,
            FormField::Bathrooms => &self.bathrooms,
            FormField::Toilets => &self.toilets,
            FormField::ParkingSpace => &self.parking_space,
            FormField::Town => &self.town,
            FormField::Title => &self.title,
        }
    }

    /// Replaces one field, leaving the others untouched.
    pub fn set(
        &mut self,
        field: FormField,
        value: impl Into<String>,
    ) {
        let slot = match field {
            FormField::Bedrooms => &mut self.bedrooms,
            FormField::Bathrooms => &mut self.bathrooms,
            FormField::Toilets => &mut self.toilets,
            FormField::ParkingSpace => &mut self.parking_space,
            FormField::Town => &mut self.town,
            FormField::Title => &mut self.title,
        };
        *slot = value.into();
    }

    /// Fields that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::all()
            .iter()
            .copied()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// Validates every field and builds the request body.
    ///
    /// All problems are collected, not just the first one.
    pub fn to_payload(&self) -> Result<RequestPayload, Vec<FieldError>> {
        let mut errors = Vec::new();

        let bedrooms = parse_count(FormField::Bedrooms, &self.bedrooms, &mut errors);
        let bathrooms = parse_count(FormField::Bathrooms, &self.bathrooms, &mut errors);
        let toilets = parse_count(FormField::Toilets, &self.toilets, &mut errors);
        let parking_space = parse_count(FormField::ParkingSpace, &self.parking_space, &mut errors);
        let town = parse_option::<Town>(FormField::Town, &self.town, &mut errors);
        let title = parse_option::<PropertyTitle>(FormField::Title, &self.title, &mut errors);

        match (bedrooms, bathrooms, toilets, parking_space, town, title) {
            (
                Some(bedrooms),
                Some(bathrooms),
                Some(toilets),
                Some(parking_space),
                Some(town),
                Some(title),
            ) if errors.is_empty() => Ok(RequestPayload {
                bedrooms,
                bathrooms,
                toilets,
                parking_space,
                town,
                title,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_count(
    field: FormField,
    value: &str,
    errors: &mut Vec<FieldError>,
) -> Option<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, FieldErrorKind::Missing));
        return None;
    }

    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let kind = match parse_number(trimmed) {
        Some(number) if !number.fract().is_zero() => FieldErrorKind::NotAWholeNumber,
        Some(number) if number.is_sign_negative() && !number.is_zero() => FieldErrorKind::Negative,
        Some(number) => match number.abs().to_u32() {
            Some(count) => return Some(count),
            None => FieldErrorKind::TooLarge,
        },
        // Digits alone only fail to parse when they overflow a Decimal.
        None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            FieldErrorKind::TooLarge
        }
        None => FieldErrorKind::NotAWholeNumber,
    };
    errors.push(FieldError::new(field, kind));
    None
}

/// Reads plain (`3`, `3.0`) or scientific (`1e1`) notation.
fn parse_number(text: &str) -> Option<Decimal> {
    if text.contains('_') {
        return None;
    }
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).ok()
    } else {
        text.parse().ok()
    }
}

fn parse_option<T: std::str::FromStr>(
    field: FormField,
    value: &str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, FieldErrorKind::Missing));
        return None;
    }
    match value.parse() {
        Ok(option) => Some(option),
        Err(_) => {
            errors.push(FieldError::new(field, FieldErrorKind::UnknownOption));
            None
        }
    }
}

impl fmt::Display for FormState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for field in FormField::all() {
            let label = format!("{}:", field.label());
            writeln!(f, "{label:<15}{}", self.get(*field))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn filled() -> FormState {
        FormState {
            bedrooms: "4".to_string(),
            bathrooms: "4".to_string(),
            toilets: "5".to_string(),
            parking_space: "2".to_string(),
            town: "Lekki".to_string(),
            title: "Detached Duplex".to_string(),
        }
    }

    #[test]
    fn new_form_has_every_field_missing() {
        let form = FormState::new();
        assert_eq!(form.missing_fields(), FormField::all().to_vec());
        assert!(filled().missing_fields().is_empty());
    }

    #[test]
    fn set_changes_only_the_named_field() {
        let mut form = filled();
        form.set(FormField::Toilets, "7");

        let mut expected = filled();
        expected.toilets = "7".to_string();
        assert_eq!(form, expected);
    }

    #[test]
    fn valid_form_builds_payload() {
        let payload = filled().to_payload().unwrap();

        assert_eq!(
            payload,
            RequestPayload {
                bedrooms: 4,
                bathrooms: 4,
                toilets: 5,
                parking_space: 2,
                town: Town::Lekki,
                title: PropertyTitle::DetachedDuplex,
            }
        );
    }

    #[test]
    fn counts_are_trimmed_before_parsing() {
        let mut form = filled();
        form.set(FormField::Bedrooms, " 3 ");
        assert_eq!(form.to_payload().unwrap().bedrooms, 3);
    }

    #[test]
    fn zero_counts_are_allowed() {
        let mut form = filled();
        form.set(FormField::ParkingSpace, "0");
        assert_eq!(form.to_payload().unwrap().parking_space, 0);
    }

    #[test]
    fn non_numeric_count_is_rejected_instead_of_sent() {
        let mut form = filled();
        form.set(FormField::Bathrooms, "two");

        assert_eq!(
            form.to_payload(),
            Err(vec![FieldError::new(
                FormField::Bathrooms,
                FieldErrorKind::NotAWholeNumber
            )])
        );
    }

    #[test]
    fn fractional_and_negative_counts_are_rejected() {
        let mut form = filled();
        form.set(FormField::Bedrooms, "2.5");
        form.set(FormField::Toilets, "-1");

        assert_eq!(
            form.to_payload(),
            Err(vec![
                FieldError::new(FormField::Bedrooms, FieldErrorKind::NotAWholeNumber),
                FieldError::new(FormField::Toilets, FieldErrorKind::Negative),
            ])
        );
    }

    #[test]
    fn integral_decimal_and_scientific_counts_are_accepted() {
        let mut form = filled();
        form.set(FormField::Bedrooms, "3.0");
        form.set(FormField::Bathrooms, "1e1");
        form.set(FormField::ParkingSpace, "-0");

        let payload = form.to_payload().unwrap();
        assert_eq!(payload.bedrooms, 3);
        assert_eq!(payload.bathrooms, 10);
        assert_eq!(payload.parking_space, 0);
    }

    #[test]
    fn counts_beyond_range_are_too_large() {
        let mut form = filled();
        form.set(FormField::Bedrooms, "5000000000");
        form.set(FormField::Toilets, "123456789012345678901234567890123");

        assert_eq!(
            form.to_payload(),
            Err(vec![
                FieldError::new(FormField::Bedrooms, FieldErrorKind::TooLarge),
                FieldError::new(FormField::Toilets, FieldErrorKind::TooLarge),
            ])
        );
        assert_eq!(
            FieldError::new(FormField::Bedrooms, FieldErrorKind::TooLarge).to_string(),
            "Bedrooms is too large"
        );
    }

    #[test]
    fn separators_and_fractional_exponents_are_rejected() {
        let mut form = filled();
        form.set(FormField::Bedrooms, "1_000");
        form.set(FormField::Toilets, "5e-1");

        assert_eq!(
            form.to_payload(),
            Err(vec![
                FieldError::new(FormField::Bedrooms, FieldErrorKind::NotAWholeNumber),
                FieldError::new(FormField::Toilets, FieldErrorKind::NotAWholeNumber),
            ])
        );
    }

    #[test]
    fn every_problem_is_reported() {
        let mut form = FormState::new();
        form.set(FormField::Town, "Abuja");

        let errors = form.to_payload().unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.contains(&FieldError::new(
            FormField::Town,
            FieldErrorKind::UnknownOption
        )));
        assert!(errors.contains(&FieldError::new(FormField::Title, FieldErrorKind::Missing)));
    }

    #[test]
    fn field_error_message_names_the_label() {
        let error = FieldError::new(FormField::ParkingSpace, FieldErrorKind::Missing);
        assert_eq!(error.to_string(), "Parking Space is required");
    }

    #[test]
    fn display_lists_every_field() {
        let text = filled().to_string();
        assert!(text.contains("Town:"));
        assert!(text.contains("Detached Duplex"));
        assert_eq!(text.lines().count(), 6);
    }
}

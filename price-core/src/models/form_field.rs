use std::{fmt, str::FromStr};

use thiserror::Error;

/// The six inputs of the prediction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Bedrooms,
    Bathrooms,
    Toilets,
    ParkingSpace,
    Town,
    Title,
}

impl FormField {
    /// Fields in the order the form presents them: the two selects first,
    /// then the counts.
    pub fn all() -> &'static [FormField] {
        &[
            FormField::Town,
            FormField::Title,
            FormField::Bedrooms,
            FormField::Bathrooms,
            FormField::Toilets,
            FormField::ParkingSpace,
        ]
    }

    /// Key used in the request body.
    pub fn key(&self) -> &'static str {
        match self {
            FormField::Bedrooms => "bedrooms",
            FormField::Bathrooms => "bathrooms",
            FormField::Toilets => "toilets",
            FormField::ParkingSpace => "parking_space",
            FormField::Town => "town",
            FormField::Title => "title",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Bedrooms => "Bedrooms",
            FormField::Bathrooms => "Bathrooms",
            FormField::Toilets => "Toilets",
            FormField::ParkingSpace => "Parking Space",
            FormField::Town => "Town",
            FormField::Title => "Property Type",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownFieldError(pub String);

impl FromStr for FormField {
    type Err = UnknownFieldError;

    /// Accepts either the wire key (`parking_space`) or the label
    /// (`Parking Space`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FormField::all()
            .iter()
            .copied()
            .find(|field| {
                field.key().eq_ignore_ascii_case(needle) || field.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_wire_keys_and_labels() {
        assert_eq!("parking_space".parse::<FormField>(), Ok(FormField::ParkingSpace));
        assert_eq!("Parking Space".parse::<FormField>(), Ok(FormField::ParkingSpace));
        assert_eq!(" property type ".parse::<FormField>(), Ok(FormField::Title));
        assert_eq!("TITLE".parse::<FormField>(), Ok(FormField::Title));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "garage".parse::<FormField>(),
            Err(UnknownFieldError("garage".to_string()))
        );
    }

    #[test]
    fn every_field_round_trips_through_its_key() {
        for field in FormField::all() {
            assert_eq!(field.key().parse::<FormField>(), Ok(*field));
        }
    }
}

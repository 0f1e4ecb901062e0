use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::UnknownOptionError;

/// Property type, sent to the service as `title`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyTitle {
    #[serde(rename = "Detached Duplex")]
    DetachedDuplex,
    #[serde(rename = "Semi-Detached Duplex")]
    SemiDetachedDuplex,
    #[serde(rename = "Terraced Duplex")]
    TerracedDuplex,
    Bungalow,
    #[serde(rename = "Block of Flats")]
    BlockOfFlats,
    Penthouse,
    Other,
}

impl PropertyTitle {
    pub fn all() -> &'static [PropertyTitle] {
        &[
            PropertyTitle::DetachedDuplex,
            PropertyTitle::SemiDetachedDuplex,
            PropertyTitle::TerracedDuplex,
            PropertyTitle::Bungalow,
            PropertyTitle::BlockOfFlats,
            PropertyTitle::Penthouse,
            PropertyTitle::Other,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyTitle::DetachedDuplex => "Detached Duplex",
            PropertyTitle::SemiDetachedDuplex => "Semi-Detached Duplex",
            PropertyTitle::TerracedDuplex => "Terraced Duplex",
            PropertyTitle::Bungalow => "Bungalow",
            PropertyTitle::BlockOfFlats => "Block of Flats",
            PropertyTitle::Penthouse => "Penthouse",
            PropertyTitle::Other => "Other",
        }
    }
}

impl fmt::Display for PropertyTitle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PropertyTitle {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        PropertyTitle::all()
            .iter()
            .copied()
            .find(|title| title.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownOptionError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_label_round_trips_through_from_str() {
        for title in PropertyTitle::all() {
            assert_eq!(title.label().parse::<PropertyTitle>(), Ok(*title));
        }
    }

    #[test]
    fn hyphenated_label_serializes_verbatim() {
        assert_eq!(
            serde_json::to_string(&PropertyTitle::SemiDetachedDuplex).unwrap(),
            "\"Semi-Detached Duplex\""
        );
    }

    #[test]
    fn unknown_title_is_rejected() {
        assert!("Mansion".parse::<PropertyTitle>().is_err());
    }
}

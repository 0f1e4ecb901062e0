use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::UnknownOptionError;

/// Lagos towns the prediction service was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Town {
    Ikoyi,
    Lekki,
    #[serde(rename = "Victoria Island")]
    VictoriaIsland,
    Yaba,
    Surulere,
    Ikeja,
    Ajah,
    Maryland,
    Ogudu,
    Other,
}

impl Town {
    pub fn all() -> &'static [Town] {
        &[
            Town::Ikoyi,
            Town::Lekki,
            Town::VictoriaIsland,
            Town::Yaba,
            Town::Surulere,
            Town::Ikeja,
            Town::Ajah,
            Town::Maryland,
            Town::Ogudu,
            Town::Other,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Town::Ikoyi => "Ikoyi",
            Town::Lekki => "Lekki",
            Town::VictoriaIsland => "Victoria Island",
            Town::Yaba => "Yaba",
            Town::Surulere => "Surulere",
            Town::Ikeja => "Ikeja",
            Town::Ajah => "Ajah",
            Town::Maryland => "Maryland",
            Town::Ogudu => "Ogudu",
            Town::Other => "Other",
        }
    }
}

impl fmt::Display for Town {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Town {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Town::all()
            .iter()
            .copied()
            .find(|town| town.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownOptionError(s.to_string()))
    }
}

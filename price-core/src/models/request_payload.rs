use serde::{Deserialize, Serialize};

use super::{PropertyTitle, Town};

/// Body of the `POST /predict` request.
///
/// Built from a validated [`FormState`](super::FormState); the key set is
/// fixed by the prediction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPayload {
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub toilets: u32,
    pub parking_space: u32,
    pub town: Town,
    pub title: PropertyTitle,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_with_service_key_set() {
        let payload = RequestPayload {
            bedrooms: 4,
            bathrooms: 5,
            toilets: 6,
            parking_space: 3,
            town: Town::Lekki,
            title: PropertyTitle::SemiDetachedDuplex,
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "bedrooms": 4,
                "bathrooms": 5,
                "toilets": 6,
                "parking_space": 3,
                "town": "Lekki",
                "title": "Semi-Detached Duplex"
            })
        );
    }
}

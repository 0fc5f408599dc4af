//! Built-in reference data set: three beams and one antenna.

use rigview_env::{ConfigurationStore, Result};
use serde_json::json;

/// Returns the reference data as a JSON document.
pub fn reference_json() -> serde_json::Value {
    json!({
        "beams": {
            "BEAM_ID_1": {
                "getAngle": 50,
                "getRate": 10,
                "getRotationalVelocity": 5,
            },
            "BEAM_ID_2": {
                "getAngle": 51,
                "getRate": 10,
                "getRotationalVelocity": 5,
            },
            "BEAM_ID_3": {
                "getAngle": 52,
                "getRate": 10,
                "getRotationalVelocity": 5,
            },
        },
        "antennas": {
            "ANTENNA_ID_1": {
                "getBeams": ["BEAM_ID_1", "BEAM_ID_3"],
                "getType": "ANTENNA_TYPE_1",
            }
        }
    })
}

/// Returns the reference data as a store.
pub fn reference_store() -> Result<ConfigurationStore> {
    ConfigurationStore::from_json_value(reference_json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigview_env::FieldValue;

    #[test]
    fn test_reference_shape() {
        let store = reference_store().unwrap();

        assert_eq!(store.category_count(), 2);
        assert_eq!(store.entity_count(), 4);
        assert_eq!(
            store.field("beams", "BEAM_ID_3", "getAngle"),
            Some(&FieldValue::Integer(52))
        );
        assert_eq!(
            store.field("antennas", "ANTENNA_ID_1", "getBeams"),
            Some(&FieldValue::from(vec!["BEAM_ID_1", "BEAM_ID_3"]))
        );
    }
}

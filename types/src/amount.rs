//! Serde helpers for 128-bit amounts.
//!
//! TOML has no integer type wider than `i64`, and JSON consumers commonly
//! lose precision past 2^53, so amounts cross text formats as decimal
//! strings. Binary formats see the same string form.

/// `#[serde(with = "accrue_types::amount::decimal")]` for `u128` fields.
pub mod decimal {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    /// Parse a decimal amount, allowing `_` digit separators.
    pub fn parse(raw: &str) -> Result<u128, String> {
        let digits: String = raw.trim().chars().filter(|c| *c != '_').collect();
        digits
            .parse::<u128>()
            .map_err(|e| format!("invalid amount {raw:?}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "super::decimal")]
        amount: u128,
    }

    #[test]
    fn json_uses_strings() {
        let h = Holder { amount: u128::MAX };
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("{{\"amount\":\"{}\"}}", u128::MAX));
        assert_eq!(serde_json::from_str::<Holder>(&json).unwrap(), h);
    }

    #[test]
    fn separators_are_accepted() {
        let h: Holder = serde_json::from_str(r#"{"amount":"1_000_000"}"#).unwrap();
        assert_eq!(h.amount, 1_000_000);
        assert!(serde_json::from_str::<Holder>(r#"{"amount":"-1"}"#).is_err());
    }

    #[test]
    fn bincode_round_trip() {
        let h = Holder { amount: 12345 };
        let bytes = bincode::serialize(&h).unwrap();
        assert_eq!(bincode::deserialize::<Holder>(&bytes).unwrap(), h);
    }
}

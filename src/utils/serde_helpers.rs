//! Serde adapters for amount fields.
//!
//! Raw token amounts are arbitrary-precision signed integers; JSON event
//! feeds carry them as decimal strings (uint256 values overflow every native
//! JSON number type), so the models and event structs serialize them through
//! these helpers.

use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serializer};

/// `#[serde(with = "bigint_string")]` for `BigInt` fields.
pub mod bigint_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<BigInt>()
            .map_err(|e| serde::de::Error::custom(format!("invalid integer amount {s:?}: {e}")))
    }
}

/// `#[serde(with = "option_bigint_string")]` for `Option<BigInt>` fields.
pub mod option_bigint_string {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<BigInt>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BigInt>, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        match s {
            None => Ok(None),
            Some(s) => s
                .parse::<BigInt>()
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid integer amount {s:?}: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Amount {
        #[serde(with = "super::bigint_string")]
        value: BigInt,
    }

    #[test]
    fn test_bigint_string_round_trip() {
        // A uint256-scale value that no native number type holds
        let json = r#"{"value":"115792089237316195423570985008687907853269984665640564039457"}"#;
        let parsed: Amount = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), json);
    }

    #[test]
    fn test_bigint_string_negative() {
        let parsed: Amount = serde_json::from_str(r#"{"value":"-42"}"#).unwrap();
        assert_eq!(parsed.value, BigInt::from(-42));
    }

    #[test]
    fn test_bigint_string_rejects_garbage() {
        assert!(serde_json::from_str::<Amount>(r#"{"value":"1.5"}"#).is_err());
        assert!(serde_json::from_str::<Amount>(r#"{"value":"abc"}"#).is_err());
    }
}

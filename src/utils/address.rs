use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pseudo-address some aggregator calls use for the chain's native asset.
pub const NATIVE_ASSET_SENTINEL: &str = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";

/// A 20-byte EVM account or token address.
///
/// Stored as raw bytes so packed byte strings (e.g. Uniswap V3 route
/// encodings) can be sliced into addresses directly; displayed and serialized
/// as lowercase `0x`-prefixed hex, which is also the entity id format used by
/// the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    /// Build an address from a byte slice. Fails unless exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; 20] = bytes
            .try_into()
            .map_err(|_| anyhow!("expected 20 address bytes, got {}", bytes.len()))?;
        Ok(Address(raw))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Lowercase hex id, `0x`-prefixed. Used as the store id for tokens,
    /// takers and makers.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let stripped = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|e| anyhow!("invalid address {s:?}: {e}"))?;
        Address::from_slice(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Normalize a token address for matching and storage: calls that sell or buy
/// the native asset encode it with a sentinel address, while the fills they
/// produce reference the wrapped token. Mapping the sentinel onto the wrapped
/// token keeps both sides comparable.
pub fn normalize_token_address(token: Address, wrapped_native: Address) -> Address {
    let sentinel: Address = NATIVE_ASSET_SENTINEL.parse().expect("sentinel is valid hex");
    if token == sentinel {
        wrapped_native
    } else {
        token
    }
}

use chrono::{DateTime, NaiveDateTime};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::utils::serde_helpers::bigint_string;
use crate::utils::Address;

/// Venue that produced a fill. Known venues get a variant; transformer bridge
/// fills can carry arbitrary venue names on the wire, which land in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::EnumString)]
pub enum Source {
    ApeSwap,
    BakerySwap,
    Balancer,
    Bancor,
    CafeSwap,
    CoFiX,
    Cream,
    CryptoCom,
    Curve,
    Dodo,
    Dodov2,
    JulSwap,
    Kyber,
    LimitOrder,
    Linkswap,
    LiquidityProvider,
    Mooniswap,
    MStable,
    Oasis,
    OtcOrder,
    PancakeSwap,
    PancakeSwapV2,
    RfqOrder,
    Shell,
    Snowswap,
    Sushiswap,
    Swerve,
    Uniswap,
    UniswapV2,
    UniswapV3,
    Unknown,
    #[strum(default)]
    Other(String),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Source::ApeSwap => "ApeSwap",
            Source::BakerySwap => "BakerySwap",
            Source::Balancer => "Balancer",
            Source::Bancor => "Bancor",
            Source::CafeSwap => "CafeSwap",
            Source::CoFiX => "CoFiX",
            Source::Cream => "Cream",
            Source::CryptoCom => "CryptoCom",
            Source::Curve => "Curve",
            Source::Dodo => "Dodo",
            Source::Dodov2 => "Dodov2",
            Source::JulSwap => "JulSwap",
            Source::Kyber => "Kyber",
            Source::LimitOrder => "LimitOrder",
            Source::Linkswap => "Linkswap",
            Source::LiquidityProvider => "LiquidityProvider",
            Source::Mooniswap => "Mooniswap",
            Source::MStable => "MStable",
            Source::Oasis => "Oasis",
            Source::OtcOrder => "OtcOrder",
            Source::PancakeSwap => "PancakeSwap",
            Source::PancakeSwapV2 => "PancakeSwapV2",
            Source::RfqOrder => "RfqOrder",
            Source::Shell => "Shell",
            Source::Snowswap => "Snowswap",
            Source::Sushiswap => "Sushiswap",
            Source::Swerve => "Swerve",
            Source::Uniswap => "Uniswap",
            Source::UniswapV2 => "UniswapV2",
            Source::UniswapV3 => "UniswapV3",
            Source::Unknown => "Unknown",
            Source::Other(name) => name,
        };
        f.write_str(name)
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        // EnumString with a default variant never fails
        Ok(Source::from_str(&s).unwrap_or(Source::Other(s)))
    }
}

/// Aggregator entry point that triggered a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, Serialize, Deserialize)]
pub enum SwapMethod {
    #[strum(serialize = "TransformERC20")]
    #[serde(rename = "TransformERC20")]
    TransformErc20,
    LiquidityProvider,
    #[strum(serialize = "UniswapVIP")]
    #[serde(rename = "UniswapVIP")]
    UniswapVip,
    #[strum(serialize = "PancakeSwapVIP")]
    #[serde(rename = "PancakeSwapVIP")]
    PancakeSwapVip,
    #[strum(serialize = "Uniswap3VIP")]
    #[serde(rename = "Uniswap3VIP")]
    UniswapV3Vip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, Serialize, Deserialize)]
pub enum NativeOrderType {
    RfqOrder,
    OtcOrder,
    LimitOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, Serialize, Deserialize)]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// Convert a unix timestamp in seconds to the naive UTC representation the
/// models store.
pub fn timestamp_from_secs(secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(secs, 0)
        .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
        .naive_utc()
}

/// One on-chain transaction's accumulated state: every fill recorded for it,
/// in insertion order, and the most recently assembled swap (the window
/// boundary for the next swap event).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub block_number: u64,
    pub timestamp: NaiveDateTime,
    pub fills: Vec<String>,
    pub last_swap: Option<String>,
}

impl Transaction {
    pub fn new(hash: &str, block_number: u64, timestamp_secs: i64) -> Self {
        Self {
            id: hash.to_string(),
            block_number,
            timestamp: timestamp_from_secs(timestamp_secs),
            fills: Vec::new(),
            last_swap: None,
        }
    }
}

/// One atomic token-for-token exchange against a single liquidity venue.
/// Append-only: built once when its event is decoded and never mutated.
/// Amount signs are normalized at construction; both amounts are magnitudes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    pub id: String,
    pub transaction: String,
    pub block_number: u64,
    pub timestamp: NaiveDateTime,
    pub log_index: Option<u64>,
    pub source: Source,
    pub sender: Option<Address>,
    pub recipient: Option<Address>,
    /// Liquidity provider: pool address for AMM fills, maker for native fills.
    pub provider: Option<Address>,
    pub input_token: Address,
    pub output_token: Address,
    #[serde(with = "bigint_string")]
    pub input_token_amount: BigInt,
    #[serde(with = "bigint_string")]
    pub output_token_amount: BigInt,
}

/// An aggregator-level (user-facing) exchange, composed of zero or more
/// fills. The fill list preserves matched span order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swap {
    pub id: String,
    pub transaction: String,
    pub block_number: u64,
    pub timestamp: NaiveDateTime,
    /// Unset for call-driven swaps, which have no log position of their own.
    pub log_index: Option<u64>,
    pub method: SwapMethod,
    pub fills: Vec<String>,
    pub input_token: Address,
    pub output_token: Address,
    #[serde(with = "bigint_string")]
    pub input_token_amount: BigInt,
    #[serde(with = "bigint_string")]
    pub output_token_amount: BigInt,
    pub taker: Address,
    /// Disambiguates the venue when one method tag covers several forks.
    pub hint: Option<String>,
}

impl Swap {
    /// Id for an event-driven swap.
    pub fn event_id(tx_id: &str, log_index: u64) -> String {
        format!("{tx_id}-{log_index}")
    }

    /// Id for a call-driven swap, which has a call index instead of a log
    /// position.
    pub fn call_id(tx_id: &str, call_index: u32) -> String {
        format!("{tx_id}-call-{call_index}")
    }
}

/// Self-contained limit/RFQ/OTC order fill. Always paired 1:1 with a Fill
/// record but never window- or span-matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeOrderFill {
    pub id: String,
    pub transaction: String,
    pub block_number: u64,
    pub timestamp: NaiveDateTime,
    pub order_type: NativeOrderType,
    pub order_hash: String,
    pub maker: Address,
    pub taker: Address,
    pub input_token: Address,
    pub output_token: Address,
    #[serde(with = "bigint_string")]
    pub input_token_amount: BigInt,
    #[serde(with = "bigint_string")]
    pub output_token_amount: BigInt,
    /// Hex pool tag for limit/RFQ orders; empty for OTC orders, which have
    /// no pool field.
    pub pool: String,
    #[serde(with = "bigint_string")]
    pub fee: BigInt,
}

/// Per-token aggregate volumes in raw token units, split by the kind of
/// activity that moved them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: Address,
    #[serde(with = "bigint_string")]
    pub swap_volume: BigInt,
    #[serde(with = "bigint_string")]
    pub rfq_order_volume: BigInt,
    #[serde(with = "bigint_string")]
    pub otc_order_volume: BigInt,
    #[serde(with = "bigint_string")]
    pub limit_order_volume: BigInt,
}

impl Token {
    pub fn new(address: Address) -> Self {
        Self {
            id: address,
            swap_volume: BigInt::from(0),
            rfq_order_volume: BigInt::from(0),
            otc_order_volume: BigInt::from(0),
            limit_order_volume: BigInt::from(0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taker {
    pub id: Address,
    pub swap_count: u64,
    pub native_order_fill_count: u64,
    pub erc721_order_fill_count: u64,
    pub erc1155_order_fill_count: u64,
}

impl Taker {
    pub fn new(address: Address) -> Self {
        Self {
            id: address,
            swap_count: 0,
            native_order_fill_count: 0,
            erc721_order_fill_count: 0,
            erc1155_order_fill_count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maker {
    pub id: Address,
    pub native_order_fill_count: u64,
    pub erc721_order_fill_count: u64,
    pub erc1155_order_fill_count: u64,
}

impl Maker {
    pub fn new(address: Address) -> Self {
        Self {
            id: address,
            native_order_fill_count: 0,
            erc721_order_fill_count: 0,
            erc1155_order_fill_count: 0,
        }
    }
}

/// An NFT referenced by an ERC721/ERC1155 order fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftToken {
    pub id: String,
    pub address: Address,
    #[serde(with = "bigint_string")]
    pub token_id: BigInt,
    pub is_erc1155: bool,
}

impl NftToken {
    pub fn make_id(address: Address, token_id: &BigInt) -> String {
        format!("{address}-{token_id}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Erc721OrderFill {
    pub id: String,
    pub transaction: String,
    pub block_number: u64,
    pub timestamp: NaiveDateTime,
    pub erc20_token: Address,
    #[serde(with = "bigint_string")]
    pub erc20_token_amount: BigInt,
    pub erc721_token: String,
    pub trade_direction: TradeDirection,
    #[serde(with = "bigint_string")]
    pub nonce: BigInt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Erc1155OrderFill {
    pub id: String,
    pub transaction: String,
    pub block_number: u64,
    pub timestamp: NaiveDateTime,
    pub erc20_token: Address,
    #[serde(with = "bigint_string")]
    pub erc20_token_amount: BigInt,
    pub erc1155_token: String,
    #[serde(with = "bigint_string")]
    pub erc1155_token_amount: BigInt,
    pub trade_direction: TradeDirection,
    #[serde(with = "bigint_string")]
    pub nonce: BigInt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display_and_parse() {
        assert_eq!(Source::UniswapV3.to_string(), "UniswapV3");
        assert_eq!("Sushiswap".parse::<Source>().unwrap(), Source::Sushiswap);

        // Unrecognized venue names survive as Other, round-tripping verbatim
        let odd: Source = "KyberDmm".parse().unwrap();
        assert_eq!(odd, Source::Other("KyberDmm".to_string()));
        assert_eq!(odd.to_string(), "KyberDmm");
    }

    #[test]
    fn test_swap_method_tags() {
        assert_eq!(SwapMethod::TransformErc20.to_string(), "TransformERC20");
        assert_eq!(SwapMethod::UniswapV3Vip.to_string(), "Uniswap3VIP");
    }

    #[test]
    fn test_swap_ids() {
        assert_eq!(Swap::event_id("0xabc", 17), "0xabc-17");
        assert_eq!(Swap::call_id("0xabc", 2), "0xabc-call-2");
    }

    #[test]
    fn test_timestamp_from_secs_clamps_invalid() {
        assert_eq!(timestamp_from_secs(0).and_utc().timestamp(), 0);
        // Out-of-range seconds fall back to the epoch instead of panicking
        assert_eq!(timestamp_from_secs(i64::MAX).and_utc().timestamp(), 0);
    }
}

//! Normalized inbound event and call records.
//!
//! The decoding layer (out of scope here) turns raw logs and traces into
//! these typed records and delivers them in blockchain order: log order
//! within a transaction, block order across blocks. Every record carries its
//! transaction identity and its ordering key (log index, or call index for
//! call-driven records, which have no log position of their own).
//!
//! Amounts are decimal strings on the wire and arbitrary-precision signed
//! integers here; pool deltas keep their on-chain sign convention and are
//! normalized where the fill is constructed.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::utils::serde_helpers::{bigint_string, option_bigint_string};
use crate::utils::Address;

/// Context shared by every log-emitting event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventContext {
    pub transaction_hash: String,
    pub block_number: u64,
    pub block_timestamp: i64,
    pub log_index: u64,
    /// Contract that emitted the log.
    pub address: Address,
}

/// Context shared by call-driven records, which have a call index instead of
/// a log position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallContext {
    pub transaction_hash: String,
    pub block_number: u64,
    pub block_timestamp: i64,
    pub call_index: u32,
    /// Immediate caller of the aggregator function.
    pub from: Address,
    /// Transaction origin.
    pub transaction_from: Address,
    #[serde(with = "bigint_string")]
    pub transaction_value: BigInt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformedErc20Event {
    pub context: EventContext,
    pub taker: Address,
    pub input_token: Address,
    pub output_token: Address,
    #[serde(with = "bigint_string")]
    pub input_token_amount: BigInt,
    #[serde(with = "bigint_string")]
    pub output_token_amount: BigInt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityProviderSwapEvent {
    pub context: EventContext,
    pub provider: Address,
    pub recipient: Address,
    pub input_token: Address,
    pub output_token: Address,
    #[serde(with = "bigint_string")]
    pub input_token_amount: BigInt,
    #[serde(with = "bigint_string")]
    pub output_token_amount: BigInt,
}

/// RFQ, OTC and limit order fills share one shape; the wrapping
/// [`ExchangeEvent`] variant says which kind was filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeOrderFilledEvent {
    pub context: EventContext,
    pub order_hash: String,
    pub maker: Address,
    pub taker: Address,
    pub maker_token: Address,
    pub taker_token: Address,
    #[serde(with = "bigint_string")]
    pub taker_token_filled_amount: BigInt,
    #[serde(with = "bigint_string")]
    pub maker_token_filled_amount: BigInt,
    /// Hex pool tag. OTC orders have none.
    #[serde(default)]
    pub pool: Option<String>,
    /// Limit orders only.
    #[serde(default, with = "option_bigint_string")]
    pub protocol_fee_paid: Option<BigInt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Erc721OrderFilledEvent {
    pub context: EventContext,
    /// 0 = buy, anything else = sell (contract enum on the wire).
    pub direction: u8,
    pub maker: Address,
    pub taker: Address,
    #[serde(with = "bigint_string")]
    pub nonce: BigInt,
    pub erc20_token: Address,
    #[serde(with = "bigint_string")]
    pub erc20_token_amount: BigInt,
    pub erc721_token: Address,
    #[serde(with = "bigint_string")]
    pub erc721_token_id: BigInt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Erc1155OrderFilledEvent {
    pub context: EventContext,
    pub direction: u8,
    pub maker: Address,
    pub taker: Address,
    #[serde(with = "bigint_string")]
    pub nonce: BigInt,
    pub erc20_token: Address,
    #[serde(with = "bigint_string")]
    pub erc20_fill_amount: BigInt,
    pub erc1155_token: Address,
    #[serde(with = "bigint_string")]
    pub erc1155_token_id: BigInt,
    #[serde(with = "bigint_string")]
    pub erc1155_fill_amount: BigInt,
}

/// Uniswap V2 family pair `Swap` event. Exactly one of the `in` amounts is
/// zero; that decides the trade direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSwapEvent {
    /// `context.address` is the pair contract.
    pub context: EventContext,
    pub sender: Address,
    pub to: Address,
    pub token0: Address,
    pub token1: Address,
    #[serde(with = "bigint_string")]
    pub amount0_in: BigInt,
    #[serde(with = "bigint_string")]
    pub amount1_in: BigInt,
    #[serde(with = "bigint_string")]
    pub amount0_out: BigInt,
    #[serde(with = "bigint_string")]
    pub amount1_out: BigInt,
}

/// Uniswap V3 pool `Swap` event. Amounts are signed pool deltas: the
/// positive side entered the pool, the negative side left it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSwapEvent {
    /// `context.address` is the pool contract.
    pub context: EventContext,
    pub sender: Address,
    pub recipient: Address,
    pub token0: Address,
    pub token1: Address,
    #[serde(with = "bigint_string")]
    pub amount0: BigInt,
    #[serde(with = "bigint_string")]
    pub amount1: BigInt,
}

/// Modern `BridgeFill` from the transformer executor. The 32-byte source
/// field packs a protocol id in the upper half and an ASCII venue name in
/// the lower half.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeFillEvent {
    pub context: EventContext,
    #[serde(with = "hex::serde")]
    pub source: Vec<u8>,
    pub input_token: Address,
    pub output_token: Address,
    #[serde(with = "bigint_string")]
    pub input_token_amount: BigInt,
    #[serde(with = "bigint_string")]
    pub output_token_amount: BigInt,
}

/// Pre-transformer `BridgeFill` carrying a numeric venue id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyBridgeFillEvent {
    pub context: EventContext,
    pub source_id: u32,
    pub input_token: Address,
    pub output_token: Address,
    #[serde(with = "bigint_string")]
    pub input_token_amount: BigInt,
    #[serde(with = "bigint_string")]
    pub output_token_amount: BigInt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Erc20BridgeTransferEvent {
    pub context: EventContext,
    pub from: Address,
    pub input_token: Address,
    pub output_token: Address,
    #[serde(with = "bigint_string")]
    pub input_token_amount: BigInt,
    #[serde(with = "bigint_string")]
    pub output_token_amount: BigInt,
}

/// `sellToUniswap` / `sellToPancakeSwap` VIP calls carry the route as an
/// explicit token list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellToUniswapCall {
    pub context: CallContext,
    pub tokens: Vec<Address>,
    #[serde(with = "bigint_string")]
    pub sell_amount: BigInt,
    #[serde(with = "bigint_string")]
    pub buy_amount: BigInt,
    #[serde(default)]
    pub is_sushi: bool,
}

/// `sellTokenForTokenToUniswapV3` and friends carry the route as packed
/// bytes: `token(20) | fee(3) | token(20) | ...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellToUniswapV3Call {
    pub context: CallContext,
    #[serde(with = "hex::serde")]
    pub encoded_path: Vec<u8>,
    /// Absent on the ETH-input variant, which has no sell amount parameter.
    #[serde(default, with = "option_bigint_string")]
    pub sell_amount: Option<BigInt>,
    #[serde(with = "bigint_string")]
    pub buy_amount: BigInt,
}

/// Which `sellTo*UniswapV3` entry point a call record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniswapV3CallKind {
    TokenForToken,
    EthForToken,
    TokenForEth,
}

/// One normalized record of the inbound stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExchangeEvent {
    TransformedErc20(TransformedErc20Event),
    LiquidityProviderSwap(LiquidityProviderSwapEvent),
    RfqOrderFilled(NativeOrderFilledEvent),
    OtcOrderFilled(NativeOrderFilledEvent),
    LimitOrderFilled(NativeOrderFilledEvent),
    Erc721OrderFilled(Erc721OrderFilledEvent),
    Erc1155OrderFilled(Erc1155OrderFilledEvent),
    UniswapPairSwap(PairSwapEvent),
    UniswapV3PoolSwap(PoolSwapEvent),
    BridgeFill(BridgeFillEvent),
    LegacyBridgeFill(LegacyBridgeFillEvent),
    Erc20BridgeTransfer(Erc20BridgeTransferEvent),
    SellToUniswap(SellToUniswapCall),
    SellToPancakeSwap(SellToUniswapCall),
    SellTokenForTokenToUniswapV3(SellToUniswapV3Call),
    SellEthForTokenToUniswapV3(SellToUniswapV3Call),
    SellTokenForEthToUniswapV3(SellToUniswapV3Call),
}

impl ExchangeEvent {
    pub fn transaction_hash(&self) -> &str {
        match self {
            Self::TransformedErc20(e) => &e.context.transaction_hash,
            Self::LiquidityProviderSwap(e) => &e.context.transaction_hash,
            Self::RfqOrderFilled(e) | Self::OtcOrderFilled(e) | Self::LimitOrderFilled(e) => {
                &e.context.transaction_hash
            }
            Self::Erc721OrderFilled(e) => &e.context.transaction_hash,
            Self::Erc1155OrderFilled(e) => &e.context.transaction_hash,
            Self::UniswapPairSwap(e) => &e.context.transaction_hash,
            Self::UniswapV3PoolSwap(e) => &e.context.transaction_hash,
            Self::BridgeFill(e) => &e.context.transaction_hash,
            Self::LegacyBridgeFill(e) => &e.context.transaction_hash,
            Self::Erc20BridgeTransfer(e) => &e.context.transaction_hash,
            Self::SellToUniswap(c) | Self::SellToPancakeSwap(c) => &c.context.transaction_hash,
            Self::SellTokenForTokenToUniswapV3(c)
            | Self::SellEthForTokenToUniswapV3(c)
            | Self::SellTokenForEthToUniswapV3(c) => &c.context.transaction_hash,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::TransformedErc20(_) => "TransformedERC20",
            Self::LiquidityProviderSwap(_) => "LiquidityProviderSwap",
            Self::RfqOrderFilled(_) => "RfqOrderFilled",
            Self::OtcOrderFilled(_) => "OtcOrderFilled",
            Self::LimitOrderFilled(_) => "LimitOrderFilled",
            Self::Erc721OrderFilled(_) => "ERC721OrderFilled",
            Self::Erc1155OrderFilled(_) => "ERC1155OrderFilled",
            Self::UniswapPairSwap(_) => "UniswapPairSwap",
            Self::UniswapV3PoolSwap(_) => "UniswapV3PoolSwap",
            Self::BridgeFill(_) => "BridgeFill",
            Self::LegacyBridgeFill(_) => "LegacyBridgeFill",
            Self::Erc20BridgeTransfer(_) => "ERC20BridgeTransfer",
            Self::SellToUniswap(_) => "SellToUniswap",
            Self::SellToPancakeSwap(_) => "SellToPancakeSwap",
            Self::SellTokenForTokenToUniswapV3(_) => "SellTokenForTokenToUniswapV3",
            Self::SellEthForTokenToUniswapV3(_) => "SellEthForTokenToUniswapV3",
            Self::SellTokenForEthToUniswapV3(_) => "SellTokenForEthToUniswapV3",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_round_trip() {
        let json = r#"{
            "type": "TransformedErc20",
            "context": {
                "transaction_hash": "0xf00",
                "block_number": 18000000,
                "block_timestamp": 1700000000,
                "log_index": 7,
                "address": "0xdef1c0ded9bec7f1a1670819833240f027b25eff"
            },
            "taker": "0x1111111111111111111111111111111111111111",
            "input_token": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            "output_token": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            "input_token_amount": "2500000000",
            "output_token_amount": "1000000000000000000"
        }"#;

        let event: ExchangeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.transaction_hash(), "0xf00");
        assert_eq!(event.kind(), "TransformedERC20");

        match event {
            ExchangeEvent::TransformedErc20(e) => {
                assert_eq!(e.context.log_index, 7);
                assert_eq!(e.input_token_amount, BigInt::from(2_500_000_000u64));
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_encoded_path_is_hex() {
        let json = r#"{
            "type": "SellTokenForTokenToUniswapV3",
            "context": {
                "transaction_hash": "0xbeef",
                "block_number": 1,
                "block_timestamp": 0,
                "call_index": 0,
                "from": "0x2222222222222222222222222222222222222222",
                "transaction_from": "0x2222222222222222222222222222222222222222",
                "transaction_value": "0"
            },
            "encoded_path": "a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48000bb8c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            "sell_amount": "1000000",
            "buy_amount": "42"
        }"#;

        let event: ExchangeEvent = serde_json::from_str(json).unwrap();
        match event {
            ExchangeEvent::SellTokenForTokenToUniswapV3(c) => {
                assert_eq!(c.encoded_path.len(), 43, "one-hop packed route is 43 bytes");
                assert_eq!(c.sell_amount, Some(BigInt::from(1_000_000)));
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }
}

// Copyright © Exchange Proxy Indexer Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Exchange-Proxy Swap Attribution Indexer
//!
//! Reconstructs aggregator-level swaps from low-level DEX fills on EVM
//! chains:
//! - venue events (Uniswap V2/V3 pool swaps, transformer bridge fills) are
//!   recorded as per-transaction Fill entities,
//! - aggregator events and calls (TransformERC20, VIP sell paths,
//!   liquidity-provider swaps) claim contiguous spans of those fills through
//!   log-position windowed matching,
//! - native and NFT order fills are recorded as self-contained records,
//! - token/taker/maker volume and count aggregates are driven off the
//!   assembled records.

/// Network selection and per-network address tables
pub mod config;

/// Transaction, event and call processing pipeline
pub mod processors;

/// Entity records and the store abstraction behind the engine
pub mod store;

/// Addresses, serde adapters, processor traits
pub mod utils;

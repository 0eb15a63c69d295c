// Copyright © Exchange Proxy Indexer Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Event Processors
//!
//! This module contains the processing logic that turns the normalized event
//! stream into Fill and Swap records.
//!
//! ## Main Components
//!
//! ### `swap_processor`
//! The orchestrator: consumes batches of normalized events in stream order
//! and dispatches each one to the protocol handler that owns it. Also keeps
//! batch-level statistics and pushes run notifications to the caller.
//!
//! ### `events`
//! Protocol-specific handlers and the matching core:
//! - **exchange_proxy**: aggregator events and calls; hosts the fill window
//!   selector, span matcher, and swap assembler
//! - **uniswap_v2** / **uniswap_v3**: pool swap events recorded as fills
//! - **transformers**: bridge fill events recorded as fills
//! - **volume_calculator**: token/taker/maker aggregate updates
//!
//! ## Data Flow
//!
//! ```text
//! Event Stream → SwapProcessor → Protocol Handlers → Store
//!                                       ↓
//!                      Fill Matching → Swap Assembly → Volume Calculator
//! ```
//!
//! Each protocol has its own handler module, so adding another fill source
//! or aggregator entry point stays a local change.

/// Core event processor that orchestrates the indexing pipeline
pub mod swap_processor;

/// Protocol-specific event handlers and the matching engine
pub mod events;

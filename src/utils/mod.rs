// Copyright © Exchange Proxy Indexer Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Utility Functions and Shared Components
//!
//! This module contains small shared building blocks used throughout the
//! indexer.
//!
//! ## Key Components
//!
//! ### Addresses (`address`)
//! - 20-byte EVM address newtype with lowercase-hex formatting
//! - Token address normalization (native-asset sentinel handling)
//!
//! ### Serde helpers (`serde_helpers`)
//! - Decimal-string encoding for arbitrary-precision amounts in JSON feeds
//!
//! ### Processor traits (`processor_trait`)
//! - The batch-processing interface the run loop drives

/// EVM address newtype and token address normalization
pub mod address;

/// Batch processor interface
pub mod processor_trait;

/// Serde adapters for big-integer amount fields
pub mod serde_helpers;

pub use address::Address;

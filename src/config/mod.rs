// Copyright © Exchange Proxy Indexer Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Configuration Management
//!
//! This module handles all configuration aspects of the indexer: which
//! network is being indexed, the aggregator contract addresses on that
//! network, and the pool classification table behind `classify_pool`.
//!
//! ## Configuration Structure
//!
//! - **IndexerConfig**: top-level container loaded from a YAML file
//! - **NetworkConfig**: immutable per-network address tables, built once at
//!   startup and injected into the processors
//!
//! ## Configuration Sources
//!
//! - Built-in per-network address constants (`network`)
//! - YAML configuration files for the network choice and extra pool
//!   classifications
//! - Command-line arguments for the config and event stream paths

/// Top-level indexer configuration loaded from YAML
pub mod indexer_config;

/// Per-network address constants and the pool classification table
pub mod network;

pub use indexer_config::IndexerConfig;
pub use network::{NetworkConfig, NetworkId};

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::network::{NetworkConfig, NetworkId};
use crate::store::models::Source;
use crate::utils::Address;

fn default_batch_size() -> usize {
    100
}

/// One operator-supplied pool classification entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolEntry {
    pub address: Address,
    pub source: Source,
}

/// Top-level indexer configuration, loaded from a YAML file.
///
/// ```yaml
/// network: mainnet
/// batch_size: 100
/// pools:
///   - address: "0x7bea39867e4169dbe237d55c8242a8f2fcdcc387"
///     source: UniswapV3
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    pub network: NetworkId,
    /// Extra pool classifications overlaid on the built-in per-network table.
    #[serde(default)]
    pub pools: Vec<PoolEntry>,
    /// How many events are handed to the processor per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl IndexerConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Build the immutable network address tables with the configured pool
    /// overlay applied.
    pub fn network_config(&self) -> Result<NetworkConfig> {
        let mut network = NetworkConfig::for_network(self.network)?;
        for entry in &self.pools {
            network.add_pool(entry.address, entry.source.clone());
        }
        Ok(network)
    }
}

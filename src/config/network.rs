use ahash::AHashMap;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::models::Source;
use crate::utils::Address;

// Exchange proxy deployments. The proxy is the sender of record for every
// fill produced through a VIP path and the provenance anchor for matching.
pub const MAINNET_EXCHANGE_PROXY: &str = "0xdef1c0ded9bec7f1a1670819833240f027b25eff";
pub const OPTIMISM_EXCHANGE_PROXY: &str = "0xdef1abe32c034e558cdd535791643c58a13acc10";
pub const BSC_EXCHANGE_PROXY: &str = "0xdef1c0ded9bec7f1a1670819833240f027b25eff";
pub const POLYGON_EXCHANGE_PROXY: &str = "0xdef1c0ded9bec7f1a1670819833240f027b25eff";
pub const FANTOM_EXCHANGE_PROXY: &str = "0xdef189deaef76e379df891899eb5a00a94cbc250";
pub const AVALANCHE_EXCHANGE_PROXY: &str = "0xdef1c0ded9bec7f1a1670819833240f027b25eff";
pub const BASE_EXCHANGE_PROXY: &str = "0xdef1c0ded9bec7f1a1670819833240f027b25eff";
pub const CELO_EXCHANGE_PROXY: &str = "0xdef1c0ded9bec7f1a1670819833240f027b25eff";
pub const ARBITRUM_EXCHANGE_PROXY: &str = "0xdef1c0ded9bec7f1a1670819833240f027b25eff";

// Flash wallet (transformer executor). Bridge fills must be emitted by it and
// transform fills must pay out to it.
pub const MAINNET_FLASH_WALLET: &str = "0x22f9dcf4647084d6c31b2765f6910cd85c178c18";
pub const OPTIMISM_FLASH_WALLET: &str = "0xa3128d9b7cca7d5af29780a56abeec12b05a6740";
pub const BSC_FLASH_WALLET: &str = "0xdb6f1920a889355780af7570773609bd8cb1f498";
pub const POLYGON_FLASH_WALLET: &str = "0xdb6f1920a889355780af7570773609bd8cb1f498";
pub const FANTOM_FLASH_WALLET: &str = "0xb4d961671cadfed687e040b076eee29840c142e5";
pub const AVALANCHE_FLASH_WALLET: &str = "0xdb6f1920a889355780af7570773609bd8cb1f498";
pub const BASE_FLASH_WALLET: &str = "0x22f9dcf4647084d6c31b2765f6910cd85c178c18";
pub const ARBITRUM_FLASH_WALLET: &str = "0xdb6f1920a889355780af7570773609bd8cb1f498";

// Liquidity-provider sandbox. LP fills sent by the sandbox itself are
// internal plumbing, not user-attributable fills.
pub const MAINNET_SANDBOX: &str = "0xc0aee478e3658e2610c5f7a4a2e1777ce9e4f2ac";
pub const BSC_SANDBOX: &str = "0xde7b2747624a647600fdb349184d0448ab954929";
pub const POLYGON_SANDBOX: &str = "0x4dd97080adf36103bd3db822f9d3c0e44890fd69";
pub const FANTOM_SANDBOX: &str = "0xca64d4225804f2ae069760cb5ff2f1d8bac1c2f9";
pub const AVALANCHE_SANDBOX: &str = "0x8953c63d0858d286cc407cd6f8e26b9cbd02a511";
pub const BASE_SANDBOX: &str = "0x407b4128e9ecad8769b2332312a9f655cb9f5f3a";

// Wrapped native tokens, used to normalize the native-asset sentinel in call
// routes onto the token the fills actually reference.
pub const MAINNET_WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
pub const OPTIMISM_WETH: &str = "0x4200000000000000000000000000000000000006";
pub const BSC_WBNB: &str = "0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c";
pub const POLYGON_WMATIC: &str = "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270";
pub const FANTOM_WFTM: &str = "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270";
pub const AVALANCHE_WAVAX: &str = "0xdb6f1920a889355780af7570773609bd8cb1f498";
pub const BASE_WETH: &str = "0x22f9dcf4647084d6c31b2765f6910cd85c178c18";
pub const ARBITRUM_WETH: &str = "0x4200000000000000000000000000000000000006";

// Default pool classifications. High-traffic pools per network; operators
// extend the table through the `pools` section of the config file.
pub const MAINNET_DEFAULT_POOLS: &[(&str, &str)] = &[
    // Uniswap V2 pairs
    ("0xb4e16d0168e52d35cacd2c6185b44281ec28c9dc", "UniswapV2"), // USDC/WETH
    ("0xa478c2975ab1ea89e8196811f51a7b7ade33eb11", "UniswapV2"), // DAI/WETH
    ("0x0d4a11d5eeaac28ec3f61d100daf4d40471f1852", "UniswapV2"), // WETH/USDT
    // Sushiswap pairs
    ("0x397ff1542f962076d0bfe58ea045ffa2d347aca0", "Sushiswap"), // WETH/USDC
    ("0x06da0fd433c1a5d7a4faa01111c044910a184553", "Sushiswap"), // WETH/USDT
    // Uniswap V3 pools
    ("0x88e6a0c2ddd26feeb64f039a2c41296fced0f900", "UniswapV3"), // USDC/WETH 0.05%
    ("0x8ad599c3a0ff1de082011efddc58f1908eb6e6d8", "UniswapV3"), // USDC/WETH 0.3%
    ("0x4e68ccd3e89f51c3074ca5072bbac773960dfa36", "UniswapV3"), // WETH/USDT 0.3%
    ("0x5777d92f208679db4b9778590fa3cab3ac9e2168", "UniswapV3"), // DAI/USDC 0.01%
];

pub const BSC_DEFAULT_POOLS: &[(&str, &str)] = &[
    ("0x1b96b92314c44b159149f7e0303511fb2fc4774f", "PancakeSwap"), // WBNB/BUSD v1
    ("0x58f876857a02d6762e0101bb5c46a8c1ed44dc16", "PancakeSwapV2"), // WBNB/BUSD
    ("0x0ed7e52944161450477ee417de9cd3a859b14fd0", "PancakeSwapV2"), // CAKE/WBNB
];

/// Networks the indexer knows address tables for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum NetworkId {
    #[serde(rename = "mainnet")]
    #[strum(serialize = "mainnet")]
    Mainnet,
    #[serde(rename = "optimism")]
    #[strum(serialize = "optimism")]
    Optimism,
    #[serde(rename = "bsc")]
    #[strum(serialize = "bsc")]
    Bsc,
    #[serde(rename = "matic")]
    #[strum(serialize = "matic")]
    Polygon,
    #[serde(rename = "fantom")]
    #[strum(serialize = "fantom")]
    Fantom,
    #[serde(rename = "avalanche")]
    #[strum(serialize = "avalanche")]
    Avalanche,
    #[serde(rename = "base")]
    #[strum(serialize = "base")]
    Base,
    #[serde(rename = "celo")]
    #[strum(serialize = "celo")]
    Celo,
    #[serde(rename = "arbitrum-one")]
    #[strum(serialize = "arbitrum-one")]
    ArbitrumOne,
}

/// Immutable address tables for one network, built once at startup and
/// injected wherever provenance checks or pool classification are needed.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub network: NetworkId,
    pub exchange_proxy: Address,
    pub flash_wallet: Address,
    pub sandbox: Address,
    pub wrapped_native_token: Address,
    pools: AHashMap<Address, Source>,
}

impl NetworkConfig {
    /// Build the address tables for `network` from the built-in constants.
    pub fn for_network(network: NetworkId) -> Result<Self> {
        let (proxy, flash_wallet, sandbox, wrapped, default_pools): (
            &str,
            &str,
            &str,
            &str,
            &[(&str, &str)],
        ) = match network {
            NetworkId::Mainnet => (
                MAINNET_EXCHANGE_PROXY,
                MAINNET_FLASH_WALLET,
                MAINNET_SANDBOX,
                MAINNET_WETH,
                MAINNET_DEFAULT_POOLS,
            ),
            NetworkId::Optimism => (
                OPTIMISM_EXCHANGE_PROXY,
                OPTIMISM_FLASH_WALLET,
                ZERO,
                OPTIMISM_WETH,
                &[],
            ),
            NetworkId::Bsc => (
                BSC_EXCHANGE_PROXY,
                BSC_FLASH_WALLET,
                BSC_SANDBOX,
                BSC_WBNB,
                BSC_DEFAULT_POOLS,
            ),
            NetworkId::Polygon => (
                POLYGON_EXCHANGE_PROXY,
                POLYGON_FLASH_WALLET,
                POLYGON_SANDBOX,
                POLYGON_WMATIC,
                &[],
            ),
            NetworkId::Fantom => (
                FANTOM_EXCHANGE_PROXY,
                FANTOM_FLASH_WALLET,
                FANTOM_SANDBOX,
                FANTOM_WFTM,
                &[],
            ),
            NetworkId::Avalanche => (
                AVALANCHE_EXCHANGE_PROXY,
                AVALANCHE_FLASH_WALLET,
                AVALANCHE_SANDBOX,
                AVALANCHE_WAVAX,
                &[],
            ),
            NetworkId::Base => (
                BASE_EXCHANGE_PROXY,
                BASE_FLASH_WALLET,
                BASE_SANDBOX,
                BASE_WETH,
                &[],
            ),
            NetworkId::Celo => (CELO_EXCHANGE_PROXY, ZERO, ZERO, ZERO, &[]),
            NetworkId::ArbitrumOne => (
                ARBITRUM_EXCHANGE_PROXY,
                ARBITRUM_FLASH_WALLET,
                ZERO,
                ARBITRUM_WETH,
                &[],
            ),
        };

        let mut pools = AHashMap::new();
        for (address, source) in default_pools {
            pools.insert(
                address
                    .parse::<Address>()
                    .with_context(|| format!("bad built-in pool address {address}"))?,
                source.parse::<Source>().expect("source parse is infallible"),
            );
        }

        Ok(Self {
            network,
            exchange_proxy: proxy.parse().context("bad exchange proxy address")?,
            flash_wallet: flash_wallet.parse().context("bad flash wallet address")?,
            sandbox: sandbox.parse().context("bad sandbox address")?,
            wrapped_native_token: wrapped.parse().context("bad wrapped native address")?,
            pools,
        })
    }

    /// Add or override one pool classification. Used to overlay the
    /// operator-supplied `pools` section from the config file.
    pub fn add_pool(&mut self, address: Address, source: Source) {
        self.pools.insert(address, source);
    }

    /// Venue behind a pool address. Pools the table does not know yield
    /// [`Source::Unknown`]; fills from such pools are not attributable.
    pub fn classify_pool(&self, address: &Address) -> Source {
        self.pools.get(address).cloned().unwrap_or(Source::Unknown)
    }
}

const ZERO: &str = "0x0000000000000000000000000000000000000000";

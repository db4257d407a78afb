use std::fmt::{self, Display};

use serde::Serialize;

use crate::constants::CHAIN_ID_REGEX;

/// A known network and the public endpoint used when no RPC URL is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chain {
    /// Short, lowercase name used for selection.
    pub name: &'static str,
    /// The EIP-155 chain id.
    pub id: u64,
    /// A public JSON-RPC endpoint.
    pub rpc_url: &'static str,
}

impl Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Ethereum Mainnet chain ID
pub const CHAIN_ID_ETHEREUM: u64 = 1;
/// Sepolia testnet chain ID
pub const CHAIN_ID_SEPOLIA: u64 = 11155111;
/// Holesky testnet chain ID
pub const CHAIN_ID_HOLESKY: u64 = 17000;
/// Polygon Mainnet chain ID
pub const CHAIN_ID_POLYGON: u64 = 137;
/// BSC Mainnet chain ID
pub const CHAIN_ID_BSC: u64 = 56;
/// Arbitrum One chain ID
pub const CHAIN_ID_ARBITRUM: u64 = 42161;
/// Optimism chain ID
pub const CHAIN_ID_OPTIMISM: u64 = 10;
/// Avalanche C-Chain chain ID
pub const CHAIN_ID_AVALANCHE: u64 = 43114;
/// Base chain ID
pub const CHAIN_ID_BASE: u64 = 8453;
/// Linea chain ID
pub const CHAIN_ID_LINEA: u64 = 59144;
/// Scroll chain ID
pub const CHAIN_ID_SCROLL: u64 = 534352;
/// Gnosis chain ID
pub const CHAIN_ID_GNOSIS: u64 = 100;

/// Every chain slotscan knows how to reach without extra configuration.
pub static CHAINS: [Chain; 12] = [
    Chain { name: "ethereum", id: CHAIN_ID_ETHEREUM, rpc_url: "https://eth.llamarpc.com" },
    Chain {
        name: "sepolia",
        id: CHAIN_ID_SEPOLIA,
        rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
    },
    Chain {
        name: "holesky",
        id: CHAIN_ID_HOLESKY,
        rpc_url: "https://ethereum-holesky-rpc.publicnode.com",
    },
    Chain { name: "polygon", id: CHAIN_ID_POLYGON, rpc_url: "https://polygon-rpc.com" },
    Chain { name: "bsc", id: CHAIN_ID_BSC, rpc_url: "https://bsc-dataseed.bnbchain.org" },
    Chain { name: "arbitrum", id: CHAIN_ID_ARBITRUM, rpc_url: "https://arb1.arbitrum.io/rpc" },
    Chain { name: "optimism", id: CHAIN_ID_OPTIMISM, rpc_url: "https://mainnet.optimism.io" },
    Chain {
        name: "avalanche",
        id: CHAIN_ID_AVALANCHE,
        rpc_url: "https://api.avax.network/ext/bc/C/rpc",
    },
    Chain { name: "base", id: CHAIN_ID_BASE, rpc_url: "https://mainnet.base.org" },
    Chain { name: "linea", id: CHAIN_ID_LINEA, rpc_url: "https://rpc.linea.build" },
    Chain { name: "scroll", id: CHAIN_ID_SCROLL, rpc_url: "https://rpc.scroll.io" },
    Chain { name: "gnosis", id: CHAIN_ID_GNOSIS, rpc_url: "https://rpc.gnosischain.com" },
];

/// Look up a chain by name (case-insensitive) or by decimal chain id.
///
/// ```
/// use slotscan_common::ether::chains::find_chain;
///
/// assert_eq!(find_chain("Ethereum").map(|c| c.id), Some(1));
/// assert_eq!(find_chain("8453").map(|c| c.name), Some("base"));
/// assert!(find_chain("goerli").is_none());
/// ```
pub fn find_chain(query: &str) -> Option<&'static Chain> {
    let query = query.trim();
    if CHAIN_ID_REGEX.is_match(query).unwrap_or(false) {
        let id = query.parse::<u64>().ok()?;
        return CHAINS.iter().find(|chain| chain.id == id);
    }

    CHAINS.iter().find(|chain| chain.name.eq_ignore_ascii_case(query))
}

//! Chain/asset rules and slug generation for the payments subsystem.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Blockchain networks a wallet can live on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chain {
    #[serde(rename = "ETH_MAINNET")]
    EthMainnet,
}

impl Chain {
    /// Database/string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Chain::EthMainnet => "ETH_MAINNET",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ETH_MAINNET" => Some(Chain::EthMainnet),
            _ => None,
        }
    }
}

/// Assets accepted on a payment link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "USDT")]
    Usdt,
}

impl Asset {
    pub fn as_str(self) -> &'static str {
        match self {
            Asset::Eth => "ETH",
            Asset::Usdt => "USDT",
        }
    }
}

/// Whether an asset may be billed on the given chain.
pub fn asset_supported(chain: Chain, asset: Asset) -> bool {
    match chain {
        Chain::EthMainnet => matches!(asset, Asset::Eth | Asset::Usdt),
    }
}

/// Number of random bytes in a payment-link slug (64 bits is plenty for a
/// non-secret public identifier).
const SLUG_BYTES: usize = 8;

/// Generate a random URL slug for a payment link.
pub fn generate_slug() -> String {
    let mut bytes = [0u8; SLUG_BYTES];
    rand::rng().fill(&mut bytes[..]);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Validate an EVM wallet address (`0x` + 40 hex digits).
pub fn validate_address(address: &str) -> bool {
    let Some(hex) = address.strip_prefix("0x") else {
        return false;
    };
    hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

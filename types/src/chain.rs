//! Heterogeneous chain identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Identifies which heterogeneous chain a converter component watches.
///
/// Each chain keeps its bridge bookkeeping in its own storage area so that
/// records of different chains never share keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainId {
    /// Ethereum mainnet.
    Ethereum,
    /// BNB Smart Chain.
    Bsc,
    /// Polygon PoS.
    Polygon,
}

impl ChainId {
    pub const ALL: [ChainId; 3] = [Self::Ethereum, Self::Bsc, Self::Polygon];

    /// Short lowercase symbol.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "eth",
            Self::Bsc => "bsc",
            Self::Polygon => "polygon",
        }
    }

    /// Name of the storage area holding this chain's converter records.
    pub fn storage_area(&self) -> &'static str {
        match self {
            Self::Ethereum => "cv_eth",
            Self::Bsc => "cv_bsc",
            Self::Polygon => "cv_polygon",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eth" | "ethereum" => Ok(Self::Ethereum),
            "bsc" => Ok(Self::Bsc),
            "polygon" | "matic" => Ok(Self::Polygon),
            _ => Err(TypesError::UnknownChain(s.to_string())),
        }
    }
}

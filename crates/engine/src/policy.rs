//! Tunable choices in how a corrected quote is assembled.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output of a sale that only crosses the taxed pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SingleHopPolicy {
    /// Constant-product output against live reserves after both fees.
    #[default]
    ReserveDerived,
    /// Keep the router's naive amount even though it ignores the transfer tax.
    NaiveRouter,
}

/// Stable flag written into the emitted router hops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HopStability {
    /// Every hop is priced as a volatile pool.
    #[default]
    ForceVolatile,
    /// Each hop keeps the flag of the pool the route finder picked.
    FromPool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionPolicy {
    pub single_hop: SingleHopPolicy,
    pub hop_stability: HopStability,
}

impl SingleHopPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReserveDerived => "reserve-derived",
            Self::NaiveRouter => "naive-router",
        }
    }
}

impl HopStability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForceVolatile => "force-volatile",
            Self::FromPool => "from-pool",
        }
    }
}

impl FromStr for SingleHopPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reserve-derived" => Ok(Self::ReserveDerived),
            "naive-router" => Ok(Self::NaiveRouter),
            other => Err(format!(
                "unknown single-hop policy '{other}' (expected reserve-derived or naive-router)"
            )),
        }
    }
}

impl FromStr for HopStability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "force-volatile" => Ok(Self::ForceVolatile),
            "from-pool" => Ok(Self::FromPool),
            other => Err(format!(
                "unknown hop stability '{other}' (expected force-volatile or from-pool)"
            )),
        }
    }
}

impl fmt::Display for SingleHopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HopStability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

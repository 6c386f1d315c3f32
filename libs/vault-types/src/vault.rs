use soroban_sdk::{contracttype, Address};

/// Immutable vault identity - fixed at initialization
#[contracttype]
#[derive(Clone, Debug)]
pub struct VaultConfig {
    /// Concentrated-liquidity pool the vault deploys into
    pub pool: Address,
    /// Token0 address (lower address)
    pub token0: Address,
    /// Token1 address (higher address)
    pub token1: Address,
    /// Pool fee tier in hundredths of bps
    pub fee: u32,
    /// Tick spacing of the pool
    pub tick_spacing: i32,
}

/// A deployment range: two tick bounds on the pool's price grid.
/// Only ever mutated by rebalance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Range {
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl Range {
    /// Zero-width placeholder used before the first rebalance
    pub fn empty() -> Self {
        Self {
            tick_lower: 0,
            tick_upper: 0,
        }
    }

    /// A range can hold liquidity only once it has positive width
    pub fn is_set(&self) -> bool {
        self.tick_lower < self.tick_upper
    }
}

/// Ceilings on post-deposit vault totals, per token
#[contracttype]
#[derive(Clone, Debug)]
pub struct DepositCaps {
    pub max0: u128,
    pub max1: u128,
}

/// External price feed configuration for the deposit gate
#[contracttype]
#[derive(Clone, Debug)]
pub struct OracleConfig {
    /// Feed contract exposing get_price(token0, token1) in Q96
    pub feed: Address,
    /// Spot-vs-reference deviation at which deposits are rejected
    pub threshold_bps: u32,
}

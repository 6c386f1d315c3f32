use soroban_sdk::contracttype;

/// Price snapshot returned by the pool's `get_state`
#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolState {
    /// Current sqrt(price) as Q64.96
    pub sqrt_price_x96: u128,
    /// Current tick index
    pub tick: i32,
    /// Total liquidity currently in range
    pub liquidity: u128,
}

/// Per-range position view returned by the pool's `get_position`
#[contracttype]
#[derive(Clone, Debug, Default)]
pub struct PositionInfo {
    /// Liquidity the owner holds on this range
    pub liquidity: u128,
    /// Token0 withdrawable without burning: burned principal plus accrued fees
    pub tokens_owed_0: u128,
    /// Token1 withdrawable without burning
    pub tokens_owed_1: u128,
}

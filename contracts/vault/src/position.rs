use crate::pool;
use crate::storage::{get_base_range, get_config, get_limit_range};
use soroban_sdk::{token, Env};
use vault_types::Range;

/// Vault-held token balances not deployed into any range
pub fn idle_balances(env: &Env) -> (u128, u128) {
    let config = get_config(env);
    let here = env.current_contract_address();
    let balance0 = token::Client::new(env, &config.token0).balance(&here);
    let balance1 = token::Client::new(env, &config.token1).balance(&here);
    (balance0 as u128, balance1 as u128)
}

/// (liquidity, amount0, amount1) currently attributable to `range`, including
/// tokens owed to the vault in the pool but not yet collected.
/// A price outside the range collapses to a single-asset amount.
pub fn range_amounts(env: &Env, range: &Range) -> (u128, u128, u128) {
    if !range.is_set() {
        return (0, 0, 0);
    }

    let info = pool::position(env, range);
    let pool_state = pool::state(env);
    let sqrt_ratio_lower = vault_math::get_sqrt_ratio_at_tick(env, range.tick_lower);
    let sqrt_ratio_upper = vault_math::get_sqrt_ratio_at_tick(env, range.tick_upper);

    let (amount0, amount1) = vault_math::get_amounts_for_liquidity(
        env,
        pool_state.sqrt_price_x96,
        sqrt_ratio_lower,
        sqrt_ratio_upper,
        info.liquidity,
    );

    (
        info.liquidity,
        amount0 + info.tokens_owed_0,
        amount1 + info.tokens_owed_1,
    )
}

/// Total token amounts the vault controls: idle balances plus both ranges.
/// Read-only; every share-value computation starts from this snapshot.
pub fn total_amounts(env: &Env) -> (u128, u128) {
    let (idle0, idle1) = idle_balances(env);
    let (_, base0, base1) = range_amounts(env, &get_base_range(env));
    let (_, limit0, limit1) = range_amounts(env, &get_limit_range(env));
    (idle0 + base0 + limit0, idle1 + base1 + limit1)
}

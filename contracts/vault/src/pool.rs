use crate::storage::get_config;
use soroban_sdk::{Address, Env, IntoVal, Symbol};
use vault_types::{PoolState, PositionInfo, Range};

/// Current pool price/tick snapshot
pub fn state(env: &Env) -> PoolState {
    let pool = get_config(env).pool;
    env.invoke_contract(&pool, &Symbol::new(env, "get_state"), ().into_val(env))
}

/// Pool-side view of the vault's position on `range`
pub fn position(env: &Env, range: &Range) -> PositionInfo {
    let pool = get_config(env).pool;
    env.invoke_contract(
        &pool,
        &Symbol::new(env, "get_position"),
        (range.tick_lower, range.tick_upper).into_val(env),
    )
}

/// Add the maximal balanced liquidity fundable by the desired amounts.
///
/// # Returns
/// (liquidity, amount0_used, amount1_used)
pub fn add_liquidity(
    env: &Env,
    range: &Range,
    amount0_desired: u128,
    amount1_desired: u128,
) -> (u128, u128, u128) {
    if amount0_desired == 0 && amount1_desired == 0 {
        return (0, 0, 0);
    }

    let pool_state = state(env);
    let sqrt_ratio_lower = vault_math::get_sqrt_ratio_at_tick(env, range.tick_lower);
    let sqrt_ratio_upper = vault_math::get_sqrt_ratio_at_tick(env, range.tick_upper);

    let liquidity = vault_math::get_liquidity_for_amounts(
        env,
        pool_state.sqrt_price_x96,
        sqrt_ratio_lower,
        sqrt_ratio_upper,
        amount0_desired,
        amount1_desired,
    );
    if liquidity == 0 {
        return (0, 0, 0);
    }

    // The pool pulls the tokens from the vault
    let pool = get_config(env).pool;
    let (amount0, amount1): (u128, u128) = env.invoke_contract(
        &pool,
        &Symbol::new(env, "mint"),
        (
            env.current_contract_address(),
            range.tick_lower,
            range.tick_upper,
            liquidity,
        )
            .into_val(env),
    );

    (liquidity, amount0, amount1)
}

/// Remove liquidity from a range.
/// The pool credits principal (plus any accrued fees) to the position's
/// tokens_owed; a separate collect moves them out.
pub fn remove_liquidity(env: &Env, range: &Range, liquidity: u128) -> (u128, u128) {
    let pool = get_config(env).pool;
    env.invoke_contract(
        &pool,
        &Symbol::new(env, "burn"),
        (range.tick_lower, range.tick_upper, liquidity).into_val(env),
    )
}

/// Collect owed tokens (capped by the requested amounts) straight to `recipient`
pub fn collect(
    env: &Env,
    recipient: &Address,
    range: &Range,
    amount0_requested: u128,
    amount1_requested: u128,
) -> (u128, u128) {
    let pool = get_config(env).pool;
    env.invoke_contract(
        &pool,
        &Symbol::new(env, "collect"),
        (
            recipient.clone(),
            range.tick_lower,
            range.tick_upper,
            amount0_requested,
            amount1_requested,
        )
            .into_val(env),
    )
}

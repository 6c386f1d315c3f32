use crate::storage::{get_config, get_fee_recipient, get_protocol_fee_bps};
use crate::{pool, position};
use soroban_sdk::{token, Address, Env};
use vault_math::mul_div;
use vault_types::{Range, BPS, MAX_TICK, MIN_TICK};

/// Tick bounds must be ordered, spacing-aligned and inside the global range
pub fn validate_range(range: &Range, tick_spacing: i32) {
    if range.tick_lower >= range.tick_upper {
        panic!("tick_lower must be less than tick_upper");
    }
    if range.tick_lower < MIN_TICK {
        panic!("tick_lower too low");
    }
    if range.tick_upper > MAX_TICK {
        panic!("tick_upper too high");
    }
    if range.tick_lower % tick_spacing != 0 {
        panic!("tick_lower not on spacing");
    }
    if range.tick_upper % tick_spacing != 0 {
        panic!("tick_upper not on spacing");
    }
}

/// Burn a range's entire liquidity and sweep everything owed into the vault's
/// idle balances. Returns the fee portion of what was swept.
pub fn pull_range(env: &Env, range: &Range) -> (u128, u128) {
    if !range.is_set() {
        return (0, 0);
    }

    let info = pool::position(env, range);
    if info.liquidity == 0 && info.tokens_owed_0 == 0 && info.tokens_owed_1 == 0 {
        return (0, 0);
    }

    let (mut principal0, mut principal1) = (0u128, 0u128);
    if info.liquidity > 0 {
        let burned = pool::remove_liquidity(env, range, info.liquidity);
        principal0 = burned.0;
        principal1 = burned.1;
    }

    // The burn crystallized all pending fee accrual into tokens_owed;
    // whatever exceeds the burned principal is fees.
    let after = pool::position(env, range);
    let fees0 = after.tokens_owed_0 - principal0;
    let fees1 = after.tokens_owed_1 - principal1;

    pool::collect(
        env,
        &env.current_contract_address(),
        range,
        u128::MAX,
        u128::MAX,
    );

    (fees0, fees1)
}

/// Pay the protocol's share of collected fees to the configured recipient.
/// Returns the amounts paid out.
pub fn split_fees(env: &Env, fees0: u128, fees1: u128) -> (u128, u128) {
    let recipient = match get_fee_recipient(env) {
        Some(recipient) => recipient,
        None => return (0, 0),
    };
    let rate = get_protocol_fee_bps(env) as u128;
    if rate == 0 || (fees0 == 0 && fees1 == 0) {
        return (0, 0);
    }

    let cut0 = mul_div(env, fees0, rate, BPS);
    let cut1 = mul_div(env, fees1, rate, BPS);

    let config = get_config(env);
    let here = env.current_contract_address();
    if cut0 > 0 {
        token::Client::new(env, &config.token0).transfer(&here, &recipient, &(cut0 as i128));
    }
    if cut1 > 0 {
        token::Client::new(env, &config.token1).transfer(&here, &recipient, &(cut1 as i128));
    }

    (cut0, cut1)
}

/// Deploy idle balances: maximal balanced liquidity into the base range, then
/// whatever single-sided remainder fits into the limit range. Indivisible
/// dust stays idle.
pub fn deploy_idle(env: &Env, base: &Range, limit: &Range) {
    let (idle0, idle1) = position::idle_balances(env);
    let (_, used0, used1) = pool::add_liquidity(env, base, idle0, idle1);
    pool::add_liquidity(env, limit, idle0 - used0, idle1 - used1);
}

/// Pull `shares / supply` of a range - burned principal plus the matching cut
/// of the fees the burn crystallized - directly to `recipient`. Floor
/// rounding throughout so a full-balance withdrawal can never revert.
pub fn withdraw_slice(
    env: &Env,
    range: &Range,
    shares: u128,
    supply: u128,
    recipient: &Address,
) -> (u128, u128) {
    if !range.is_set() {
        return (0, 0);
    }

    let info = pool::position(env, range);
    if info.liquidity == 0 {
        return (0, 0);
    }

    let slice = mul_div(env, info.liquidity, shares, supply);
    if slice == 0 {
        return (0, 0);
    }

    let (principal0, principal1) = pool::remove_liquidity(env, range, slice);
    let after = pool::position(env, range);
    let fee_cut0 = mul_div(env, after.tokens_owed_0 - principal0, shares, supply);
    let fee_cut1 = mul_div(env, after.tokens_owed_1 - principal1, shares, supply);

    pool::collect(
        env,
        recipient,
        range,
        principal0 + fee_cut0,
        principal1 + fee_cut1,
    )
}

use crate::pool;
use crate::storage::{
    get_caps, get_config, get_direct_deposit, get_oracle, get_ratio_tolerance, is_whitelisted,
};
use soroban_sdk::{Address, Env, IntoVal, Symbol};
use vault_math::{deviation_bps, price_x96_from_sqrt, ratio_deviation_bps};

/// When direct deposits are off, either the depositor or the share recipient
/// must be cleared.
pub fn check_whitelist(env: &Env, sender: &Address, to: &Address) {
    if get_direct_deposit(env) {
        return;
    }
    if is_whitelisted(env, sender) || is_whitelisted(env, to) {
        return;
    }
    panic!("Not whitelisted");
}

/// Post-deposit totals may not exceed the configured caps
pub fn check_caps(env: &Env, total0: u128, total1: u128, deposit0: u128, deposit1: u128) {
    let caps = get_caps(env);
    if total0 + deposit0 > caps.max0 || total1 + deposit1 > caps.max1 {
        panic!("Deposit cap exceeded");
    }
}

/// The deposit's token proportions must match the vault's current composition
/// within the configured band. Skipped while the vault is empty or holds a
/// single asset - there is no composition to match.
pub fn check_ratio(env: &Env, deposit0: u128, deposit1: u128, total0: u128, total1: u128) {
    if total0 == 0 || total1 == 0 {
        return;
    }
    let deviation = ratio_deviation_bps(env, deposit0, deposit1, total0, total1);
    if deviation > get_ratio_tolerance(env) as u128 {
        panic!("Ratio overflow");
    }
}

/// The pool's spot price must sit within the configured band around the
/// external reference. Guards share minting against a manipulated spot price.
pub fn check_oracle(env: &Env) {
    let oracle = match get_oracle(env) {
        Some(oracle) => oracle,
        None => return,
    };

    let config = get_config(env);
    let reference: u128 = env.invoke_contract(
        &oracle.feed,
        &Symbol::new(env, "get_price"),
        (config.token0, config.token1).into_val(env),
    );

    let spot = price_x96_from_sqrt(env, pool::state(env).sqrt_price_x96);
    if deviation_bps(env, spot, reference) >= oracle.threshold_bps as u128 {
        panic!("Oracle deviation");
    }
}

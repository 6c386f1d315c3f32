use crate::storage::{
    get_allowance, get_balance, get_total_supply, set_allowance, set_balance, set_total_supply,
};
use soroban_sdk::{Address, Env};

/// Mint shares to a holder
pub fn mint(env: &Env, to: &Address, amount: u128) {
    set_balance(env, to, get_balance(env, to) + amount);
    set_total_supply(env, get_total_supply(env) + amount);
}

/// Burn shares from a holder
pub fn burn(env: &Env, from: &Address, amount: u128) {
    let balance = get_balance(env, from);
    if balance < amount {
        panic!("Insufficient shares");
    }
    set_balance(env, from, balance - amount);
    set_total_supply(env, get_total_supply(env) - amount);
}

/// Move shares between holders
pub fn transfer(env: &Env, from: &Address, to: &Address, amount: u128) {
    let balance = get_balance(env, from);
    if balance < amount {
        panic!("Insufficient shares");
    }
    set_balance(env, from, balance - amount);
    set_balance(env, to, get_balance(env, to) + amount);
}

/// Consume part of a spender's allowance
pub fn spend_allowance(env: &Env, holder: &Address, spender: &Address, amount: u128) {
    let allowance = get_allowance(env, holder, spender);
    if allowance < amount {
        panic!("Insufficient allowance");
    }
    set_allowance(env, holder, spender, allowance - amount);
}

use soroban_sdk::{contracttype, Address, Env, String};
use vault_types::{DepositCaps, OracleConfig, Range, VaultConfig};

/// Default protocol share of collected trading fees (bps)
pub const DEFAULT_PROTOCOL_FEE_BPS: u32 = 1_000;

/// Default tolerance of the deposit ratio check (bps)
pub const DEFAULT_RATIO_TOLERANCE_BPS: u32 = 5_000;

/// Storage keys for the vault contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Immutable vault identity (Instance storage)
    Config,
    /// Vault owner (Instance)
    Owner,
    /// Share token name (Instance)
    Name,
    /// Share token symbol (Instance)
    Symbol,
    /// Base range bounds (Instance)
    BaseRange,
    /// Limit range bounds (Instance)
    LimitRange,
    /// Outstanding share supply (Instance)
    TotalSupply,
    /// Share balance per holder (Persistent)
    Balance(Address),
    /// Share allowance: (holder, spender) (Persistent)
    Allowance(Address, Address),
    /// Post-deposit total ceilings (Instance)
    Caps,
    /// Ratio/oracle checks are skipped while set (Instance)
    FreeDeposit,
    /// Non-whitelisted callers may deposit while set (Instance)
    DirectDeposit,
    /// Cleared depositors/proxies (Persistent)
    Whitelisted(Address),
    /// Ratio check tolerance in bps (Instance)
    RatioTolerance,
    /// Oracle feed and deviation threshold; absent = check disabled (Instance)
    Oracle,
    /// Protocol share of collected fees in bps (Instance)
    ProtocolFee,
    /// Recipient of the protocol fee share (Instance)
    FeeRecipient,
    /// Address allowed to rebalance; owner when unset (Instance)
    Rebalancer,
    /// Anyone may rebalance while set (Instance)
    OpenRebalance,
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Config ===

pub fn get_config(env: &Env) -> VaultConfig {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("Vault not initialized")
}

pub fn set_config(env: &Env, config: &VaultConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

// === Owner ===

pub fn get_owner(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .expect("Vault not initialized")
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

// === Share metadata ===

pub fn get_name(env: &Env) -> String {
    env.storage()
        .instance()
        .get(&DataKey::Name)
        .expect("Vault not initialized")
}

pub fn get_symbol(env: &Env) -> String {
    env.storage()
        .instance()
        .get(&DataKey::Symbol)
        .expect("Vault not initialized")
}

pub fn set_metadata(env: &Env, name: &String, symbol: &String) {
    env.storage().instance().set(&DataKey::Name, name);
    env.storage().instance().set(&DataKey::Symbol, symbol);
}

// === Ranges ===

pub fn get_base_range(env: &Env) -> Range {
    env.storage()
        .instance()
        .get(&DataKey::BaseRange)
        .unwrap_or_else(Range::empty)
}

pub fn set_base_range(env: &Env, range: &Range) {
    env.storage().instance().set(&DataKey::BaseRange, range);
}

pub fn get_limit_range(env: &Env) -> Range {
    env.storage()
        .instance()
        .get(&DataKey::LimitRange)
        .unwrap_or_else(Range::empty)
}

pub fn set_limit_range(env: &Env, range: &Range) {
    env.storage().instance().set(&DataKey::LimitRange, range);
}

// === Share ledger ===

pub fn get_total_supply(env: &Env) -> u128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalSupply)
        .unwrap_or(0)
}

pub fn set_total_supply(env: &Env, supply: u128) {
    env.storage().instance().set(&DataKey::TotalSupply, &supply);
}

pub fn get_balance(env: &Env, holder: &Address) -> u128 {
    let key = DataKey::Balance(holder.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_balance(env: &Env, holder: &Address, amount: u128) {
    let key = DataKey::Balance(holder.clone());
    if amount == 0 {
        // Remove empty balance entry
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &amount);
        extend_persistent_ttl(env, &key);
    }
}

pub fn get_allowance(env: &Env, holder: &Address, spender: &Address) -> u128 {
    let key = DataKey::Allowance(holder.clone(), spender.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_allowance(env: &Env, holder: &Address, spender: &Address, amount: u128) {
    let key = DataKey::Allowance(holder.clone(), spender.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &amount);
        extend_persistent_ttl(env, &key);
    }
}

// === Deposit gate configuration ===

pub fn get_caps(env: &Env) -> DepositCaps {
    env.storage()
        .instance()
        .get(&DataKey::Caps)
        .unwrap_or(DepositCaps {
            max0: u128::MAX,
            max1: u128::MAX,
        })
}

pub fn set_caps(env: &Env, caps: &DepositCaps) {
    env.storage().instance().set(&DataKey::Caps, caps);
}

pub fn get_free_deposit(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::FreeDeposit)
        .unwrap_or(false)
}

pub fn set_free_deposit(env: &Env, free: bool) {
    env.storage().instance().set(&DataKey::FreeDeposit, &free);
}

pub fn get_direct_deposit(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::DirectDeposit)
        .unwrap_or(false)
}

pub fn set_direct_deposit(env: &Env, direct: bool) {
    env.storage()
        .instance()
        .set(&DataKey::DirectDeposit, &direct);
}

pub fn is_whitelisted(env: &Env, addr: &Address) -> bool {
    let key = DataKey::Whitelisted(addr.clone());
    env.storage().persistent().get(&key).unwrap_or(false)
}

pub fn set_whitelisted(env: &Env, addr: &Address, cleared: bool) {
    let key = DataKey::Whitelisted(addr.clone());
    if cleared {
        env.storage().persistent().set(&key, &true);
        extend_persistent_ttl(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn get_ratio_tolerance(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::RatioTolerance)
        .unwrap_or(DEFAULT_RATIO_TOLERANCE_BPS)
}

pub fn set_ratio_tolerance(env: &Env, bps: u32) {
    env.storage().instance().set(&DataKey::RatioTolerance, &bps);
}

pub fn get_oracle(env: &Env) -> Option<OracleConfig> {
    env.storage().instance().get(&DataKey::Oracle)
}

pub fn set_oracle(env: &Env, oracle: &OracleConfig) {
    env.storage().instance().set(&DataKey::Oracle, oracle);
}

pub fn remove_oracle(env: &Env) {
    env.storage().instance().remove(&DataKey::Oracle);
}

// === Fee split configuration ===

pub fn get_protocol_fee_bps(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::ProtocolFee)
        .unwrap_or(DEFAULT_PROTOCOL_FEE_BPS)
}

pub fn set_protocol_fee_bps(env: &Env, bps: u32) {
    env.storage().instance().set(&DataKey::ProtocolFee, &bps);
}

pub fn get_fee_recipient(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::FeeRecipient)
}

pub fn set_fee_recipient(env: &Env, recipient: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::FeeRecipient, recipient);
}

// === Rebalance privilege ===

pub fn get_rebalancer(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Rebalancer)
        .unwrap_or_else(|| get_owner(env))
}

pub fn set_rebalancer(env: &Env, rebalancer: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::Rebalancer, rebalancer);
}

pub fn get_open_rebalance(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::OpenRebalance)
        .unwrap_or(false)
}

pub fn set_open_rebalance(env: &Env, open: bool) {
    env.storage().instance().set(&DataKey::OpenRebalance, &open);
}

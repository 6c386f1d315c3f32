#![no_std]

mod gate;
mod pool;
mod position;
mod rebalance;
mod shares;
mod storage;


use soroban_sdk::{contract, contractimpl, token, Address, Env, String, Symbol};
use storage::{
    get_balance, get_base_range, get_caps, get_config, get_direct_deposit, get_fee_recipient,
    get_free_deposit, get_limit_range, get_name, get_open_rebalance, get_oracle, get_owner,
    get_protocol_fee_bps, get_ratio_tolerance, get_rebalancer, get_symbol, get_total_supply,
    has_config, is_whitelisted, set_allowance, set_base_range, set_caps, set_config,
    set_direct_deposit, set_fee_recipient, set_free_deposit, set_limit_range, set_metadata,
    set_open_rebalance, set_oracle, set_owner, set_protocol_fee_bps, set_ratio_tolerance,
    set_rebalancer, set_whitelisted, remove_oracle,
};
use vault_types::{DepositCaps, OracleConfig, Range, VaultConfig, BPS};

#[contract]
pub struct Vault;

#[contractimpl]
impl Vault {
    /// Initialize the vault over an existing pool.
    /// Deposits start ungated (free) so the owner can bootstrap liquidity and
    /// run the first rebalance before arming the checks.
    pub fn initialize(
        env: Env,
        pool: Address,
        token0: Address,
        token1: Address,
        fee: u32,
        tick_spacing: i32,
        owner: Address,
        name: String,
        symbol: String,
    ) {
        if has_config(&env) {
            panic!("Already initialized");
        }
        if token0 >= token1 {
            panic!("token0 must be less than token1");
        }
        if tick_spacing <= 0 {
            panic!("Invalid tick spacing");
        }

        set_config(
            &env,
            &VaultConfig {
                pool,
                token0,
                token1,
                fee,
                tick_spacing,
            },
        );
        set_owner(&env, &owner);
        set_metadata(&env, &name, &symbol);
        set_base_range(&env, &Range::empty());
        set_limit_range(&env, &Range::empty());
        set_free_deposit(&env, true);
        set_direct_deposit(&env, true);
    }

    /// Deposit tokens into the vault and mint shares to `to`.
    ///
    /// # Returns
    /// Shares minted
    pub fn deposit(env: Env, sender: Address, deposit0: u128, deposit1: u128, to: Address) -> u128 {
        sender.require_auth();

        if deposit0 == 0 && deposit1 == 0 {
            panic!("Zero deposit");
        }
        gate::check_whitelist(&env, &sender, &to);

        // Value snapshot before the deposit is credited
        let (total0, total1) = position::total_amounts(&env);
        gate::check_caps(&env, total0, total1, deposit0, deposit1);

        if !get_free_deposit(&env) {
            gate::check_ratio(&env, deposit0, deposit1, total0, total1);
            gate::check_oracle(&env);
        }

        let supply = get_total_supply(&env);
        let shares = if supply == 0 {
            // Bootstrap rule: the raw sum of both deposits sets the initial
            // share price. Assumes comparable token scales; kept as-is.
            deposit0 + deposit1
        } else if total0 > 0 {
            // Token0 is the unit of account; the ratio check validates the
            // token1 side rather than pricing it
            vault_math::mul_div(&env, supply, deposit0, total0)
        } else {
            vault_math::mul_div(&env, supply, deposit1, total1)
        };
        if shares == 0 {
            // A deposit too small to mint a share would be a donation
            panic!("Zero shares");
        }

        let config = get_config(&env);
        let here = env.current_contract_address();
        if deposit0 > 0 {
            token::Client::new(&env, &config.token0).transfer(
                &sender,
                &here,
                &(deposit0 as i128),
            );
        }
        if deposit1 > 0 {
            token::Client::new(&env, &config.token1).transfer(
                &sender,
                &here,
                &(deposit1 as i128),
            );
        }

        shares::mint(&env, &to, shares);

        let (new_total0, new_total1) = position::total_amounts(&env);
        env.events().publish(
            (Symbol::new(&env, "deposit"),),
            (sender, to, deposit0, deposit1, shares, new_total0, new_total1),
        );

        shares
    }

    /// Burn `shares` of `from` and pay out the matching slice of everything
    /// the vault holds - idle balances, both ranges, and the fee share those
    /// ranges have accrued - to `to`.
    ///
    /// # Returns
    /// (amount0, amount1) paid out
    pub fn withdraw(
        env: Env,
        sender: Address,
        shares: u128,
        to: Address,
        from: Address,
    ) -> (u128, u128) {
        sender.require_auth();

        if shares == 0 {
            panic!("Zero shares");
        }
        if sender != from {
            shares::spend_allowance(&env, &from, &sender, shares);
        }
        if get_balance(&env, &from) < shares {
            panic!("Insufficient shares");
        }

        let supply = get_total_supply(&env);

        let (base0, base1) =
            rebalance::withdraw_slice(&env, &get_base_range(&env), shares, supply, &to);
        let (limit0, limit1) =
            rebalance::withdraw_slice(&env, &get_limit_range(&env), shares, supply, &to);

        // Pro-rata idle balances, rounded down in the vault's favor
        let (idle0, idle1) = position::idle_balances(&env);
        let idle_cut0 = vault_math::mul_div(&env, idle0, shares, supply);
        let idle_cut1 = vault_math::mul_div(&env, idle1, shares, supply);

        let config = get_config(&env);
        let here = env.current_contract_address();
        if idle_cut0 > 0 {
            token::Client::new(&env, &config.token0).transfer(&here, &to, &(idle_cut0 as i128));
        }
        if idle_cut1 > 0 {
            token::Client::new(&env, &config.token1).transfer(&here, &to, &(idle_cut1 as i128));
        }

        shares::burn(&env, &from, shares);

        let amount0 = base0 + limit0 + idle_cut0;
        let amount1 = base1 + limit1 + idle_cut1;

        let (new_total0, new_total1) = position::total_amounts(&env);
        env.events().publish(
            (Symbol::new(&env, "withdraw"),),
            (sender, to, from, amount0, amount1, shares, new_total0, new_total1),
        );

        (amount0, amount1)
    }

    /// Migrate all liquidity to the caller-supplied ranges: pull both ranges
    /// into idle balances, pay the protocol's cut of the collected fees,
    /// then redeposit into the new base and limit ranges. Range selection
    /// policy lives off-chain; the engine only validates the bounds.
    pub fn rebalance(
        env: Env,
        base_lower: i32,
        base_upper: i32,
        limit_lower: i32,
        limit_upper: i32,
    ) {
        if !get_open_rebalance(&env) {
            get_rebalancer(&env).require_auth();
        }

        let config = get_config(&env);
        let base = Range {
            tick_lower: base_lower,
            tick_upper: base_upper,
        };
        let limit = Range {
            tick_lower: limit_lower,
            tick_upper: limit_upper,
        };
        rebalance::validate_range(&base, config.tick_spacing);
        rebalance::validate_range(&limit, config.tick_spacing);

        let (base_fees0, base_fees1) = rebalance::pull_range(&env, &get_base_range(&env));
        let (limit_fees0, limit_fees1) = rebalance::pull_range(&env, &get_limit_range(&env));
        let fees0 = base_fees0 + limit_fees0;
        let fees1 = base_fees1 + limit_fees1;

        rebalance::split_fees(&env, fees0, fees1);

        rebalance::deploy_idle(&env, &base, &limit);
        set_base_range(&env, &base);
        set_limit_range(&env, &limit);

        let tick = pool::state(&env).tick;
        let (total0, total1) = position::total_amounts(&env);
        env.events().publish(
            (Symbol::new(&env, "rebalance"),),
            (
                base,
                limit,
                tick,
                total0,
                total1,
                fees0,
                fees1,
                get_total_supply(&env),
            ),
        );
    }

    // === Vault views ===

    /// Total amounts the vault controls, fees included
    pub fn get_total_amounts(env: Env) -> (u128, u128) {
        position::total_amounts(&env)
    }

    /// (liquidity, amount0, amount1) of the base range
    pub fn get_base_position(env: Env) -> (u128, u128, u128) {
        position::range_amounts(&env, &get_base_range(&env))
    }

    /// (liquidity, amount0, amount1) of the limit range
    pub fn get_limit_position(env: Env) -> (u128, u128, u128) {
        position::range_amounts(&env, &get_limit_range(&env))
    }

    /// Current pool tick
    pub fn current_tick(env: Env) -> i32 {
        pool::state(&env).tick
    }

    /// Vault identity
    pub fn get_config(env: Env) -> VaultConfig {
        get_config(&env)
    }

    /// Base range bounds
    pub fn get_base_range(env: Env) -> Range {
        get_base_range(&env)
    }

    /// Limit range bounds
    pub fn get_limit_range(env: Env) -> Range {
        get_limit_range(&env)
    }

    pub fn get_owner(env: Env) -> Address {
        get_owner(&env)
    }

    pub fn get_fee_recipient(env: Env) -> Option<Address> {
        get_fee_recipient(&env)
    }

    pub fn get_protocol_fee_bps(env: Env) -> u32 {
        get_protocol_fee_bps(&env)
    }

    pub fn get_ratio_tolerance(env: Env) -> u32 {
        get_ratio_tolerance(&env)
    }

    pub fn get_oracle(env: Env) -> Option<OracleConfig> {
        get_oracle(&env)
    }

    pub fn get_caps(env: Env) -> DepositCaps {
        get_caps(&env)
    }

    pub fn is_free_deposit(env: Env) -> bool {
        get_free_deposit(&env)
    }

    pub fn is_direct_deposit(env: Env) -> bool {
        get_direct_deposit(&env)
    }

    pub fn is_whitelisted(env: Env, addr: Address) -> bool {
        is_whitelisted(&env, &addr)
    }

    pub fn get_rebalancer(env: Env) -> Address {
        get_rebalancer(&env)
    }

    pub fn is_open_rebalance(env: Env) -> bool {
        get_open_rebalance(&env)
    }

    // === Share token ===

    pub fn total_supply(env: Env) -> u128 {
        get_total_supply(&env)
    }

    pub fn balance(env: Env, id: Address) -> u128 {
        get_balance(&env, &id)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: u128) {
        from.require_auth();
        shares::transfer(&env, &from, &to, amount);
        env.events()
            .publish((Symbol::new(&env, "transfer"),), (from, to, amount));
    }

    pub fn approve(env: Env, from: Address, spender: Address, amount: u128) {
        from.require_auth();
        set_allowance(&env, &from, &spender, amount);
        env.events()
            .publish((Symbol::new(&env, "approval"),), (from, spender, amount));
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> u128 {
        storage::get_allowance(&env, &from, &spender)
    }

    pub fn transfer_from(env: Env, spender: Address, from: Address, to: Address, amount: u128) {
        spender.require_auth();
        shares::spend_allowance(&env, &from, &spender, amount);
        shares::transfer(&env, &from, &to, amount);
        env.events()
            .publish((Symbol::new(&env, "transfer"),), (from, to, amount));
    }

    pub fn name(env: Env) -> String {
        get_name(&env)
    }

    pub fn symbol(env: Env) -> String {
        get_symbol(&env)
    }

    // === Owner configuration ===

    /// Ceilings on post-deposit totals
    pub fn set_deposit_max(env: Env, max0: u128, max1: u128) {
        get_owner(&env).require_auth();
        set_caps(&env, &DepositCaps { max0, max1 });
    }

    /// Arm or disarm the ratio and oracle checks
    pub fn toggle_free_deposit(env: Env) {
        get_owner(&env).require_auth();
        let free = get_free_deposit(&env);
        set_free_deposit(&env, !free);
    }

    /// Allow or restrict deposits from non-whitelisted callers
    pub fn toggle_direct_deposit(env: Env) {
        get_owner(&env).require_auth();
        let direct = get_direct_deposit(&env);
        set_direct_deposit(&env, !direct);
    }

    pub fn set_whitelist(env: Env, addr: Address) {
        get_owner(&env).require_auth();
        set_whitelisted(&env, &addr, true);
    }

    pub fn remove_whitelist(env: Env, addr: Address) {
        get_owner(&env).require_auth();
        set_whitelisted(&env, &addr, false);
    }

    pub fn set_ratio_tolerance(env: Env, bps: u32) {
        get_owner(&env).require_auth();
        if bps as u128 > BPS {
            panic!("Invalid tolerance");
        }
        set_ratio_tolerance(&env, bps);
    }

    pub fn set_oracle(env: Env, feed: Address, threshold_bps: u32) {
        get_owner(&env).require_auth();
        if threshold_bps == 0 || threshold_bps as u128 > BPS {
            panic!("Invalid threshold");
        }
        set_oracle(
            &env,
            &OracleConfig {
                feed,
                threshold_bps,
            },
        );
    }

    pub fn clear_oracle(env: Env) {
        get_owner(&env).require_auth();
        remove_oracle(&env);
    }

    pub fn set_fee_recipient(env: Env, recipient: Address) {
        get_owner(&env).require_auth();
        set_fee_recipient(&env, &recipient);
    }

    pub fn set_protocol_fee(env: Env, bps: u32) {
        get_owner(&env).require_auth();
        if bps as u128 > BPS {
            panic!("Fee too high");
        }
        set_protocol_fee_bps(&env, bps);
    }

    pub fn set_rebalancer(env: Env, rebalancer: Address) {
        get_owner(&env).require_auth();
        set_rebalancer(&env, &rebalancer);
    }

    /// Leave rebalancing permissionless (or claw it back)
    pub fn toggle_open_rebalance(env: Env) {
        get_owner(&env).require_auth();
        let open = get_open_rebalance(&env);
        set_open_rebalance(&env, !open);
    }

    pub fn transfer_ownership(env: Env, new_owner: Address) {
        get_owner(&env).require_auth();
        set_owner(&env, &new_owner);
    }
}

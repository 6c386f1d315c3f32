#![no_std]

use soroban_sdk::{
    contract, contractimpl, contracttype, Address, BytesN, Env, IntoVal, String, Symbol, Vec,
};

#[contract]
pub struct VaultFactory;

/// Storage keys for the factory contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Admin address
    Admin,
    /// Vault WASM hash for deployment
    VaultWasmHash,
    /// DEX factory used to resolve pools
    DexFactory,
    /// (token0, token1, fee) -> vault address
    Vault(Address, Address, u32),
    /// Total number of vaults created (counter for indexed storage)
    VaultCount,
    /// Vault address at index (indexed storage to avoid unbounded Vec)
    VaultAt(u32),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

#[contractimpl]
impl VaultFactory {
    /// Initialize factory with admin, vault WASM hash and the DEX factory
    /// whose pools the vaults deploy into
    pub fn initialize(env: Env, admin: Address, vault_wasm_hash: BytesN<32>, dex_factory: Address) {
        if env.storage().instance().has(&DataKey::Admin) {
            panic!("Already initialized");
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::VaultWasmHash, &vault_wasm_hash);
        env.storage()
            .instance()
            .set(&DataKey::DexFactory, &dex_factory);
        env.storage().instance().set(&DataKey::VaultCount, &0u32);

        extend_instance_ttl(&env);
    }

    /// Create a new vault over the pool for the token pair and fee tier.
    /// Returns the vault contract address.
    pub fn create_vault(
        env: Env,
        token_a: Address,
        token_b: Address,
        fee: u32,
        name: String,
        symbol: String,
    ) -> Address {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .expect("Not initialized");
        admin.require_auth();

        // Sort tokens
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        if token0 == token1 {
            panic!("Identical tokens");
        }

        // One vault per (token0, token1, fee)
        let vault_key = DataKey::Vault(token0.clone(), token1.clone(), fee);
        if env.storage().persistent().has(&vault_key) {
            panic!("Vault already exists");
        }

        // Resolve the pool from the DEX factory
        let dex_factory: Address = env
            .storage()
            .instance()
            .get(&DataKey::DexFactory)
            .expect("Not initialized");
        let pool: Option<Address> = env.invoke_contract(
            &dex_factory,
            &Symbol::new(&env, "get_pool"),
            (token0.clone(), token1.clone(), fee).into_val(&env),
        );
        let pool = pool.expect("Pool not found");

        let tick_spacing: i32 =
            env.invoke_contract(&pool, &Symbol::new(&env, "tick_spacing"), ().into_val(&env));

        let vault_wasm_hash: BytesN<32> = env
            .storage()
            .instance()
            .get(&DataKey::VaultWasmHash)
            .expect("Not initialized");

        let vault_count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::VaultCount)
            .unwrap_or(0);

        // Deterministic salt from vault count + fee
        let mut salt_bytes = [0u8; 32];
        salt_bytes[0..4].copy_from_slice(&vault_count.to_be_bytes());
        salt_bytes[4..8].copy_from_slice(&fee.to_be_bytes());
        let salt = BytesN::from_array(&env, &salt_bytes);

        let vault_address = env
            .deployer()
            .with_current_contract(salt)
            .deploy_v2(vault_wasm_hash, ());

        init_vault(
            &env,
            &vault_address,
            &pool,
            &token0,
            &token1,
            fee,
            tick_spacing,
            &admin,
            &name,
            &symbol,
        );

        // Index by token pair and by position
        env.storage().persistent().set(&vault_key, &vault_address);
        extend_persistent_ttl(&env, &vault_key);

        let vault_at_key = DataKey::VaultAt(vault_count);
        env.storage().persistent().set(&vault_at_key, &vault_address);
        extend_persistent_ttl(&env, &vault_at_key);

        env.storage()
            .instance()
            .set(&DataKey::VaultCount, &(vault_count + 1));

        env.events().publish(
            (Symbol::new(&env, "vault_created"),),
            (token0, token1, fee, vault_address.clone()),
        );

        extend_instance_ttl(&env);
        vault_address
    }

    /// Get vault address for token pair and fee
    pub fn get_vault(env: Env, token_a: Address, token_b: Address, fee: u32) -> Option<Address> {
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        env.storage()
            .persistent()
            .get(&DataKey::Vault(token0, token1, fee))
    }

    /// Get total number of vaults created
    pub fn get_vault_count(env: Env) -> u32 {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::VaultCount)
            .unwrap_or(0)
    }

    /// Get vault address at specific index
    pub fn get_vault_at(env: Env, index: u32) -> Option<Address> {
        env.storage().persistent().get(&DataKey::VaultAt(index))
    }

    /// Get vaults with pagination.
    /// Returns up to `limit` vaults starting from `start_index`;
    /// capped at 50 entries to stay within Soroban's read entry limits.
    pub fn get_vaults_paginated(env: Env, start_index: u32, limit: u32) -> Vec<Address> {
        let safe_limit = if limit > 50 { 50 } else { limit };

        let vault_count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::VaultCount)
            .unwrap_or(0);

        let mut vaults: Vec<Address> = Vec::new(&env);

        let end_index = if start_index + safe_limit > vault_count {
            vault_count
        } else {
            start_index + safe_limit
        };

        for i in start_index..end_index {
            if let Some(vault) = env.storage().persistent().get(&DataKey::VaultAt(i)) {
                vaults.push_back(vault);
            }
        }

        vaults
    }

    /// Get admin address
    pub fn get_admin(env: Env) -> Address {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .expect("Not initialized")
    }

    /// Hand the factory over to a new admin
    pub fn set_admin(env: Env, new_admin: Address) {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .expect("Not initialized");
        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &new_admin);
        extend_instance_ttl(&env);
    }

    /// Get DEX factory address
    pub fn get_dex_factory(env: Env) -> Address {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::DexFactory)
            .expect("Not initialized")
    }

    /// Get vault WASM hash
    pub fn get_vault_wasm_hash(env: Env) -> BytesN<32> {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::VaultWasmHash)
            .expect("Not initialized")
    }
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// Vault initialization via invoke
#[allow(clippy::too_many_arguments)]
fn init_vault(
    env: &Env,
    vault_address: &Address,
    pool: &Address,
    token0: &Address,
    token1: &Address,
    fee: u32,
    tick_spacing: i32,
    owner: &Address,
    name: &String,
    symbol: &String,
) {
    env.invoke_contract::<()>(
        vault_address,
        &Symbol::new(env, "initialize"),
        (
            pool,
            token0,
            token1,
            fee,
            tick_spacing,
            owner,
            name.clone(),
            symbol.clone(),
        )
            .into_val(env),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::{Address, BytesN, Env};

    fn setup() -> (Env, Address, Address, Address) {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);
        let dex_factory = Address::generate(&env);
        let contract_id = env.register(VaultFactory, ());

        let wasm_hash = BytesN::from_array(&env, &[7u8; 32]);
        VaultFactoryClient::new(&env, &contract_id).initialize(&admin, &wasm_hash, &dex_factory);

        (env, admin, dex_factory, contract_id)
    }

    #[test]
    fn test_initialize_factory() {
        let (env, admin, dex_factory, contract_id) = setup();
        let client = VaultFactoryClient::new(&env, &contract_id);

        assert_eq!(client.get_admin(), admin);
        assert_eq!(client.get_dex_factory(), dex_factory);
        assert_eq!(
            client.get_vault_wasm_hash(),
            BytesN::from_array(&env, &[7u8; 32])
        );
        assert_eq!(client.get_vault_count(), 0);
    }

    #[test]
    #[should_panic(expected = "Already initialized")]
    fn test_initialize_twice_fails() {
        let (env, admin, dex_factory, contract_id) = setup();
        let client = VaultFactoryClient::new(&env, &contract_id);

        let wasm_hash = BytesN::from_array(&env, &[7u8; 32]);
        client.initialize(&admin, &wasm_hash, &dex_factory);
    }

    #[test]
    fn test_get_vault_not_exists() {
        let (env, _, _, contract_id) = setup();
        let client = VaultFactoryClient::new(&env, &contract_id);

        let token0 = Address::generate(&env);
        let token1 = Address::generate(&env);
        assert!(client.get_vault(&token0, &token1, &3000).is_none());
    }

    #[test]
    fn test_get_vault_token_order_invariant() {
        let (env, _, _, contract_id) = setup();
        let client = VaultFactoryClient::new(&env, &contract_id);

        let token_a = Address::generate(&env);
        let token_b = Address::generate(&env);

        // Querying with either order resolves the same entry
        let vault_ab = client.get_vault(&token_a, &token_b, &3000);
        let vault_ba = client.get_vault(&token_b, &token_a, &3000);
        assert_eq!(vault_ab, vault_ba);
    }

    #[test]
    fn test_set_admin() {
        let (env, _, _, contract_id) = setup();
        let client = VaultFactoryClient::new(&env, &contract_id);

        let new_admin = Address::generate(&env);
        client.set_admin(&new_admin);
        assert_eq!(client.get_admin(), new_admin);
    }

    #[test]
    fn test_count_and_pagination_empty() {
        let (env, _, _, contract_id) = setup();
        let client = VaultFactoryClient::new(&env, &contract_id);

        assert_eq!(client.get_vault_count(), 0);
        assert!(client.get_vault_at(&0).is_none());
        assert_eq!(client.get_vaults_paginated(&0, &10).len(), 0);
    }
}

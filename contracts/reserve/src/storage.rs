//! Storage keys and helpers for the Reserve contract

use soroban_sdk::{contracttype, Address, Env};

use crate::error::ReserveError;
use crate::types::{ReserveConfig, ReserveState, RoyaltyPools};

/// Extend the instance once fewer than this many ledgers remain
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
/// Instance lifetime after an extension, roughly 5 days
pub const INSTANCE_BUMP_AMOUNT: u32 = 86_400;

/// Storage keys for the reserve contract (all instance storage)
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Current owner, normally the governor contract
    Owner,
    /// Membership ledger contract
    Ledger,
    /// Native asset contract holding the pool
    Native,
    /// Primary and secondary royalty pools
    RoyaltyPools,
    /// Migration bounty configuration
    Config,
    /// Versioned migration state
    State,
    /// Gas governor address set by the owner
    Governor,
}

// ============================================================================
// Initialization Helpers
// ============================================================================

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn require_initialized(env: &Env) -> Result<(), ReserveError> {
    if !is_initialized(env) {
        return Err(ReserveError::NotInitialized);
    }
    Ok(())
}

/// Keep roles, collaborators and migration state alive
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// ============================================================================
// Role Helpers
// ============================================================================

pub fn get_owner(env: &Env) -> Result<Address, ReserveError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(ReserveError::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_governor(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Governor)
}

pub fn set_governor(env: &Env, governor: &Address) {
    env.storage().instance().set(&DataKey::Governor, governor);
}

// ============================================================================
// Collaborator Helpers
// ============================================================================

pub fn get_ledger(env: &Env) -> Result<Address, ReserveError> {
    env.storage()
        .instance()
        .get(&DataKey::Ledger)
        .ok_or(ReserveError::NotInitialized)
}

pub fn set_ledger(env: &Env, ledger: &Address) {
    env.storage().instance().set(&DataKey::Ledger, ledger);
}

pub fn get_native(env: &Env) -> Result<Address, ReserveError> {
    env.storage()
        .instance()
        .get(&DataKey::Native)
        .ok_or(ReserveError::NotInitialized)
}

pub fn set_native(env: &Env, native: &Address) {
    env.storage().instance().set(&DataKey::Native, native);
}

pub fn get_royalty_pools(env: &Env) -> Result<RoyaltyPools, ReserveError> {
    env.storage()
        .instance()
        .get(&DataKey::RoyaltyPools)
        .ok_or(ReserveError::NotInitialized)
}

pub fn set_royalty_pools(env: &Env, pools: &RoyaltyPools) {
    env.storage().instance().set(&DataKey::RoyaltyPools, pools);
}

// ============================================================================
// Configuration & State Helpers
// ============================================================================

pub fn get_config(env: &Env) -> Result<ReserveConfig, ReserveError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(ReserveError::NotInitialized)
}

pub fn set_config(env: &Env, config: &ReserveConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_state(env: &Env) -> Result<ReserveState, ReserveError> {
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(ReserveError::NotInitialized)
}

pub fn set_state(env: &Env, state: &ReserveState) {
    env.storage().instance().set(&DataKey::State, state);
}

//! Storage keys and helpers for the MultiTool contract

use soroban_sdk::{contracttype, Address, Env};

use crate::error::MultiToolError;

pub const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
pub const INSTANCE_BUMP_AMOUNT: u32 = 86_400;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Membership ledger minted from (instance storage)
    Ledger,
    /// Reserve that takes recycled tokens (instance storage)
    Reserve,
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Ledger)
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn set_targets(env: &Env, ledger: &Address, reserve: &Address) {
    let storage = env.storage().instance();
    storage.set(&DataKey::Ledger, ledger);
    storage.set(&DataKey::Reserve, reserve);
}

pub fn get_ledger(env: &Env) -> Result<Address, MultiToolError> {
    env.storage()
        .instance()
        .get(&DataKey::Ledger)
        .ok_or(MultiToolError::NotInitialized)
}

pub fn get_reserve(env: &Env) -> Result<Address, MultiToolError> {
    env.storage()
        .instance()
        .get(&DataKey::Reserve)
        .ok_or(MultiToolError::NotInitialized)
}

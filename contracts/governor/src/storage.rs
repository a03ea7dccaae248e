//! Storage keys and helpers for the Governor contract

use soroban_sdk::{contracttype, Address, Env};

use crate::error::GovernorError;
use crate::types::{GovernorConfig, Proposal};

/// Roughly 30 days of ledgers at 5s close time
pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;
/// Extend the instance once fewer than this many ledgers remain
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
/// Instance lifetime after an extension, roughly 5 days
pub const INSTANCE_BUMP_AMOUNT: u32 = 86_400;

/// Storage keys for the governor contract
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Governor owner, the only proposer (instance storage)
    Owner,
    /// Quorum and voting window configuration (instance storage)
    Config,
    /// Managed membership ledger (instance storage)
    Ledger,
    /// Managed descriptor (instance storage)
    Descriptor,
    /// Managed reserve (instance storage)
    Reserve,
    /// Optional gas rebate source (instance storage)
    GasRebate,
    /// Current proposal period, 0 before the first proposal (instance storage)
    Period,
    /// Candidate of the current period's proposal (instance storage)
    Current,
    /// Set once a proposal passes (instance storage)
    Locked,
    /// Set once `do_upgrade` has run (instance storage)
    Upgraded,
    /// Proposal for a candidate in a period (persistent storage)
    Proposal(Address, u32),
    /// Vote flag for a voter on a candidate in a period (persistent storage)
    Voted(Address, u32, Address),
}

// ============================================================================
// Initialization Helpers
// ============================================================================

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn require_initialized(env: &Env) -> Result<(), GovernorError> {
    if !is_initialized(env) {
        return Err(GovernorError::NotInitialized);
    }
    Ok(())
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// ============================================================================
// Role & Collaborator Helpers
// ============================================================================

pub fn get_owner(env: &Env) -> Result<Address, GovernorError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(GovernorError::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

fn get_address(env: &Env, key: &DataKey) -> Result<Address, GovernorError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(GovernorError::NotInitialized)
}

pub fn get_ledger(env: &Env) -> Result<Address, GovernorError> {
    get_address(env, &DataKey::Ledger)
}

pub fn get_descriptor(env: &Env) -> Result<Address, GovernorError> {
    get_address(env, &DataKey::Descriptor)
}

pub fn get_reserve(env: &Env) -> Result<Address, GovernorError> {
    get_address(env, &DataKey::Reserve)
}

pub fn set_managed(env: &Env, ledger: &Address, descriptor: &Address, reserve: &Address) {
    let storage = env.storage().instance();
    storage.set(&DataKey::Ledger, ledger);
    storage.set(&DataKey::Descriptor, descriptor);
    storage.set(&DataKey::Reserve, reserve);
}

pub fn get_gas_rebate(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::GasRebate)
}

pub fn set_gas_rebate(env: &Env, gas_rebate: &Address) {
    env.storage().instance().set(&DataKey::GasRebate, gas_rebate);
}

// ============================================================================
// Configuration Helpers
// ============================================================================

pub fn get_config(env: &Env) -> Result<GovernorConfig, GovernorError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(GovernorError::NotInitialized)
}

pub fn set_config(env: &Env, config: &GovernorConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

// ============================================================================
// Governance State Helpers
// ============================================================================

pub fn get_period(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::Period).unwrap_or(0)
}

pub fn set_period(env: &Env, period: u32) {
    env.storage().instance().set(&DataKey::Period, &period);
}

pub fn get_current(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Current)
}

pub fn set_current(env: &Env, candidate: &Address) {
    env.storage().instance().set(&DataKey::Current, candidate);
}

pub fn is_locked(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Locked)
        .unwrap_or(false)
}

pub fn set_locked(env: &Env) {
    env.storage().instance().set(&DataKey::Locked, &true);
}

pub fn is_upgraded(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Upgraded)
        .unwrap_or(false)
}

pub fn set_upgraded(env: &Env) {
    env.storage().instance().set(&DataKey::Upgraded, &true);
}

// ============================================================================
// Proposal Helpers
// ============================================================================

pub fn get_proposal(env: &Env, candidate: &Address, period: u32) -> Option<Proposal> {
    env.storage()
        .persistent()
        .get(&DataKey::Proposal(candidate.clone(), period))
}

pub fn set_proposal(env: &Env, proposal: &Proposal) {
    let key = DataKey::Proposal(proposal.candidate.clone(), proposal.period);
    env.storage().persistent().set(&key, proposal);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

/// The current period's proposal, if it is still awaiting settlement
pub fn get_open_proposal(env: &Env) -> Option<Proposal> {
    let candidate = get_current(env)?;
    get_proposal(env, &candidate, get_period(env)).filter(|p| !p.settled)
}

// ============================================================================
// Vote Helpers
// ============================================================================

pub fn has_voted(env: &Env, candidate: &Address, period: u32, voter: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Voted(candidate.clone(), period, voter.clone()))
}

pub fn set_voted(env: &Env, candidate: &Address, period: u32, voter: &Address) {
    let key = DataKey::Voted(candidate.clone(), period, voter.clone());
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

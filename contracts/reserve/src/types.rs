//! Data types for the Reserve contract

use soroban_sdk::{contracttype, Address};

/// Deployment parameters for the one-time migration payout
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveConfig {
    /// Recipient of the migration bounty
    pub dev_address: Address,
    /// Native amount paid to `dev_address` by `do_upgrade`
    pub dev_bounty: i128,
}

/// Versioned migration state
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveState {
    /// Logic version, bumped by the migration
    pub version: u32,
    /// Set once `do_upgrade` has run
    pub migrated: bool,
}

/// The two royalty-bearing balances swept into the pool
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoyaltyPools {
    pub primary: Address,
    pub secondary: Address,
}

//! Data types for the Governor contract

use soroban_sdk::{contracttype, Address};

/// A succession proposal naming the contract that should take over
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    /// Address that receives ownership of the managed contracts on success
    pub candidate: Address,
    /// Proposal period this entry belongs to
    pub period: u32,
    /// Timestamp when voting opened
    pub start_time: u64,
    /// First timestamp at which voting is closed
    pub end_time: u64,
    /// Minimum `for_votes`, fixed at creation from the adjusted supply
    pub quorum: u32,
    pub for_votes: u32,
    pub against_votes: u32,
    /// Whether `settle_votes` has run
    pub settled: bool,
    /// Outcome, meaningful once settled
    pub passed: bool,
}

/// Configuration for the governor contract
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernorConfig {
    /// Quorum as basis points of the adjusted supply (default: 10%)
    pub quorum_bps: u32,
    /// Length of the voting window in seconds (default: 7 days)
    pub voting_period: u64,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            quorum_bps: 1_000,
            voting_period: 7 * 24 * 60 * 60, // 7 days
        }
    }
}

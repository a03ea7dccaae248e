//! Error types for the Governor contract

use soroban_sdk::contracterror;

/// Governor contract errors
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum GovernorError {
    /// Contract has already been initialized
    AlreadyInitialized = 1,
    /// Contract has not been initialized
    NotInitialized = 2,
    /// Caller is not the governor owner
    Unauthorized = 3,
    /// The current period's proposal has not been settled
    ProposalAlreadyOpen = 4,
    /// A proposal has passed; governance is closed for good
    GovernanceLocked = 5,
    /// Candidate is a managed contract, the governor itself, or not the open proposal
    InvalidProposal = 6,
    /// Voter already voted on this proposal
    HasVoted = 7,
    /// Voting window has not ended yet
    VotingActive = 8,
    /// Voting window has ended
    VotingClosed = 9,
    /// Support must be 0 (against) or 1 (for)
    InvalidSupport = 10,
    /// Upgrade has already been performed
    AlreadyUpgraded = 11,
    /// Governor does not own the reserve
    ReserveNotOwned = 12,
    /// No gas rebate source is configured
    GasRebateNotSet = 13,
    /// Checked arithmetic overflowed
    ArithmeticOverflow = 14,
    /// Sweep target does not expose a working `withdraw_to`
    UnsupportedWithdrawable = 15,
    /// The reserve rejected its code swap or one-time migration
    ReserveMigrationFailed = 16,
}

//! Error types for the Reserve contract

use soroban_sdk::contracterror;

/// Reserve contract errors
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ReserveError {
    /// Contract has already been initialized
    AlreadyInitialized = 1,
    /// Contract has not been initialized
    NotInitialized = 2,
    /// Caller is not the reserve owner
    Unauthorized = 3,
    /// A token is not held by the caller or not approved for the reserve
    NotOwnerOrApproved = 4,
    /// Quit was called without any token ids
    NothingToQuit = 5,
    /// Adjusted supply is zero so no share can be computed
    NoSupply = 6,
    /// Sweep target does not expose a working `withdraw_to`
    UnsupportedWithdrawable = 7,
    /// One-time migration has already run
    AlreadyMigrated = 8,
    /// Pool cannot cover the developer bounty
    InsufficientReserve = 9,
    /// Developer bounty must not be negative
    InvalidBounty = 10,
    /// Checked arithmetic overflowed
    ArithmeticOverflow = 11,
}

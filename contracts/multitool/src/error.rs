//! Error types for the MultiTool contract

use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MultiToolError {
    /// Contract has already been initialized
    AlreadyInitialized = 1,
    /// Contract has not been initialized
    NotInitialized = 2,
    /// Batch size must be between 1 and `MAX_BATCH`
    InvalidAmount = 3,
    /// Ledger price rose above the caller's limit
    PriceAboveLimit = 4,
    /// Checked arithmetic overflowed
    ArithmeticOverflow = 5,
    /// Ledger refused a mint, usually for lack of funds
    MintFailed = 6,
    /// Reserve refused to take the freshly minted tokens back
    RecycleFailed = 7,
}

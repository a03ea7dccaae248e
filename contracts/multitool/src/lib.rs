#![no_std]

//! # Membership MultiTool
//!
//! Batch front end for the membership ledger and its reserve.
//!
//! - `buy_multiple` mints several tokens to the caller in one call, aborting
//!   if the ledger price moves above the caller's limit part way through
//! - `recycle_multiple` mints fresh tokens and immediately quits them into
//!   the reserve, raising the raw supply while the adjusted supply and the
//!   caller's holdings stay where they were
//!
//! Every mint is charged to the caller by the ledger itself, so the tool
//! never holds funds or tokens between calls.

use reserve_interfaces::{MembershipLedgerClient, RedeemableClient};
use soroban_sdk::{contract, contractevent, contractimpl, log, Address, Env, Vec};

mod error;
mod storage;

pub use error::MultiToolError;

/// Largest batch accepted by a single call
pub const MAX_BATCH: u32 = 40;

// ============================================================================
// Events
// ============================================================================

#[contractevent(topics = ["MultiTool", "BOUGHT"])]
pub struct MultiBought {
    #[topic]
    pub buyer: Address,
    pub amount: u32,
    pub spent: i128,
}

#[contractevent(topics = ["MultiTool", "RECYCLED"])]
pub struct Recycled {
    #[topic]
    pub caller: Address,
    pub amount: u32,
    pub spent: i128,
    pub proceeds: i128,
}

// ============================================================================
// Contract Implementation
// ============================================================================

#[contract]
pub struct MembershipMultiTool;

#[contractimpl]
impl MembershipMultiTool {
    /// Point the tool at a ledger and the reserve that backs it
    ///
    /// # Errors
    /// * `AlreadyInitialized` - Contract has already been initialized
    pub fn initialize(env: Env, ledger: Address, reserve: Address) -> Result<(), MultiToolError> {
        if storage::is_initialized(&env) {
            return Err(MultiToolError::AlreadyInitialized);
        }
        storage::set_targets(&env, &ledger, &reserve);
        storage::extend_instance_ttl(&env);
        Ok(())
    }

    /// Total cost of minting `amount` tokens at the ledger's current price
    ///
    /// # Errors
    /// * `InvalidAmount` - `amount` is zero or above `MAX_BATCH`
    pub fn quote(env: Env, amount: u32) -> Result<i128, MultiToolError> {
        check_amount(amount)?;
        let ledger = MembershipLedgerClient::new(&env, &storage::get_ledger(&env)?);
        ledger
            .price()
            .checked_mul(amount as i128)
            .ok_or(MultiToolError::ArithmeticOverflow)
    }

    /// Mint `amount` tokens to `caller`, each at no more than `max_price_per`
    ///
    /// Returns the minted ids in mint order. Any failure reverts the whole
    /// batch.
    ///
    /// # Errors
    /// * `InvalidAmount` - `amount` is zero or above `MAX_BATCH`
    /// * `PriceAboveLimit` - The price exceeded `max_price_per` before a mint
    /// * `MintFailed` - The ledger rejected a mint
    pub fn buy_multiple(
        env: Env,
        caller: Address,
        amount: u32,
        max_price_per: i128,
    ) -> Result<Vec<u32>, MultiToolError> {
        caller.require_auth();
        check_amount(amount)?;
        storage::extend_instance_ttl(&env);

        let ledger = MembershipLedgerClient::new(&env, &storage::get_ledger(&env)?);
        let (token_ids, spent) = mint_batch(&env, &ledger, &caller, amount, max_price_per)?;

        log!(&env, "multi buy", caller, amount, spent);
        MultiBought {
            buyer: caller,
            amount,
            spent,
        }
        .publish(&env);

        Ok(token_ids)
    }

    /// Mint `amount` tokens to `caller` and quit them straight into the reserve
    ///
    /// The caller must already have approved the reserve as operator on the
    /// ledger. Returns the reserve's payout for the batch.
    ///
    /// # Errors
    /// * `InvalidAmount` - `amount` is zero or above `MAX_BATCH`
    /// * `PriceAboveLimit` - The price exceeded `max_price_per` before a mint
    /// * `MintFailed` - The ledger rejected a mint
    /// * `RecycleFailed` - The reserve rejected the quit
    pub fn recycle_multiple(
        env: Env,
        caller: Address,
        amount: u32,
        max_price_per: i128,
    ) -> Result<i128, MultiToolError> {
        caller.require_auth();
        check_amount(amount)?;
        storage::extend_instance_ttl(&env);

        let ledger = MembershipLedgerClient::new(&env, &storage::get_ledger(&env)?);
        let reserve = RedeemableClient::new(&env, &storage::get_reserve(&env)?);
        let (token_ids, spent) = mint_batch(&env, &ledger, &caller, amount, max_price_per)?;

        let proceeds = match reserve.try_quit(&caller, &token_ids) {
            Ok(Ok(proceeds)) => proceeds,
            _ => return Err(MultiToolError::RecycleFailed),
        };

        log!(&env, "recycle", caller, amount, spent, proceeds);
        Recycled {
            caller,
            amount,
            spent,
            proceeds,
        }
        .publish(&env);

        Ok(proceeds)
    }

    // ========================================================================
    // Query Functions
    // ========================================================================

    pub fn ledger(env: Env) -> Result<Address, MultiToolError> {
        storage::get_ledger(&env)
    }

    pub fn reserve(env: Env) -> Result<Address, MultiToolError> {
        storage::get_reserve(&env)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn check_amount(amount: u32) -> Result<(), MultiToolError> {
    if amount == 0 || amount > MAX_BATCH {
        return Err(MultiToolError::InvalidAmount);
    }
    Ok(())
}

/// Mint `amount` tokens to `to`, re-reading the price before every mint.
/// Returns the ids and the total charged.
fn mint_batch(
    env: &Env,
    ledger: &MembershipLedgerClient,
    to: &Address,
    amount: u32,
    max_price_per: i128,
) -> Result<(Vec<u32>, i128), MultiToolError> {
    let mut token_ids = Vec::new(env);
    let mut spent: i128 = 0;

    for _ in 0..amount {
        let price = ledger.price();
        if price > max_price_per {
            return Err(MultiToolError::PriceAboveLimit);
        }
        let token_id = match ledger.try_mint(to) {
            Ok(Ok(token_id)) => token_id,
            _ => return Err(MultiToolError::MintFailed),
        };
        token_ids.push_back(token_id);
        spent = spent
            .checked_add(price)
            .ok_or(MultiToolError::ArithmeticOverflow)?;
    }

    Ok((token_ids, spent))
}

#![no_std]

//! # Membership Reserve
//!
//! Holds the native-asset pool funded by membership mints and royalty sweeps.
//! Any holder can `quit`: hand their membership tokens to the reserve and
//! receive a pro-rata share of the pool, measured against the ledger's
//! adjusted total supply.
//!
//! ## Accounting
//! - Payout per call is `pool * tokens / adjusted_supply`, computed once from
//!   the balances as they stood when the call began
//! - Division truncates, so rounding dust stays in the pool
//! - Royalty pools are swept in full on every `deposit_royalties`
//!
//! ## Ownership
//! The owner (normally the governor contract) controls the gas governor,
//! generic withdrawable sweeps, code upgrades and the one-time migration.

use reserve_interfaces::{MembershipLedgerClient, RoyaltyPoolClient, WithdrawableClient};
use soroban_sdk::{contract, contractimpl, log, token::TokenClient, Address, BytesN, Env, Vec};

mod error;
mod events;
mod storage;
mod types;

pub use error::ReserveError;
pub use types::{ReserveConfig, ReserveState, RoyaltyPools};

/// Logic version written at initialization
pub const INITIAL_VERSION: u32 = 1;

#[contract]
pub struct MembershipReserve;

#[contractimpl]
impl MembershipReserve {
    // ========================================================================
    // Initialization
    // ========================================================================

    /// Initialize the reserve
    ///
    /// # Arguments
    /// * `owner` - Address allowed to run owner-only operations
    /// * `ledger` - Membership ledger whose tokens redeem against the pool
    /// * `native` - Native asset contract the pool is held in
    /// * `primary_royalty` / `secondary_royalty` - Royalty pools swept into the reserve
    /// * `dev_address` - Recipient of the migration bounty
    /// * `dev_bounty` - Amount paid out once by `do_upgrade`
    ///
    /// # Errors
    /// * `AlreadyInitialized` - Contract has already been initialized
    /// * `InvalidBounty` - Bounty is negative
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        owner: Address,
        ledger: Address,
        native: Address,
        primary_royalty: Address,
        secondary_royalty: Address,
        dev_address: Address,
        dev_bounty: i128,
    ) -> Result<(), ReserveError> {
        if storage::is_initialized(&env) {
            return Err(ReserveError::AlreadyInitialized);
        }
        if dev_bounty < 0 {
            return Err(ReserveError::InvalidBounty);
        }

        storage::set_owner(&env, &owner);
        storage::set_ledger(&env, &ledger);
        storage::set_native(&env, &native);
        storage::set_royalty_pools(
            &env,
            &RoyaltyPools {
                primary: primary_royalty,
                secondary: secondary_royalty,
            },
        );
        storage::set_config(
            &env,
            &ReserveConfig {
                dev_address,
                dev_bounty,
            },
        );
        storage::set_state(
            &env,
            &ReserveState {
                version: INITIAL_VERSION,
                migrated: false,
            },
        );

        storage::extend_instance_ttl(&env);
        events::emit_initialized(&env, &owner, &ledger, env.ledger().timestamp());
        Ok(())
    }

    // ========================================================================
    // Member Operations
    // ========================================================================

    /// Redeem membership tokens for a pro-rata share of the pool
    ///
    /// Every id must be held by `caller` and approved for the reserve at the
    /// moment it is transferred, so passing an id twice fails on the second
    /// occurrence.
    ///
    /// # Errors
    /// * `NothingToQuit` - `token_ids` is empty
    /// * `NoSupply` - Adjusted supply is zero
    /// * `NotOwnerOrApproved` - A token is not held by the caller or not approved
    pub fn quit(env: Env, caller: Address, token_ids: Vec<u32>) -> Result<i128, ReserveError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        storage::extend_instance_ttl(&env);

        if token_ids.is_empty() {
            return Err(ReserveError::NothingToQuit);
        }

        let this = env.current_contract_address();
        let ledger = MembershipLedgerClient::new(&env, &storage::get_ledger(&env)?);
        let native = TokenClient::new(&env, &storage::get_native(&env)?);

        let supply = ledger.adjusted_total_supply();
        if supply == 0 {
            return Err(ReserveError::NoSupply);
        }
        let pool = native.balance(&this);
        let amount = pro_rata_share(pool, token_ids.len(), supply)?;

        for token_id in token_ids.iter() {
            if ledger.owner_of(&token_id) != Some(caller.clone())
                || !ledger.is_approved_or_owner(&this, &token_id)
            {
                return Err(ReserveError::NotOwnerOrApproved);
            }
            ledger.transfer_from(&this, &caller, &this, &token_id);
        }

        if amount > 0 {
            native.transfer(&this, &caller, &amount);
        }

        log!(&env, "quit payout", caller, token_ids.len(), amount);
        events::emit_quit(&env, &caller, amount);
        Ok(amount)
    }

    /// Sweep both royalty pools into the native pool. Callable by anyone.
    ///
    /// Returns the total amount swept; pools with a zero balance are skipped.
    pub fn deposit_royalties(env: Env) -> Result<i128, ReserveError> {
        storage::require_initialized(&env)?;
        storage::extend_instance_ttl(&env);
        sweep_royalties(&env)
    }

    // ========================================================================
    // Owner Operations
    // ========================================================================

    /// Set the gas governor address
    pub fn set_governor(env: Env, caller: Address, governor: Address) -> Result<(), ReserveError> {
        require_owner(&env, &caller)?;

        storage::set_governor(&env, &governor);
        events::emit_governor_set(&env, &governor);
        Ok(())
    }

    /// Pull the native balance out of a contract exposing `withdraw_to`
    ///
    /// Returns the amount actually received by the reserve.
    ///
    /// # Errors
    /// * `Unauthorized` - Caller is not the owner
    /// * `UnsupportedWithdrawable` - The target call failed or does not exist
    pub fn withdraw_eth_from(env: Env, caller: Address, target: Address) -> Result<i128, ReserveError> {
        require_owner(&env, &caller)?;

        let this = env.current_contract_address();
        let native = TokenClient::new(&env, &storage::get_native(&env)?);
        let before = native.balance(&this);

        match WithdrawableClient::new(&env, &target).try_withdraw_to(&this) {
            Ok(Ok(_)) => {}
            _ => return Err(ReserveError::UnsupportedWithdrawable),
        }

        let received = native
            .balance(&this)
            .checked_sub(before)
            .ok_or(ReserveError::ArithmeticOverflow)?;

        events::emit_eth_withdrawn(&env, &target, received);
        Ok(received)
    }

    /// One-time migration: sweep royalties and pay the developer bounty
    ///
    /// Returns the bounty paid.
    ///
    /// # Errors
    /// * `Unauthorized` - Caller is not the owner
    /// * `AlreadyMigrated` - Migration has already run
    /// * `InsufficientReserve` - Pool cannot cover the bounty after the sweep
    pub fn do_upgrade(env: Env, caller: Address) -> Result<i128, ReserveError> {
        require_owner(&env, &caller)?;

        let mut state = storage::get_state(&env)?;
        if state.migrated {
            return Err(ReserveError::AlreadyMigrated);
        }

        // Guard first so the migration can never apply twice
        state.migrated = true;
        state.version = state
            .version
            .checked_add(1)
            .ok_or(ReserveError::ArithmeticOverflow)?;
        storage::set_state(&env, &state);

        let swept = sweep_royalties(&env)?;

        let config = storage::get_config(&env)?;
        if config.dev_bounty > 0 {
            let this = env.current_contract_address();
            let native = TokenClient::new(&env, &storage::get_native(&env)?);
            if native.balance(&this) < config.dev_bounty {
                return Err(ReserveError::InsufficientReserve);
            }
            native.transfer(&this, &config.dev_address, &config.dev_bounty);
        }

        log!(&env, "reserve migrated", state.version, swept, config.dev_bounty);
        events::emit_migrated(
            &env,
            state.version,
            swept,
            config.dev_bounty,
            &config.dev_address,
        );
        Ok(config.dev_bounty)
    }

    /// Replace the contract code, keeping storage
    pub fn upgrade(env: Env, caller: Address, new_wasm_hash: BytesN<32>) -> Result<(), ReserveError> {
        require_owner(&env, &caller)?;

        env.deployer().update_current_contract_wasm(new_wasm_hash);
        Ok(())
    }

    /// Hand ownership to `new_owner`. The current owner must authorize.
    pub fn transfer_ownership(env: Env, new_owner: Address) -> Result<(), ReserveError> {
        let owner = storage::get_owner(&env)?;
        owner.require_auth();

        storage::set_owner(&env, &new_owner);
        storage::extend_instance_ttl(&env);
        events::emit_ownership_transferred(&env, &owner, &new_owner);
        Ok(())
    }

    // ========================================================================
    // Query Functions
    // ========================================================================

    pub fn owner(env: Env) -> Result<Address, ReserveError> {
        storage::get_owner(&env)
    }

    /// Gas governor, if one has been set
    pub fn governor(env: Env) -> Option<Address> {
        storage::get_governor(&env)
    }

    /// Native balance currently held by the reserve
    pub fn pool_balance(env: Env) -> Result<i128, ReserveError> {
        let native = TokenClient::new(&env, &storage::get_native(&env)?);
        Ok(native.balance(&env.current_contract_address()))
    }

    pub fn get_config(env: Env) -> Result<ReserveConfig, ReserveError> {
        storage::get_config(&env)
    }

    pub fn state(env: Env) -> Result<ReserveState, ReserveError> {
        storage::get_state(&env)
    }

    pub fn royalty_pools(env: Env) -> Result<RoyaltyPools, ReserveError> {
        storage::get_royalty_pools(&env)
    }

    pub fn ledger(env: Env) -> Result<Address, ReserveError> {
        storage::get_ledger(&env)
    }
}

// ============================================================================
// Internal Helpers
// ============================================================================

/// Owner check shared by every owner operation; also extends the instance TTL
fn require_owner(env: &Env, caller: &Address) -> Result<(), ReserveError> {
    caller.require_auth();
    if *caller != storage::get_owner(env)? {
        return Err(ReserveError::Unauthorized);
    }
    storage::extend_instance_ttl(env);
    Ok(())
}

fn sweep_royalties(env: &Env) -> Result<i128, ReserveError> {
    let pools = storage::get_royalty_pools(env)?;
    let this = env.current_contract_address();

    let mut swept: i128 = 0;
    for pool in [pools.primary, pools.secondary] {
        let client = RoyaltyPoolClient::new(env, &pool);
        let balance = client.balance(&this);
        if balance <= 0 {
            continue;
        }
        client.withdraw(&this, &balance);
        swept = swept
            .checked_add(balance)
            .ok_or(ReserveError::ArithmeticOverflow)?;
    }

    log!(env, "royalties swept", swept);
    events::emit_royalties_deposited(env, swept, env.ledger().timestamp());
    Ok(swept)
}

/// Share of `pool` owed for `count` tokens out of `supply`, truncated.
///
/// Never exceeds `pool`, so a payout can not overdraw the reserve.
pub fn pro_rata_share(pool: i128, count: u32, supply: u32) -> Result<i128, ReserveError> {
    if supply == 0 {
        return Err(ReserveError::NoSupply);
    }
    if pool <= 0 {
        return Ok(0);
    }
    let share = pool
        .checked_mul(count as i128)
        .ok_or(ReserveError::ArithmeticOverflow)?
        / supply as i128;
    Ok(share.min(pool))
}

mod test;

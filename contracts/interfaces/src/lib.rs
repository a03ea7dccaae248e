#![no_std]

//! # Collaborator Interfaces
//!
//! Client traits for every contract the Reserve and Governor talk to but do
//! not own: the membership ledger, ownable managed contracts, the two
//! royalty-bearing pools, generic withdrawables and the gas rebate source.
//! `Redeemable` and `ReserveAdmin` are the member and owner surfaces of the
//! reserve as seen by the batch tool and the governor.
//!
//! With the `testutils` feature enabled this crate also exports mock
//! implementations of each collaborator for use in contract tests.

use soroban_sdk::{contractclient, Address, BytesN, Env, Vec};

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

/// Single-owner capability shared by every managed contract.
#[contractclient(name = "OwnableClient")]
pub trait Ownable {
    /// Current owner
    fn owner(env: Env) -> Address;

    /// Hand ownership to `new_owner`. The current owner must authorize.
    fn transfer_ownership(env: Env, new_owner: Address);
}

/// Read and transfer surface of the membership token ledger.
#[contractclient(name = "MembershipLedgerClient")]
pub trait MembershipLedger {
    /// Number of membership tokens held by `owner`
    fn balance(env: Env, owner: Address) -> u32;

    /// Holder of `token_id`, if it has been minted
    fn owner_of(env: Env, token_id: u32) -> Option<Address>;

    /// Whether `spender` may move `token_id` on its holder's behalf
    fn is_approved_or_owner(env: Env, spender: Address, token_id: u32) -> bool;

    /// Move `token_id` from `from` to `to`; `spender` must authorize
    fn transfer_from(env: Env, spender: Address, from: Address, to: Address, token_id: u32);

    /// Let `operator` move every token held by `owner`
    fn set_approval_for_all(env: Env, owner: Address, operator: Address, approved: bool);

    /// Charge `to` the current price, paid into the reserve, and mint a token to it
    fn mint(env: Env, to: Address) -> u32;

    /// Raw number of minted tokens
    fn total_supply(env: Env) -> u32;

    /// Supply used as the denominator for reserve shares and quorum
    fn adjusted_total_supply(env: Env) -> u32;

    /// Current mint price in native units
    fn price(env: Env) -> i128;
}

/// Member-facing exit of the reserve.
#[contractclient(name = "RedeemableClient")]
pub trait Redeemable {
    /// Hand `token_ids` to the reserve for a pro-rata share of the pool
    fn quit(env: Env, caller: Address, token_ids: Vec<u32>) -> i128;
}

/// Royalty-bearing balance that can be unwrapped into the native asset.
#[contractclient(name = "RoyaltyPoolClient")]
pub trait RoyaltyPool {
    /// Balance credited to `id`
    fn balance(env: Env, id: Address) -> i128;

    /// Burn `amount` of `from`'s balance and pay it out in native asset
    fn withdraw(env: Env, from: Address, amount: i128);
}

/// Contract holding native asset that can be swept to a recipient.
#[contractclient(name = "WithdrawableClient")]
pub trait Withdrawable {
    /// Send the full withdrawable balance to `recipient`, returning the amount
    fn withdraw_to(env: Env, recipient: Address) -> i128;
}

/// Source of gas refunds accrued by contracts.
#[contractclient(name = "GasRebateClient")]
pub trait GasRebate {
    /// Pay everything claimable for `contract` to `recipient`
    fn claim_max_gas(env: Env, contract: Address, recipient: Address) -> i128;
}

/// Owner-only surface of the reserve, driven by the governor that owns it.
#[contractclient(name = "ReserveAdminClient")]
pub trait ReserveAdmin {
    /// Swap the reserve's code, keeping its storage
    fn upgrade(env: Env, caller: Address, new_wasm_hash: BytesN<32>);

    /// Run the reserve's one-time migration, returning the bounty paid
    fn do_upgrade(env: Env, caller: Address) -> i128;

    /// Sweep `target`'s native balance into the reserve
    fn withdraw_eth_from(env: Env, caller: Address, target: Address) -> i128;
}

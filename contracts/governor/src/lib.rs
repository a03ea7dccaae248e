#![no_std]

//! # Reserve Governor
//!
//! Owns the membership ledger, the descriptor and the reserve, and lets
//! membership holders vote on handing all three to a successor contract.
//!
//! ## Lifecycle
//! - The owner proposes a candidate; one proposal may be open at a time
//! - Holders vote for or against, weighted by their live token balance
//! - After the window closes anyone can settle; a passing proposal locks
//!   governance permanently and transfers ownership to the candidate
//! - A failed proposal leaves everything untouched and a new one may follow
//!
//! ## Owner Operations
//! The owner also drives the reserve's one-time upgrade, generic native
//! sweeps into the reserve and gas rebate claims.

use reserve_interfaces::{
    GasRebateClient, MembershipLedgerClient, OwnableClient, ReserveAdminClient,
};
use soroban_sdk::{contract, contractevent, contractimpl, log, Address, BytesN, Env};

mod error;
mod storage;
mod types;

pub use error::GovernorError;
pub use types::{GovernorConfig, Proposal};

// ============================================================================
// Events
// ============================================================================

#[contractevent(topics = ["ReserveGovernor", "INIT"])]
pub struct GovernorInitialized {
    pub owner: Address,
    pub reserve: Address,
    pub timestamp: u64,
}

#[contractevent(topics = ["ReserveGovernor", "PROPOSED"])]
pub struct ProposalCreated {
    pub candidate: Address,
    pub period: u32,
    pub quorum: u32,
    pub end_time: u64,
}

#[contractevent(topics = ["ReserveGovernor", "VOTED"])]
pub struct VoteCast {
    #[topic]
    pub voter: Address,
    pub candidate: Address,
    pub support: u32,
    pub weight: u32,
}

#[contractevent(topics = ["ReserveGovernor", "SETTLED"])]
pub struct ProposalSettled {
    pub candidate: Address,
    pub period: u32,
    pub passed: bool,
    pub for_votes: u32,
    pub against_votes: u32,
}

#[contractevent(topics = ["ReserveGovernor", "LOCKED"])]
pub struct GovernanceLockedEvt {
    pub successor: Address,
    pub timestamp: u64,
}

#[contractevent(topics = ["ReserveGovernor", "UPGRADED"])]
pub struct UpgradeExecuted {
    pub reserve: Address,
    pub bounty: i128,
}

#[contractevent(topics = ["ReserveGovernor", "GAS"])]
pub struct GasClaimed {
    pub recipient: Address,
    pub amount: i128,
}

#[contractevent(topics = ["ReserveGovernor", "OWNER"])]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

// ============================================================================
// Contract Implementation
// ============================================================================

#[contract]
pub struct ReserveGovernor;

#[contractimpl]
impl ReserveGovernor {
    // ========================================================================
    // Initialization
    // ========================================================================

    /// Initialize the governor with its managed contracts
    ///
    /// Ownership of the managed contracts is transferred to the governor
    /// separately by their current owner.
    ///
    /// # Arguments
    /// * `owner` - Sole proposer and operator of owner-only functions
    /// * `ledger` - Membership ledger; its balances are vote weights
    /// * `descriptor` - Descriptor contract handed over with the ledger
    /// * `reserve` - Reserve contract handed over with the ledger
    /// * `gas_rebate` - Optional gas rebate source for `claim_max_gas`
    ///
    /// # Errors
    /// * `AlreadyInitialized` - Contract has already been initialized
    pub fn initialize(
        env: Env,
        owner: Address,
        ledger: Address,
        descriptor: Address,
        reserve: Address,
        gas_rebate: Option<Address>,
    ) -> Result<(), GovernorError> {
        if storage::is_initialized(&env) {
            return Err(GovernorError::AlreadyInitialized);
        }

        storage::set_owner(&env, &owner);
        storage::set_managed(&env, &ledger, &descriptor, &reserve);
        if let Some(gas_rebate) = gas_rebate {
            storage::set_gas_rebate(&env, &gas_rebate);
        }
        storage::set_config(&env, &GovernorConfig::default());
        storage::set_period(&env, 0);
        storage::extend_instance_ttl(&env);

        GovernorInitialized {
            owner,
            reserve,
            timestamp: env.ledger().timestamp(),
        }
        .publish(&env);

        Ok(())
    }

    // ========================================================================
    // Proposal Management
    // ========================================================================

    /// Open a new proposal to hand the managed contracts to `candidate`
    ///
    /// The quorum is fixed here from the ledger's adjusted supply.
    ///
    /// # Errors
    /// * `GovernanceLocked` - A proposal has already passed
    /// * `Unauthorized` - Caller is not the owner
    /// * `ProposalAlreadyOpen` - The current proposal is not settled yet
    /// * `InvalidProposal` - Candidate is a managed contract or this governor
    pub fn propose(env: Env, caller: Address, candidate: Address) -> Result<u32, GovernorError> {
        storage::require_initialized(&env)?;
        if storage::is_locked(&env) {
            return Err(GovernorError::GovernanceLocked);
        }
        require_owner(&env, &caller)?;

        if storage::get_open_proposal(&env).is_some() {
            return Err(GovernorError::ProposalAlreadyOpen);
        }

        let ledger = storage::get_ledger(&env)?;
        if candidate == ledger
            || candidate == storage::get_descriptor(&env)?
            || candidate == storage::get_reserve(&env)?
            || candidate == env.current_contract_address()
        {
            return Err(GovernorError::InvalidProposal);
        }

        let config = storage::get_config(&env)?;
        let supply = MembershipLedgerClient::new(&env, &ledger).adjusted_total_supply();
        let quorum = quorum_for(supply, config.quorum_bps)?;

        let period = storage::get_period(&env)
            .checked_add(1)
            .ok_or(GovernorError::ArithmeticOverflow)?;
        let start_time = env.ledger().timestamp();
        let end_time = start_time
            .checked_add(config.voting_period)
            .ok_or(GovernorError::ArithmeticOverflow)?;

        let proposal = Proposal {
            candidate: candidate.clone(),
            period,
            start_time,
            end_time,
            quorum,
            for_votes: 0,
            against_votes: 0,
            settled: false,
            passed: false,
        };

        storage::set_proposal(&env, &proposal);
        storage::set_period(&env, period);
        storage::set_current(&env, &candidate);
        storage::extend_instance_ttl(&env);

        ProposalCreated {
            candidate,
            period,
            quorum,
            end_time,
        }
        .publish(&env);

        Ok(period)
    }

    /// Cast a vote on the open proposal
    ///
    /// `support` is 1 for and 0 against. The weight is the voter's ledger
    /// balance at the time of the call. A zero-weight vote is still recorded.
    ///
    /// # Errors
    /// * `InvalidProposal` - Candidate is not the open proposal
    /// * `VotingClosed` - The voting window has ended
    /// * `InvalidSupport` - Support is neither 0 nor 1
    /// * `HasVoted` - Voter already voted on this proposal
    pub fn vote(
        env: Env,
        voter: Address,
        candidate: Address,
        support: u32,
    ) -> Result<(), GovernorError> {
        storage::require_initialized(&env)?;
        voter.require_auth();
        storage::extend_instance_ttl(&env);

        let mut proposal = open_proposal_for(&env, &candidate)?;
        if env.ledger().timestamp() >= proposal.end_time {
            return Err(GovernorError::VotingClosed);
        }
        if support > 1 {
            return Err(GovernorError::InvalidSupport);
        }
        if storage::has_voted(&env, &candidate, proposal.period, &voter) {
            return Err(GovernorError::HasVoted);
        }

        let ledger = MembershipLedgerClient::new(&env, &storage::get_ledger(&env)?);
        let weight = ledger.balance(&voter);

        storage::set_voted(&env, &candidate, proposal.period, &voter);
        if weight > 0 {
            if support == 1 {
                proposal.for_votes = proposal
                    .for_votes
                    .checked_add(weight)
                    .ok_or(GovernorError::ArithmeticOverflow)?;
            } else {
                proposal.against_votes = proposal
                    .against_votes
                    .checked_add(weight)
                    .ok_or(GovernorError::ArithmeticOverflow)?;
            }
            storage::set_proposal(&env, &proposal);
        }

        VoteCast {
            voter,
            candidate,
            support,
            weight,
        }
        .publish(&env);

        Ok(())
    }

    /// Close the open proposal once its window has ended. Callable by anyone.
    ///
    /// A proposal passes when `for_votes` reaches the quorum and exceeds
    /// `against_votes`. On success governance is locked before ownership of
    /// the ledger, descriptor and reserve moves to the candidate.
    ///
    /// # Errors
    /// * `InvalidProposal` - Candidate is not the open proposal
    /// * `VotingActive` - The voting window has not ended
    pub fn settle_votes(env: Env, candidate: Address) -> Result<bool, GovernorError> {
        storage::require_initialized(&env)?;

        let mut proposal = open_proposal_for(&env, &candidate)?;
        if env.ledger().timestamp() < proposal.end_time {
            return Err(GovernorError::VotingActive);
        }

        let passed =
            proposal.for_votes >= proposal.quorum && proposal.for_votes > proposal.against_votes;
        proposal.settled = true;
        proposal.passed = passed;
        storage::set_proposal(&env, &proposal);
        storage::extend_instance_ttl(&env);

        log!(
            &env,
            "proposal settled",
            proposal.period,
            passed,
            proposal.for_votes,
            proposal.against_votes
        );

        if passed {
            // Lock before any external call
            storage::set_locked(&env);

            for managed in [
                storage::get_ledger(&env)?,
                storage::get_descriptor(&env)?,
                storage::get_reserve(&env)?,
            ] {
                OwnableClient::new(&env, &managed).transfer_ownership(&candidate);
            }

            GovernanceLockedEvt {
                successor: candidate.clone(),
                timestamp: env.ledger().timestamp(),
            }
            .publish(&env);
        }

        ProposalSettled {
            candidate,
            period: proposal.period,
            passed,
            for_votes: proposal.for_votes,
            against_votes: proposal.against_votes,
        }
        .publish(&env);

        Ok(passed)
    }

    // ========================================================================
    // Owner Operations
    // ========================================================================

    /// Run the reserve's one-time upgrade
    ///
    /// When `reserve_wasm` is given the reserve's code is swapped first.
    /// Returns the developer bounty paid by the reserve.
    ///
    /// # Errors
    /// * `Unauthorized` - Caller is not the owner
    /// * `AlreadyUpgraded` - Upgrade has already run
    /// * `ReserveNotOwned` - This governor does not own the reserve
    /// * `ReserveMigrationFailed` - The reserve rejected the swap or migration
    pub fn do_upgrade(
        env: Env,
        caller: Address,
        reserve_wasm: Option<BytesN<32>>,
    ) -> Result<i128, GovernorError> {
        require_owner(&env, &caller)?;
        if storage::is_upgraded(&env) {
            return Err(GovernorError::AlreadyUpgraded);
        }

        let this = env.current_contract_address();
        let reserve = storage::get_reserve(&env)?;
        if OwnableClient::new(&env, &reserve).owner() != this {
            return Err(GovernorError::ReserveNotOwned);
        }

        storage::set_upgraded(&env);

        let admin = ReserveAdminClient::new(&env, &reserve);
        if let Some(wasm_hash) = reserve_wasm {
            if !matches!(admin.try_upgrade(&this, &wasm_hash), Ok(Ok(()))) {
                return Err(GovernorError::ReserveMigrationFailed);
            }
        }
        let bounty = match admin.try_do_upgrade(&this) {
            Ok(Ok(bounty)) => bounty,
            _ => return Err(GovernorError::ReserveMigrationFailed),
        };

        UpgradeExecuted { reserve, bounty }.publish(&env);
        Ok(bounty)
    }

    /// Sweep `target`'s native balance into the reserve
    ///
    /// # Errors
    /// * `Unauthorized` - Caller is not the owner
    /// * `ReserveNotOwned` - This governor does not own the reserve
    /// * `UnsupportedWithdrawable` - The reserve could not sweep `target`
    pub fn withdraw_eth_from(
        env: Env,
        caller: Address,
        target: Address,
    ) -> Result<i128, GovernorError> {
        require_owner(&env, &caller)?;

        let this = env.current_contract_address();
        let reserve = storage::get_reserve(&env)?;
        if OwnableClient::new(&env, &reserve).owner() != this {
            return Err(GovernorError::ReserveNotOwned);
        }

        match ReserveAdminClient::new(&env, &reserve).try_withdraw_eth_from(&this, &target) {
            Ok(Ok(received)) => Ok(received),
            _ => Err(GovernorError::UnsupportedWithdrawable),
        }
    }

    /// Claim gas refunds for the managed contracts and the governor
    ///
    /// Everything claimed is paid into the reserve.
    ///
    /// # Errors
    /// * `Unauthorized` - Caller is not the owner
    /// * `GasRebateNotSet` - No gas rebate source is configured
    pub fn claim_max_gas(env: Env, caller: Address) -> Result<i128, GovernorError> {
        require_owner(&env, &caller)?;
        let rebate = storage::get_gas_rebate(&env).ok_or(GovernorError::GasRebateNotSet)?;
        let rebate = GasRebateClient::new(&env, &rebate);

        let reserve = storage::get_reserve(&env)?;
        let mut total: i128 = 0;
        for contract in [
            storage::get_ledger(&env)?,
            storage::get_descriptor(&env)?,
            reserve.clone(),
            env.current_contract_address(),
        ] {
            let claimed = rebate.claim_max_gas(&contract, &reserve);
            total = total
                .checked_add(claimed)
                .ok_or(GovernorError::ArithmeticOverflow)?;
        }

        GasClaimed {
            recipient: reserve,
            amount: total,
        }
        .publish(&env);

        Ok(total)
    }

    /// Hand the governor to `new_owner`. The current owner must authorize.
    pub fn transfer_ownership(env: Env, new_owner: Address) -> Result<(), GovernorError> {
        let owner = storage::get_owner(&env)?;
        owner.require_auth();

        storage::set_owner(&env, &new_owner);
        storage::extend_instance_ttl(&env);
        OwnershipTransferred {
            previous_owner: owner,
            new_owner,
        }
        .publish(&env);
        Ok(())
    }

    // ========================================================================
    // Query Functions
    // ========================================================================

    pub fn owner(env: Env) -> Result<Address, GovernorError> {
        storage::get_owner(&env)
    }

    /// Current proposal period, 0 before the first proposal
    pub fn proposal_period(env: Env) -> u32 {
        storage::get_period(&env)
    }

    pub fn proposal(env: Env, candidate: Address, period: u32) -> Option<Proposal> {
        storage::get_proposal(&env, &candidate, period)
    }

    pub fn governance_locked(env: Env) -> bool {
        storage::is_locked(&env)
    }

    pub fn has_voted(env: Env, candidate: Address, period: u32, voter: Address) -> bool {
        storage::has_voted(&env, &candidate, period, &voter)
    }

    pub fn is_upgraded(env: Env) -> bool {
        storage::is_upgraded(&env)
    }

    pub fn get_config(env: Env) -> Result<GovernorConfig, GovernorError> {
        storage::get_config(&env)
    }
}

// ============================================================================
// Internal Helpers
// ============================================================================

/// Owner check for every owner operation; also extends the instance TTL
fn require_owner(env: &Env, caller: &Address) -> Result<(), GovernorError> {
    caller.require_auth();
    if *caller != storage::get_owner(env)? {
        return Err(GovernorError::Unauthorized);
    }
    storage::extend_instance_ttl(env);
    Ok(())
}

fn open_proposal_for(env: &Env, candidate: &Address) -> Result<Proposal, GovernorError> {
    match storage::get_open_proposal(env) {
        Some(proposal) if proposal.candidate == *candidate => Ok(proposal),
        _ => Err(GovernorError::InvalidProposal),
    }
}

/// `ceil(supply * quorum_bps / 10_000)`
pub fn quorum_for(supply: u32, quorum_bps: u32) -> Result<u32, GovernorError> {
    let scaled = (supply as u64) * (quorum_bps as u64);
    let quorum = scaled.div_ceil(10_000);
    u32::try_from(quorum).map_err(|_| GovernorError::ArithmeticOverflow)
}

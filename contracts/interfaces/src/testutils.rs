//! Mock collaborators for contract tests

use soroban_sdk::{contract, contractimpl, contracttype, token::TokenClient, Address, Env};

// ============================================================================
// Membership Ledger
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LedgerKey {
    Owner,
    Native,
    Reserve,
    Price,
    NextId,
    TotalSupply,
    TokenOwner(u32),
    Balance(Address),
    Approval(u32),
    Operator(Address, Address),
}

/// ERC-721 style ledger whose mint proceeds go straight to the reserve.
/// The adjusted supply excludes tokens parked in the reserve.
#[contract]
pub struct MockMembershipLedger;

#[contractimpl]
impl MockMembershipLedger {
    pub fn __constructor(env: Env, owner: Address, native: Address, price: i128) {
        let storage = env.storage().instance();
        storage.set(&LedgerKey::Owner, &owner);
        storage.set(&LedgerKey::Native, &native);
        storage.set(&LedgerKey::Price, &price);
        storage.set(&LedgerKey::NextId, &0u32);
        storage.set(&LedgerKey::TotalSupply, &0u32);
    }

    pub fn set_reserve(env: Env, reserve: Address) {
        Self::owner(env.clone()).require_auth();
        env.storage().instance().set(&LedgerKey::Reserve, &reserve);
    }

    pub fn set_price(env: Env, price: i128) {
        Self::owner(env.clone()).require_auth();
        env.storage().instance().set(&LedgerKey::Price, &price);
    }

    /// Pay the current price into the reserve and receive a fresh token
    pub fn mint(env: Env, to: Address) -> u32 {
        to.require_auth();

        let storage = env.storage().instance();
        let reserve: Address = storage.get(&LedgerKey::Reserve).expect("reserve not set");
        let native: Address = storage.get(&LedgerKey::Native).unwrap();
        let price: i128 = storage.get(&LedgerKey::Price).unwrap();
        if price > 0 {
            TokenClient::new(&env, &native).transfer(&to, &reserve, &price);
        }

        let id: u32 = storage.get(&LedgerKey::NextId).unwrap();
        storage.set(&LedgerKey::NextId, &(id + 1));
        let total: u32 = storage.get(&LedgerKey::TotalSupply).unwrap();
        storage.set(&LedgerKey::TotalSupply, &(total + 1));

        Self::assign(&env, id, &to);
        id
    }

    pub fn approve(env: Env, owner: Address, spender: Address, token_id: u32) {
        owner.require_auth();
        if Self::owner_of(env.clone(), token_id) != Some(owner) {
            panic!("approve caller is not owner");
        }
        env.storage()
            .instance()
            .set(&LedgerKey::Approval(token_id), &spender);
    }

    pub fn set_approval_for_all(env: Env, owner: Address, operator: Address, approved: bool) {
        owner.require_auth();
        env.storage()
            .instance()
            .set(&LedgerKey::Operator(owner, operator), &approved);
    }

    pub fn balance(env: Env, owner: Address) -> u32 {
        env.storage()
            .instance()
            .get(&LedgerKey::Balance(owner))
            .unwrap_or(0)
    }

    pub fn owner_of(env: Env, token_id: u32) -> Option<Address> {
        env.storage().instance().get(&LedgerKey::TokenOwner(token_id))
    }

    pub fn is_approved_or_owner(env: Env, spender: Address, token_id: u32) -> bool {
        let holder = match Self::owner_of(env.clone(), token_id) {
            Some(holder) => holder,
            None => return false,
        };
        if holder == spender {
            return true;
        }
        let storage = env.storage().instance();
        if storage.get::<LedgerKey, Address>(&LedgerKey::Approval(token_id)) == Some(spender.clone()) {
            return true;
        }
        storage
            .get(&LedgerKey::Operator(holder, spender))
            .unwrap_or(false)
    }

    pub fn transfer_from(env: Env, spender: Address, from: Address, to: Address, token_id: u32) {
        spender.require_auth();
        if Self::owner_of(env.clone(), token_id) != Some(from.clone()) {
            panic!("transfer of token that is not own");
        }
        if !Self::is_approved_or_owner(env.clone(), spender, token_id) {
            panic!("transfer caller is not owner nor approved");
        }

        env.storage()
            .instance()
            .remove(&LedgerKey::Approval(token_id));
        let from_balance = Self::balance(env.clone(), from.clone());
        env.storage()
            .instance()
            .set(&LedgerKey::Balance(from), &(from_balance - 1));
        Self::assign(&env, token_id, &to);
    }

    pub fn total_supply(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&LedgerKey::TotalSupply)
            .unwrap_or(0)
    }

    pub fn adjusted_total_supply(env: Env) -> u32 {
        let total = Self::total_supply(env.clone());
        match env.storage().instance().get::<LedgerKey, Address>(&LedgerKey::Reserve) {
            Some(reserve) => total - Self::balance(env, reserve),
            None => total,
        }
    }

    pub fn price(env: Env) -> i128 {
        env.storage().instance().get(&LedgerKey::Price).unwrap_or(0)
    }

    pub fn owner(env: Env) -> Address {
        env.storage().instance().get(&LedgerKey::Owner).unwrap()
    }

    pub fn transfer_ownership(env: Env, new_owner: Address) {
        Self::owner(env.clone()).require_auth();
        env.storage().instance().set(&LedgerKey::Owner, &new_owner);
    }

    fn assign(env: &Env, token_id: u32, to: &Address) {
        let storage = env.storage().instance();
        storage.set(&LedgerKey::TokenOwner(token_id), to);
        let balance: u32 = storage.get(&LedgerKey::Balance(to.clone())).unwrap_or(0);
        storage.set(&LedgerKey::Balance(to.clone()), &(balance + 1));
    }
}

// ============================================================================
// Ownable (descriptor stand-in)
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OwnableKey {
    Owner,
}

#[contract]
pub struct MockOwnable;

#[contractimpl]
impl MockOwnable {
    pub fn __constructor(env: Env, owner: Address) {
        env.storage().instance().set(&OwnableKey::Owner, &owner);
    }

    pub fn owner(env: Env) -> Address {
        env.storage().instance().get(&OwnableKey::Owner).unwrap()
    }

    pub fn transfer_ownership(env: Env, new_owner: Address) {
        Self::owner(env.clone()).require_auth();
        env.storage().instance().set(&OwnableKey::Owner, &new_owner);
    }
}

// ============================================================================
// Royalty Pool
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PoolKey {
    Native,
    Balance(Address),
}

/// Wrapped native balance, credited by `deposit` and unwrapped by `withdraw`.
#[contract]
pub struct MockRoyaltyPool;

#[contractimpl]
impl MockRoyaltyPool {
    pub fn __constructor(env: Env, native: Address) {
        env.storage().instance().set(&PoolKey::Native, &native);
    }

    pub fn deposit(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        let native: Address = env.storage().instance().get(&PoolKey::Native).unwrap();
        TokenClient::new(&env, &native).transfer(&from, &env.current_contract_address(), &amount);

        let balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .instance()
            .set(&PoolKey::Balance(to), &(balance + amount));
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        env.storage()
            .instance()
            .get(&PoolKey::Balance(id))
            .unwrap_or(0)
    }

    pub fn withdraw(env: Env, from: Address, amount: i128) {
        from.require_auth();
        let balance = Self::balance(env.clone(), from.clone());
        if amount > balance {
            panic!("insufficient balance");
        }
        env.storage()
            .instance()
            .set(&PoolKey::Balance(from.clone()), &(balance - amount));

        let native: Address = env.storage().instance().get(&PoolKey::Native).unwrap();
        TokenClient::new(&env, &native).transfer(&env.current_contract_address(), &from, &amount);
    }
}

// ============================================================================
// Withdrawable
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WithdrawableKey {
    Native,
}

#[contract]
pub struct MockWithdrawable;

#[contractimpl]
impl MockWithdrawable {
    pub fn __constructor(env: Env, native: Address) {
        env.storage().instance().set(&WithdrawableKey::Native, &native);
    }

    pub fn withdraw_to(env: Env, recipient: Address) -> i128 {
        let native: Address = env
            .storage()
            .instance()
            .get(&WithdrawableKey::Native)
            .unwrap();
        let token = TokenClient::new(&env, &native);
        let this = env.current_contract_address();
        let amount = token.balance(&this);
        if amount > 0 {
            token.transfer(&this, &recipient, &amount);
        }
        amount
    }
}

// ============================================================================
// Gas Rebate
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RebateKey {
    Native,
    PerClaim,
    Claims,
}

/// Pays a fixed refund per claimed contract while its own balance lasts.
#[contract]
pub struct MockGasRebate;

#[contractimpl]
impl MockGasRebate {
    pub fn __constructor(env: Env, native: Address, per_claim: i128) {
        let storage = env.storage().instance();
        storage.set(&RebateKey::Native, &native);
        storage.set(&RebateKey::PerClaim, &per_claim);
        storage.set(&RebateKey::Claims, &0u32);
    }

    pub fn claim_max_gas(env: Env, _contract: Address, recipient: Address) -> i128 {
        let storage = env.storage().instance();
        let native: Address = storage.get(&RebateKey::Native).unwrap();
        let per_claim: i128 = storage.get(&RebateKey::PerClaim).unwrap();
        let claims: u32 = storage.get(&RebateKey::Claims).unwrap();
        storage.set(&RebateKey::Claims, &(claims + 1));

        let token = TokenClient::new(&env, &native);
        let this = env.current_contract_address();
        let amount = per_claim.min(token.balance(&this));
        if amount > 0 {
            token.transfer(&this, &recipient, &amount);
        }
        amount
    }

    pub fn claims(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&RebateKey::Claims)
            .unwrap_or(0)
    }
}

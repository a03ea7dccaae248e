use soroban_sdk::{contractevent, Address, Env};

#[contractevent(topics = ["Reserve", "INIT"])]
struct ReserveInitialized {
    owner: Address,
    ledger: Address,
    timestamp: u64,
}

#[contractevent(topics = ["Reserve", "QUIT"])]
struct Quit {
    #[topic]
    member: Address,
    amount: i128,
}

#[contractevent(topics = ["Reserve", "ROYALTIES"])]
struct RoyaltiesDeposited {
    amount: i128,
    timestamp: u64,
}

#[contractevent(topics = ["Reserve", "GOV_SET"])]
struct GovernorSet {
    governor: Address,
}

#[contractevent(topics = ["Reserve", "WITHDRAWN"])]
struct EthWithdrawn {
    source: Address,
    amount: i128,
}

#[contractevent(topics = ["Reserve", "MIGRATED"])]
struct Migrated {
    version: u32,
    swept: i128,
    bounty: i128,
    dev_address: Address,
}

#[contractevent(topics = ["Reserve", "OWNER"])]
struct OwnershipTransferred {
    previous_owner: Address,
    new_owner: Address,
}

pub fn emit_initialized(env: &Env, owner: &Address, ledger: &Address, timestamp: u64) {
    ReserveInitialized {
        owner: owner.clone(),
        ledger: ledger.clone(),
        timestamp,
    }
    .publish(env);
}

pub fn emit_quit(env: &Env, member: &Address, amount: i128) {
    Quit {
        member: member.clone(),
        amount,
    }
    .publish(env);
}

pub fn emit_royalties_deposited(env: &Env, amount: i128, timestamp: u64) {
    RoyaltiesDeposited { amount, timestamp }.publish(env);
}

pub fn emit_governor_set(env: &Env, governor: &Address) {
    GovernorSet {
        governor: governor.clone(),
    }
    .publish(env);
}

pub fn emit_eth_withdrawn(env: &Env, source: &Address, amount: i128) {
    EthWithdrawn {
        source: source.clone(),
        amount,
    }
    .publish(env);
}

pub fn emit_migrated(env: &Env, version: u32, swept: i128, bounty: i128, dev_address: &Address) {
    Migrated {
        version,
        swept,
        bounty,
        dev_address: dev_address.clone(),
    }
    .publish(env);
}

pub fn emit_ownership_transferred(env: &Env, previous_owner: &Address, new_owner: &Address) {
    OwnershipTransferred {
        previous_owner: previous_owner.clone(),
        new_owner: new_owner.clone(),
    }
    .publish(env);
}

#![cfg(test)]

use super::*;
use reserve_interfaces::testutils::{
    MockMembershipLedger, MockMembershipLedgerClient, MockOwnable, MockRoyaltyPool,
    MockRoyaltyPoolClient, MockWithdrawable,
};
use soroban_sdk::{
    testutils::{storage::Instance as _, Address as _, Events, Ledger},
    token::{StellarAssetClient, TokenClient},
    vec, Address, BytesN, Env, Map, Symbol, TryIntoVal, Vec,
};

const PRICE: i128 = 1_000_000;
const DEV_BOUNTY: i128 = 4_000_000;

// ============================================================================
// Test Helpers
// ============================================================================

struct Setup<'a> {
    owner: Address,
    dev: Address,
    reserve_id: Address,
    reserve: MembershipReserveClient<'a>,
    ledger: MockMembershipLedgerClient<'a>,
    native: TokenClient<'a>,
    native_admin: StellarAssetClient<'a>,
    primary: MockRoyaltyPoolClient<'a>,
    secondary: MockRoyaltyPoolClient<'a>,
}

fn setup(env: &Env) -> Setup<'_> {
    env.mock_all_auths();

    let owner = Address::generate(env);
    let dev = Address::generate(env);

    let native_id = env
        .register_stellar_asset_contract_v2(owner.clone())
        .address();
    let ledger_id = env.register(
        MockMembershipLedger,
        (owner.clone(), native_id.clone(), PRICE),
    );
    let primary_id = env.register(MockRoyaltyPool, (native_id.clone(),));
    let secondary_id = env.register(MockRoyaltyPool, (native_id.clone(),));

    let reserve_id = env.register(MembershipReserve, ());
    let reserve = MembershipReserveClient::new(env, &reserve_id);
    reserve.initialize(
        &owner,
        &ledger_id,
        &native_id,
        &primary_id,
        &secondary_id,
        &dev,
        &DEV_BOUNTY,
    );

    let ledger = MockMembershipLedgerClient::new(env, &ledger_id);
    ledger.set_reserve(&reserve_id);

    Setup {
        owner,
        dev,
        reserve_id,
        reserve,
        ledger,
        native: TokenClient::new(env, &native_id),
        native_admin: StellarAssetClient::new(env, &native_id),
        primary: MockRoyaltyPoolClient::new(env, &primary_id),
        secondary: MockRoyaltyPoolClient::new(env, &secondary_id),
    }
}

/// Fund `member` and mint `count` tokens for it
fn mint_tokens(env: &Env, s: &Setup, member: &Address, count: u32) -> Vec<u32> {
    s.native_admin.mint(member, &(PRICE * count as i128));
    let mut ids = Vec::new(env);
    for _ in 0..count {
        ids.push_back(s.ledger.mint(member));
    }
    ids
}

/// Mint one token for `member` at `price`
fn mint_at(s: &Setup, member: &Address, price: i128) -> u32 {
    s.ledger.set_price(&price);
    s.native_admin.mint(member, &price);
    s.ledger.mint(member)
}

fn fund_pool(env: &Env, s: &Setup, pool: &MockRoyaltyPoolClient, amount: i128) {
    let funder = Address::generate(env);
    s.native_admin.mint(&funder, &amount);
    pool.deposit(&funder, &s.reserve_id, &amount);
}

// ============================================================================
// Initialization Tests
// ============================================================================

#[test]
fn test_initialize_sets_state() {
    let env = Env::default();
    let s = setup(&env);

    assert_eq!(s.reserve.owner(), s.owner);
    assert_eq!(s.reserve.governor(), None);
    assert_eq!(s.reserve.pool_balance(), 0);

    let config = s.reserve.get_config();
    assert_eq!(config.dev_address, s.dev);
    assert_eq!(config.dev_bounty, DEV_BOUNTY);

    let state = s.reserve.state();
    assert_eq!(state.version, INITIAL_VERSION);
    assert!(!state.migrated);
}

#[test]
fn test_instance_ttl_extended_at_initialize() {
    let env = Env::default();
    let s = setup(&env);

    // Raised from the default lifetime at initialization
    let ttl = env.as_contract(&s.reserve_id, || env.storage().instance().get_ttl());
    assert_eq!(ttl, storage::INSTANCE_BUMP_AMOUNT);
}

#[test]
fn test_instance_ttl_extended_on_owner_write() {
    let env = Env::default();
    env.mock_all_auths();
    let owner = Address::generate(&env);

    // Standalone reserve so no collaborator expires during the jump below
    let reserve_id = env.register(MembershipReserve, ());
    let reserve = MembershipReserveClient::new(&env, &reserve_id);
    let other = Address::generate(&env);
    reserve.initialize(&owner, &other, &other, &other, &other, &other, &0);
    let instance_ttl =
        || env.as_contract(&reserve_id, || env.storage().instance().get_ttl());

    let ledger = env.ledger().sequence();
    env.ledger()
        .set_sequence_number(ledger + storage::INSTANCE_BUMP_AMOUNT - 100);
    assert_eq!(instance_ttl(), 100);

    reserve.transfer_ownership(&Address::generate(&env));
    assert_eq!(instance_ttl(), storage::INSTANCE_BUMP_AMOUNT);
}

#[test]
fn test_initialize_twice_fails() {
    let env = Env::default();
    let s = setup(&env);

    let other = Address::generate(&env);
    let result = s
        .reserve
        .try_initialize(&other, &other, &other, &other, &other, &other, &0);
    assert_eq!(result, Err(Ok(ReserveError::AlreadyInitialized)));
}

#[test]
fn test_initialize_negative_bounty_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(MembershipReserve, ());
    let client = MembershipReserveClient::new(&env, &contract_id);
    let addr = Address::generate(&env);

    let result = client.try_initialize(&addr, &addr, &addr, &addr, &addr, &addr, &-1);
    assert_eq!(result, Err(Ok(ReserveError::InvalidBounty)));
}

#[test]
fn test_uninitialized_quit_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(MembershipReserve, ());
    let client = MembershipReserveClient::new(&env, &contract_id);
    let member = Address::generate(&env);

    let result = client.try_quit(&member, &vec![&env, 0u32]);
    assert_eq!(result, Err(Ok(ReserveError::NotInitialized)));
}

// ============================================================================
// Quit Tests
// ============================================================================

#[test]
fn test_quit_requires_approval() {
    let env = Env::default();
    let s = setup(&env);
    let member = Address::generate(&env);
    let ids = mint_tokens(&env, &s, &member, 2);
    let first = ids.get(0).unwrap();

    let result = s.reserve.try_quit(&member, &vec![&env, first]);
    assert_eq!(result, Err(Ok(ReserveError::NotOwnerOrApproved)));

    s.ledger.approve(&member, &s.reserve_id, &first);
    s.reserve.quit(&member, &vec![&env, first]);
    assert_eq!(s.ledger.owner_of(&first), Some(s.reserve_id.clone()));
}

#[test]
fn test_quit_rejects_tokens_not_owned() {
    let env = Env::default();
    let s = setup(&env);
    let member = Address::generate(&env);
    let dead = Address::generate(&env);
    let ids = mint_tokens(&env, &s, &member, 2);

    s.ledger
        .transfer_from(&member, &member, &dead, &ids.get(0).unwrap());
    s.ledger
        .set_approval_for_all(&member, &s.reserve_id, &true);

    let result = s.reserve.try_quit(&member, &ids);
    assert_eq!(result, Err(Ok(ReserveError::NotOwnerOrApproved)));

    let owned = vec![&env, ids.get(1).unwrap()];
    s.reserve.quit(&member, &owned);
    assert_eq!(s.ledger.balance(&member), 0);
}

#[test]
fn test_quit_duplicate_ids_fails() {
    let env = Env::default();
    let s = setup(&env);
    let member = Address::generate(&env);
    let ids = mint_tokens(&env, &s, &member, 2);
    let first = ids.get(0).unwrap();

    s.ledger.approve(&member, &s.reserve_id, &first);

    let result = s
        .reserve
        .try_quit(&member, &vec![&env, first, first, first]);
    assert_eq!(result, Err(Ok(ReserveError::NotOwnerOrApproved)));

    // The first transfer was rolled back with the failed call
    assert_eq!(s.ledger.owner_of(&first), Some(member.clone()));
    assert_eq!(s.reserve.pool_balance(), PRICE * 2);
}

#[test]
fn test_quit_empty_fails() {
    let env = Env::default();
    let s = setup(&env);
    let member = Address::generate(&env);

    let result = s.reserve.try_quit(&member, &Vec::new(&env));
    assert_eq!(result, Err(Ok(ReserveError::NothingToQuit)));
}

#[test]
fn test_quit_pays_pro_rata_share() {
    let env = Env::default();
    let s = setup(&env);
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);

    mint_tokens(&env, &s, &alice, 3);
    let bob_ids = mint_tokens(&env, &s, &bob, 1);

    // Royalty income raises the backing of every outstanding token
    s.native_admin.mint(&s.reserve_id, &400_000);
    let pool = s.reserve.pool_balance();
    assert_eq!(pool, PRICE * 4 + 400_000);

    s.ledger.set_approval_for_all(&bob, &s.reserve_id, &true);
    let paid = s.reserve.quit(&bob, &bob_ids);

    // Quit is the last event of the call, keyed by member
    let (emitter, topics, data) = env.events().all().last().unwrap();
    assert_eq!(emitter, s.reserve_id);
    let name: Symbol = topics.get(1).unwrap().try_into_val(&env).unwrap();
    assert_eq!(name, Symbol::new(&env, "QUIT"));
    let member: Address = topics.get(2).unwrap().try_into_val(&env).unwrap();
    assert_eq!(member, bob);
    let data: Map<Symbol, i128> = data.try_into_val(&env).unwrap();
    assert_eq!(data.get(Symbol::new(&env, "amount")), Some(paid));

    assert_eq!(paid, pool / 4);
    assert_eq!(s.native.balance(&bob), pool / 4);
    assert_eq!(s.reserve.pool_balance(), pool - paid);
    assert_eq!(s.ledger.adjusted_total_supply(), 3);
}

#[test]
fn test_quit_multiple_tokens_single_share() {
    let env = Env::default();
    let s = setup(&env);
    let alice = Address::generate(&env);

    let ids = mint_tokens(&env, &s, &alice, 3);
    mint_tokens(&env, &s, &Address::generate(&env), 4);
    s.native_admin.mint(&s.reserve_id, &7);

    let pool = s.reserve.pool_balance();
    s.ledger.set_approval_for_all(&alice, &s.reserve_id, &true);
    let paid = s.reserve.quit(&alice, &ids);

    assert_eq!(paid, pool * 3 / 7);
    assert_eq!(s.ledger.balance(&alice), 0);
    assert_eq!(s.ledger.balance(&s.reserve_id), 3);
}

#[test]
fn test_pro_rata_round_trip_conserves_reserve() {
    let env = Env::default();
    let s = setup(&env);
    let seed = Address::generate(&env);
    let s1 = Address::generate(&env);
    let s2 = Address::generate(&env);

    // Wei-scale prices so rounding shows up in the payouts
    let base: i128 = 1_000_000_000_000_000_000;
    for _ in 0..3 {
        mint_at(&s, &seed, base);
    }
    s.native_admin.mint(&s.reserve_id, &7);
    let starting_balance = s.reserve.pool_balance();

    let mut s1_ids = Vec::new(&env);
    let mut s2_ids = Vec::new(&env);
    for i in 0..5i128 {
        // buyers chase each other up the price curve
        s1_ids.push_back(mint_at(&s, &s1, base + i * 1_234_567_891));
        s2_ids.push_back(mint_at(&s, &s2, base + i * 1_234_567_891 + 987_654_321));
    }

    s.ledger.set_approval_for_all(&s1, &s.reserve_id, &true);
    s.ledger.set_approval_for_all(&s2, &s.reserve_id, &true);

    let mut s1_received: i128 = 0;
    let mut s2_received: i128 = 0;
    for i in (0..5).rev() {
        s2_received += s.reserve.quit(&s2, &vec![&env, s2_ids.get(i).unwrap()]);
        assert!(s.reserve.pool_balance() >= starting_balance);
        s1_received += s.reserve.quit(&s1, &vec![&env, s1_ids.get(i).unwrap()]);
        assert!(s.reserve.pool_balance() >= starting_balance);
    }

    let tolerance = s1_received.max(s2_received) / 10_000_000_000_000_000;
    assert!(tolerance > 0);
    assert!((s1_received - s2_received).abs() <= tolerance);

    // Only truncation dust and the climb above the seed price stay behind
    let leftover = s.reserve.pool_balance() - starting_balance;
    assert!(leftover >= 0);
    assert!(leftover <= 5 * 1_234_567_891 + 987_654_321);
}

#[test]
fn test_sequential_quits_never_overdraw() {
    let env = Env::default();
    let s = setup(&env);
    s.ledger.set_price(&0);

    let members = [
        Address::generate(&env),
        Address::generate(&env),
        Address::generate(&env),
    ];
    let mut ids = Vec::new(&env);
    for member in members.iter() {
        ids.push_back(s.ledger.mint(member));
        s.ledger.set_approval_for_all(member, &s.reserve_id, &true);
    }
    s.native_admin.mint(&s.reserve_id, &1_000);

    let mut total_paid: i128 = 0;
    for (i, member) in members.iter().enumerate() {
        let pool = s.reserve.pool_balance();
        let supply = s.ledger.adjusted_total_supply();
        let paid = s.reserve.quit(member, &vec![&env, ids.get(i as u32).unwrap()]);
        assert_eq!(paid, pool / supply as i128);
        total_paid += paid;
    }

    assert!(total_paid <= 1_000);
    assert_eq!(s.reserve.pool_balance(), 1_000 - total_paid);
}

#[test]
fn test_pro_rata_share_math() {
    assert_eq!(pro_rata_share(1_000, 1, 3), Ok(333));
    assert_eq!(pro_rata_share(1_000, 3, 3), Ok(1_000));
    assert_eq!(pro_rata_share(0, 5, 10), Ok(0));
    assert_eq!(pro_rata_share(10, 1, 0), Err(ReserveError::NoSupply));
    assert_eq!(pro_rata_share(10, 20, 10), Ok(10));
    assert_eq!(
        pro_rata_share(i128::MAX, 2, 3),
        Err(ReserveError::ArithmeticOverflow)
    );
}

// ============================================================================
// Royalty Tests
// ============================================================================

#[test]
fn test_deposit_royalties_both_pools() {
    let env = Env::default();
    let s = setup(&env);
    fund_pool(&env, &s, &s.primary, 3_000_000);
    fund_pool(&env, &s, &s.secondary, 3_000_000);

    let before = s.reserve.pool_balance();
    let swept = s.reserve.deposit_royalties();

    assert_eq!(swept, 6_000_000);
    assert_eq!(s.primary.balance(&s.reserve_id), 0);
    assert_eq!(s.secondary.balance(&s.reserve_id), 0);
    assert_eq!(s.reserve.pool_balance(), before + 6_000_000);
}

#[test]
fn test_deposit_royalties_only_primary() {
    let env = Env::default();
    let s = setup(&env);
    fund_pool(&env, &s, &s.primary, 3_000_000);

    let before = s.reserve.pool_balance();
    s.reserve.deposit_royalties();

    assert_eq!(s.primary.balance(&s.reserve_id), 0);
    assert_eq!(s.secondary.balance(&s.reserve_id), 0);
    assert_eq!(s.reserve.pool_balance(), before + 3_000_000);
}

#[test]
fn test_deposit_royalties_only_secondary() {
    let env = Env::default();
    let s = setup(&env);
    fund_pool(&env, &s, &s.secondary, 2_500_000);

    let before = s.reserve.pool_balance();
    s.reserve.deposit_royalties();

    assert_eq!(s.primary.balance(&s.reserve_id), 0);
    assert_eq!(s.secondary.balance(&s.reserve_id), 0);
    assert_eq!(s.reserve.pool_balance(), before + 2_500_000);
}

#[test]
fn test_deposit_royalties_every_time() {
    let env = Env::default();
    let s = setup(&env);

    // Nothing to sweep is not an error
    assert_eq!(s.reserve.deposit_royalties(), 0);

    for round in 1..=5i128 {
        fund_pool(&env, &s, &s.primary, round * 100_000);
        fund_pool(&env, &s, &s.secondary, round * 70_000);

        let before = s.reserve.pool_balance();
        let swept = s.reserve.deposit_royalties();

        assert_eq!(swept, round * 170_000);
        assert_eq!(s.primary.balance(&s.reserve_id), 0);
        assert_eq!(s.secondary.balance(&s.reserve_id), 0);
        assert_eq!(s.reserve.pool_balance(), before + swept);
    }
}

// ============================================================================
// Owner Operation Tests
// ============================================================================

#[test]
fn test_only_owner_can_set_governor() {
    let env = Env::default();
    let s = setup(&env);
    let stranger = Address::generate(&env);
    let governor = Address::generate(&env);

    let result = s.reserve.try_set_governor(&stranger, &governor);
    assert_eq!(result, Err(Ok(ReserveError::Unauthorized)));

    s.reserve.set_governor(&s.owner, &governor);
    assert_eq!(s.reserve.governor(), Some(governor));
}

#[test]
fn test_withdraw_eth_from_withdrawable() {
    let env = Env::default();
    let s = setup(&env);
    let native_id = s.native.address.clone();
    let target = env.register(MockWithdrawable, (native_id,));
    s.native_admin.mint(&target, &750_000);

    let stranger = Address::generate(&env);
    let result = s.reserve.try_withdraw_eth_from(&stranger, &target);
    assert_eq!(result, Err(Ok(ReserveError::Unauthorized)));

    let received = s.reserve.withdraw_eth_from(&s.owner, &target);
    assert_eq!(received, 750_000);
    assert_eq!(s.reserve.pool_balance(), 750_000);
    assert_eq!(s.native.balance(&target), 0);
}

#[test]
fn test_withdraw_eth_from_unsupported_target() {
    let env = Env::default();
    let s = setup(&env);
    let not_withdrawable = env.register(MockOwnable, (s.owner.clone(),));

    let result = s.reserve.try_withdraw_eth_from(&s.owner, &not_withdrawable);
    assert_eq!(result, Err(Ok(ReserveError::UnsupportedWithdrawable)));
}

#[test]
fn test_transfer_ownership() {
    let env = Env::default();
    let s = setup(&env);
    let new_owner = Address::generate(&env);

    s.reserve.transfer_ownership(&new_owner);
    assert_eq!(s.reserve.owner(), new_owner);

    // Previous owner lost its role
    let result = s.reserve.try_set_governor(&s.owner, &new_owner);
    assert_eq!(result, Err(Ok(ReserveError::Unauthorized)));
}

#[test]
fn test_upgrade_only_owner() {
    let env = Env::default();
    let s = setup(&env);
    let stranger = Address::generate(&env);
    let hash = BytesN::from_array(&env, &[7u8; 32]);

    let result = s.reserve.try_upgrade(&stranger, &hash);
    assert_eq!(result, Err(Ok(ReserveError::Unauthorized)));
}

// ============================================================================
// Migration Tests
// ============================================================================

#[test]
fn test_do_upgrade_sweeps_royalties_and_pays_bounty() {
    let env = Env::default();
    let s = setup(&env);
    mint_tokens(&env, &s, &Address::generate(&env), 10);
    fund_pool(&env, &s, &s.primary, 3_000_000);
    fund_pool(&env, &s, &s.secondary, 3_000_000);

    let balance = s.reserve.pool_balance();
    let dev_balance = s.native.balance(&s.dev);

    let bounty = s.reserve.do_upgrade(&s.owner);

    assert_eq!(bounty, DEV_BOUNTY);
    assert_eq!(s.primary.balance(&s.reserve_id), 0);
    assert_eq!(s.secondary.balance(&s.reserve_id), 0);
    assert_eq!(
        s.reserve.pool_balance(),
        balance + 6_000_000 - DEV_BOUNTY
    );
    assert_eq!(s.native.balance(&s.dev), dev_balance + DEV_BOUNTY);

    let state = s.reserve.state();
    assert!(state.migrated);
    assert_eq!(state.version, INITIAL_VERSION + 1);
}

#[test]
fn test_do_upgrade_runs_once() {
    let env = Env::default();
    let s = setup(&env);
    mint_tokens(&env, &s, &Address::generate(&env), 10);

    s.reserve.do_upgrade(&s.owner);
    let balance = s.reserve.pool_balance();

    let result = s.reserve.try_do_upgrade(&s.owner);
    assert_eq!(result, Err(Ok(ReserveError::AlreadyMigrated)));
    assert_eq!(s.reserve.pool_balance(), balance);
}

#[test]
fn test_do_upgrade_insufficient_reserve() {
    let env = Env::default();
    let s = setup(&env);
    mint_tokens(&env, &s, &Address::generate(&env), 1);

    let result = s.reserve.try_do_upgrade(&s.owner);
    assert_eq!(result, Err(Ok(ReserveError::InsufficientReserve)));

    // Failed migration leaves the guard unset
    assert!(!s.reserve.state().migrated);
}

#[test]
fn test_do_upgrade_only_owner() {
    let env = Env::default();
    let s = setup(&env);
    let stranger = Address::generate(&env);

    let result = s.reserve.try_do_upgrade(&stranger);
    assert_eq!(result, Err(Ok(ReserveError::Unauthorized)));
}

//! # Storage
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type     | Description                          |
//! |----------------|----------|--------------------------------------|
//! | `ProjectName`  | `String` | Immutable project name               |
//! | `PassportHash` | `String` | Immutable IPFS hash of the image     |
//! | `NextTokenId`  | `u64`    | Next token id to mint (starts at 1)  |
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key              | Type         | Description                     |
//! |------------------|--------------|---------------------------------|
//! | `Status(user)`   | `MintStatus` | Per-user mint eligibility       |
//! | `Owner(id)`      | `Address`    | Token owner                     |
//! | `Balance(owner)` | `u32`        | Number of tokens held (0 or 1)  |
//!
//! Absent `Status` entries read as `Unavailable`, so users never need to be
//! enrolled before an admin flips them to `Available`.

use passport_core::storage::{bump_instance, bump_persistent};
use passport_core::{Error, MintStatus};
use soroban_sdk::{contracttype, panic_with_error, Address, Env, String};

/// Token ids start at 1, matching ERC-721 counters that pre-increment.
const FIRST_TOKEN_ID: u64 = 1;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Project display name (Instance).
    ProjectName,
    /// Passport image content hash (Instance).
    PassportHash,
    /// Token id counter (Instance).
    NextTokenId,
    /// Mint status keyed by user (Persistent).
    Status(Address),
    /// Owner keyed by token id (Persistent).
    Owner(u64),
    /// Token count keyed by owner (Persistent).
    Balance(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

pub fn set_metadata(env: &Env, name: &String, passport_hash: &String) {
    env.storage().instance().set(&DataKey::ProjectName, name);
    env.storage()
        .instance()
        .set(&DataKey::PassportHash, passport_hash);
    bump_instance(env);
}

pub fn get_project_name(env: &Env) -> String {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::ProjectName)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

pub fn get_passport_hash(env: &Env) -> String {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::PassportHash)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

/// Reads, increments, and stores the token counter.
/// Returns the id to use for the *current* mint (pre-increment value).
pub fn get_and_increment_token_id(env: &Env) -> u64 {
    let current = peek_next_token_id(env);
    env.storage()
        .instance()
        .set(&DataKey::NextTokenId, &(current + 1));
    current
}

pub fn peek_next_token_id(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::NextTokenId)
        .unwrap_or(FIRST_TOKEN_ID)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

pub fn get_status(env: &Env, user: &Address) -> MintStatus {
    let key = DataKey::Status(user.clone());
    match env.storage().persistent().get(&key) {
        Some(status) => {
            bump_persistent(env, &key);
            status
        }
        None => MintStatus::default(),
    }
}

pub fn set_status(env: &Env, user: &Address, status: MintStatus) {
    let key = DataKey::Status(user.clone());
    env.storage().persistent().set(&key, &status);
    bump_persistent(env, &key);
}

pub fn get_owner(env: &Env, token_id: u64) -> Option<Address> {
    let key = DataKey::Owner(token_id);
    let owner = env.storage().persistent().get(&key);
    if owner.is_some() {
        bump_persistent(env, &key);
    }
    owner
}

pub fn get_balance(env: &Env, owner: &Address) -> u32 {
    let key = DataKey::Balance(owner.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

/// Record `token_id` as owned by `owner` and bump the owner's balance.
pub fn save_token(env: &Env, token_id: u64, owner: &Address) {
    let owner_key = DataKey::Owner(token_id);
    let balance_key = DataKey::Balance(owner.clone());
    let balance = get_balance(env, owner);

    env.storage().persistent().set(&owner_key, owner);
    env.storage().persistent().set(&balance_key, &(balance + 1));
    bump_persistent(env, &owner_key);
    bump_persistent(env, &balance_key);
}

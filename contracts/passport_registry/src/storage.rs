//! # Storage
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                | Type            | Description                         |
//! |--------------------|-----------------|-------------------------------------|
//! | `ProjectList`      | `Vec<Address>`  | Project contracts, registration order |
//! | `Project(address)` | `ProjectInfo`   | Cached name and passport hash        |
//!
//! Name and hash are immutable on the project side, so caching them at
//! registration keeps `get_all_project_info` free of cross-contract calls.

use passport_core::storage::bump_persistent;
use passport_core::ProjectInfo;
use soroban_sdk::{contracttype, Address, Env, Vec};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Registered project addresses in insertion order (Persistent).
    ProjectList,
    /// Project info keyed by contract address (Persistent).
    Project(Address),
}

pub fn is_registered(env: &Env, project: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Project(project.clone()))
}

pub fn load_project_list(env: &Env) -> Vec<Address> {
    let key = DataKey::ProjectList;
    match env.storage().persistent().get(&key) {
        Some(list) => {
            bump_persistent(env, &key);
            list
        }
        None => Vec::new(env),
    }
}

/// Append `info` to the registry. Callers must check [`is_registered`] first.
pub fn save_project(env: &Env, info: &ProjectInfo) {
    let list_key = DataKey::ProjectList;
    let info_key = DataKey::Project(info.address.clone());

    let mut list = load_project_list(env);
    list.push_back(info.address.clone());

    env.storage().persistent().set(&list_key, &list);
    env.storage().persistent().set(&info_key, info);
    bump_persistent(env, &list_key);
    bump_persistent(env, &info_key);
}

pub fn load_project(env: &Env, project: &Address) -> Option<ProjectInfo> {
    let key = DataKey::Project(project.clone());
    let info = env.storage().persistent().get(&key);
    if info.is_some() {
        bump_persistent(env, &key);
    }
    info
}

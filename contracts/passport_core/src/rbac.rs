//! # Role-Based Access Control
//!
//! Each address holds at most one [`Role`]. `Admin` is a superset of
//! `Controller`, so every guard that asks for `Controller` also admits an
//! admin.
//!
//! | Action                | Required role |
//! |-----------------------|---------------|
//! | grant / revoke role   | `Admin`       |
//! | change mint status    | `Controller`  |
//! | mint on behalf of     | `Controller`  |
//! | register project      | `Controller`  |
//! | batch mint            | `Admin`       |
//!
//! ## Events
//!
//! * `("role_set", target)` → [`RoleChanged`]
//! * `("role_del", target)` → [`RoleChanged`]

use soroban_sdk::{contracttype, panic_with_error, symbol_short, Address, Env};

use crate::storage::{bump_instance, bump_persistent};
use crate::types::Role;
use crate::Error;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RbacKey {
    /// Set once by [`init_admin`] (Instance).
    Initialized,
    /// Role held by an address (Persistent).
    Role(Address),
}

/// Event payload for role grants and revocations.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleChanged {
    pub target: Address,
    pub role: Role,
    pub caller: Address,
}

/// Mark the contract initialised and make `admin` its first admin.
pub fn init_admin(env: &Env, admin: &Address) {
    if is_initialized(env) {
        panic_with_error!(env, Error::AlreadyInitialized);
    }
    env.storage().instance().set(&RbacKey::Initialized, &true);
    bump_instance(env);
    store_role(env, admin, Role::Admin);
    emit_role_set(env, admin, Role::Admin, admin);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&RbacKey::Initialized)
}

pub fn require_initialized(env: &Env) {
    if !is_initialized(env) {
        panic_with_error!(env, Error::NotInitialized);
    }
}

/// Grant `role` to `target`, replacing any role it held. `caller` must be an
/// admin and may not downgrade itself.
pub fn grant_role(env: &Env, caller: &Address, target: &Address, role: Role) {
    caller.require_auth();
    require_admin(env, caller);
    if caller == target && role != Role::Admin {
        panic_with_error!(env, Error::CannotRevokeSelf);
    }
    store_role(env, target, role);
    emit_role_set(env, target, role, caller);
}

/// Remove whatever role `target` holds. Admins cannot revoke themselves,
/// which keeps at least one admin in place.
pub fn revoke_role(env: &Env, caller: &Address, target: &Address) {
    caller.require_auth();
    require_admin(env, caller);
    if caller == target {
        panic_with_error!(env, Error::CannotRevokeSelf);
    }
    let key = RbacKey::Role(target.clone());
    let role: Role = match env.storage().persistent().get(&key) {
        Some(role) => role,
        None => panic_with_error!(env, Error::RoleNotFound),
    };
    env.storage().persistent().remove(&key);
    env.events().publish(
        (symbol_short!("role_del"), target.clone()),
        RoleChanged {
            target: target.clone(),
            role,
            caller: caller.clone(),
        },
    );
}

pub fn role_of(env: &Env, address: &Address) -> Option<Role> {
    let key = RbacKey::Role(address.clone());
    let role = env.storage().persistent().get(&key);
    if role.is_some() {
        bump_persistent(env, &key);
    }
    role
}

/// `true` if `address` holds `role` or a role that covers it.
pub fn has_role(env: &Env, address: &Address, role: Role) -> bool {
    role_of(env, address).map_or(false, |held| held.covers(role))
}

pub fn require_admin(env: &Env, address: &Address) {
    require_role(env, address, Role::Admin);
}

pub fn require_controller(env: &Env, address: &Address) {
    require_role(env, address, Role::Controller);
}

fn require_role(env: &Env, address: &Address, role: Role) {
    require_initialized(env);
    if !has_role(env, address, role) {
        panic_with_error!(env, Error::NotAuthorized);
    }
}

fn store_role(env: &Env, target: &Address, role: Role) {
    let key = RbacKey::Role(target.clone());
    env.storage().persistent().set(&key, &role);
    bump_persistent(env, &key);
}

fn emit_role_set(env: &Env, target: &Address, role: Role, caller: &Address) {
    env.events().publish(
        (symbol_short!("role_set"), target.clone()),
        RoleChanged {
            target: target.clone(),
            role,
            caller: caller.clone(),
        },
    );
}

//! # UNCHAIN Passport contract
//!
//! One instance of `PassportContract` is deployed per learning project. It
//! is an ERC-721 style collection whose tokens ("passports") prove that a
//! learner completed the project.
//!
//! | Phase        | Entry Point(s)                                                 |
//! |--------------|----------------------------------------------------------------|
//! | Bootstrap    | [`PassportContract::init`]                                     |
//! | Role admin   | `grant_role`, `revoke_role`                                    |
//! | Eligibility  | `change_status_to_unavailable`, `_available`, `_done`         |
//! | Minting      | [`PassportContract::mint`], [`PassportContract::mint_by_admin`] |
//! | Queries      | `get_project_name`, `get_passport_hash`, `get_user_mint_status`, `token_uri`, `owner_of`, `balance`, `total_supply`, `role_of`, `has_role` |
//!
//! ## Mint guard
//!
//! A learner mints only while their status is `Available`. Every successful
//! mint moves the recipient to `Done`, and an address can hold at most one
//! passport per project, so resetting a status to `Available` never allows
//! a second token.
//!
//! Authorization is delegated to `passport_core::rbac`; storage access to
//! [`storage`].

#![no_std]

use passport_core::{rbac, Error, MintStatus, Role};
use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Env, String};

pub mod events;
mod metadata;
mod storage;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_metadata;

#[contract]
pub struct PassportContract;

#[contractimpl]
impl PassportContract {
    /// Initialise the project and make `admin` its first admin.
    ///
    /// `name` and `passport_hash` are immutable afterwards. Both must be
    /// 1..=64 printable ASCII characters without `"` or `\`.
    pub fn init(env: Env, admin: Address, name: String, passport_hash: String) {
        admin.require_auth();
        if !metadata::is_valid_field(&name) || !metadata::is_valid_field(&passport_hash) {
            panic_with_error!(&env, Error::InvalidMetadata);
        }
        rbac::init_admin(&env, &admin);
        storage::set_metadata(&env, &name, &passport_hash);
    }

    // ─────────────────────────────────────────────────────────
    // Role management
    // ─────────────────────────────────────────────────────────

    /// Grant `role` to `target`. `caller` must hold `Admin`.
    ///
    /// The registry contract needs `Controller` here before it can change
    /// statuses or mint on this project's behalf.
    pub fn grant_role(env: Env, caller: Address, target: Address, role: Role) {
        rbac::grant_role(&env, &caller, &target, role);
    }

    pub fn revoke_role(env: Env, caller: Address, target: Address) {
        rbac::revoke_role(&env, &caller, &target);
    }

    pub fn role_of(env: Env, address: Address) -> Option<Role> {
        rbac::role_of(&env, &address)
    }

    pub fn has_role(env: Env, address: Address, role: Role) -> bool {
        rbac::has_role(&env, &address, role)
    }

    // ─────────────────────────────────────────────────────────
    // Project metadata
    // ─────────────────────────────────────────────────────────

    pub fn get_project_name(env: Env) -> String {
        storage::get_project_name(&env)
    }

    pub fn get_passport_hash(env: Env) -> String {
        storage::get_passport_hash(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Mint status
    // ─────────────────────────────────────────────────────────

    /// Current status of `user`; `Unavailable` if never set.
    pub fn get_user_mint_status(env: Env, user: Address) -> MintStatus {
        storage::get_status(&env, &user)
    }

    pub fn change_status_to_unavailable(env: Env, caller: Address, user: Address) {
        change_status(&env, &caller, &user, MintStatus::Unavailable);
    }

    pub fn change_status_to_available(env: Env, caller: Address, user: Address) {
        change_status(&env, &caller, &user, MintStatus::Available);
    }

    pub fn change_status_to_done(env: Env, caller: Address, user: Address) {
        change_status(&env, &caller, &user, MintStatus::Done);
    }

    // ─────────────────────────────────────────────────────────
    // Minting
    // ─────────────────────────────────────────────────────────

    /// Mint a passport to `recipient`, who must sign and whose status must
    /// be exactly `Available`. Returns the new token id.
    pub fn mint(env: Env, recipient: Address) -> u64 {
        recipient.require_auth();
        rbac::require_initialized(&env);

        if storage::get_status(&env, &recipient) != MintStatus::Available {
            panic_with_error!(&env, Error::StatusNotAvailable);
        }

        mint_token(&env, &recipient, &recipient)
    }

    /// Mint a passport to `recipient` regardless of its status.
    ///
    /// `caller` must hold `Controller` (or `Admin`) and is the address
    /// authorised here. `minter` is who the mint is attributed to in the
    /// `status` and `minted` events; the registry passes the admin that
    /// started the batch.
    ///
    /// Unlike a plain ERC-721 mint, an address that already holds a
    /// passport from this project is rejected with `AlreadyMinted`, so a
    /// batch that names the same recipient twice fails as a whole.
    pub fn mint_by_admin(
        env: Env,
        caller: Address,
        minter: Address,
        recipient: Address,
    ) -> u64 {
        caller.require_auth();
        rbac::require_controller(&env, &caller);
        mint_token(&env, &minter, &recipient)
    }

    // ─────────────────────────────────────────────────────────
    // ERC-721 style reads
    // ─────────────────────────────────────────────────────────

    /// `data:application/json;base64,...` metadata for `token_id`.
    pub fn token_uri(env: Env, token_id: u64) -> String {
        if storage::get_owner(&env, token_id).is_none() {
            panic_with_error!(&env, Error::TokenNotFound);
        }
        metadata::token_uri(
            &env,
            &storage::get_project_name(&env),
            &storage::get_passport_hash(&env),
        )
    }

    pub fn owner_of(env: Env, token_id: u64) -> Address {
        storage::get_owner(&env, token_id)
            .unwrap_or_else(|| panic_with_error!(&env, Error::TokenNotFound))
    }

    pub fn balance(env: Env, owner: Address) -> u32 {
        storage::get_balance(&env, &owner)
    }

    pub fn total_supply(env: Env) -> u64 {
        storage::peek_next_token_id(&env) - 1
    }
}

fn change_status(env: &Env, caller: &Address, user: &Address, status: MintStatus) {
    caller.require_auth();
    rbac::require_controller(env, caller);
    storage::set_status(env, user, status);
    events::emit_status_changed(env, user, status, caller);
}

fn mint_token(env: &Env, minter: &Address, recipient: &Address) -> u64 {
    if storage::get_balance(env, recipient) > 0 {
        panic_with_error!(env, Error::AlreadyMinted);
    }

    let token_id = storage::get_and_increment_token_id(env);
    storage::save_token(env, token_id, recipient);
    storage::set_status(env, recipient, MintStatus::Done);

    events::emit_status_changed(env, recipient, MintStatus::Done, minter);
    events::emit_token_minted(env, minter, recipient, token_id);
    token_id
}

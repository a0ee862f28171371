//! # Passport Registry Contract
//!
//! `PassportRegistry` keeps the list of passport (project) contracts and is
//! the single entry point a front-end talks to. It answers "which passports
//! exist and what is my status on each", and forwards status changes and
//! mints to the individual project contracts.
//!
//! | Phase        | Entry Point(s)                                                       |
//! |--------------|----------------------------------------------------------------------|
//! | Bootstrap    | [`PassportRegistry::init`]                                           |
//! | Role admin   | `grant_controller_role`, `grant_role`, `revoke_role`                 |
//! | Registration | [`PassportRegistry::add_project_contract_address`]                   |
//! | Eligibility  | `change_status_to_unavailable`, `_available`, `_done`                |
//! | Minting      | [`PassportRegistry::mint`], [`PassportRegistry::multi_mint`]         |
//! | Queries      | `get_all_project_info`, `get_user_project_info_all`, `get_user_mint_status`, `role_of`, `has_role` |
//!
//! ## Forwarding
//!
//! Forwarded calls reach the project with the registry's own address as
//! `caller`, so each project admin must grant the registry `Controller`
//! on that project. Forwarding does not require the project to be
//! registered here.

#![no_std]

use passport_core::{
    rbac, Error, MintStatus, PassportClient, ProjectInfo, Role, UserProjectInfo,
};
use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Env, Vec};

pub mod events;
mod storage;

#[cfg(test)]
mod test_events;

#[contract]
pub struct PassportRegistry;

#[contractimpl]
impl PassportRegistry {
    /// Initialise the registry and make `admin` its first admin.
    pub fn init(env: Env, admin: Address) {
        admin.require_auth();
        rbac::init_admin(&env, &admin);
    }

    // ─────────────────────────────────────────────────────────
    // Role management
    // ─────────────────────────────────────────────────────────

    /// Grant `Controller` to `target`. `caller` must hold `Admin`.
    pub fn grant_controller_role(env: Env, caller: Address, target: Address) {
        rbac::grant_role(&env, &caller, &target, Role::Controller);
    }

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
    // Registration
    // ─────────────────────────────────────────────────────────

    /// Register a passport contract. Each address can be added once.
    pub fn add_project_contract_address(env: Env, caller: Address, project: Address) {
        caller.require_auth();
        rbac::require_controller(&env, &caller);

        if storage::is_registered(&env, &project) {
            panic_with_error!(&env, Error::ProjectAlreadyAdded);
        }

        let client = PassportClient::new(&env, &project);
        let info = ProjectInfo {
            address: project.clone(),
            name: client.get_project_name(),
            passport_hash: client.get_passport_hash(),
        };
        storage::save_project(&env, &info);

        events::emit_project_added(&env, &project, &info.name, &info.passport_hash, &caller);
    }

    /// All registered projects in registration order.
    pub fn get_all_project_info(env: Env) -> Vec<ProjectInfo> {
        let mut infos = Vec::new(&env);
        for project in storage::load_project_list(&env).iter() {
            if let Some(info) = storage::load_project(&env, &project) {
                infos.push_back(info);
            }
        }
        infos
    }

    /// `user`'s live mint status on every registered project.
    pub fn get_user_project_info_all(env: Env, user: Address) -> Vec<UserProjectInfo> {
        let mut rows = Vec::new(&env);
        for info in Self::get_all_project_info(env.clone()).iter() {
            let status = PassportClient::new(&env, &info.address).get_user_mint_status(&user);
            rows.push_back(UserProjectInfo {
                address: info.address,
                passport_hash: info.passport_hash,
                status,
            });
        }
        rows
    }

    // ─────────────────────────────────────────────────────────
    // Mint status (forwarded)
    // ─────────────────────────────────────────────────────────

    pub fn get_user_mint_status(env: Env, project: Address, user: Address) -> MintStatus {
        PassportClient::new(&env, &project).get_user_mint_status(&user)
    }

    pub fn change_status_to_unavailable(
        env: Env,
        caller: Address,
        project: Address,
        user: Address,
    ) {
        let client = controller_client(&env, &caller, &project);
        client.change_status_to_unavailable(&env.current_contract_address(), &user);
    }

    pub fn change_status_to_available(env: Env, caller: Address, project: Address, user: Address) {
        let client = controller_client(&env, &caller, &project);
        client.change_status_to_available(&env.current_contract_address(), &user);
    }

    pub fn change_status_to_done(env: Env, caller: Address, project: Address, user: Address) {
        let client = controller_client(&env, &caller, &project);
        client.change_status_to_done(&env.current_contract_address(), &user);
    }

    // ─────────────────────────────────────────────────────────
    // Minting (forwarded)
    // ─────────────────────────────────────────────────────────

    /// Mint `user`'s own passport from `project`. The project enforces the
    /// `Available` precondition.
    pub fn mint(env: Env, user: Address, project: Address) -> u64 {
        user.require_auth();
        PassportClient::new(&env, &project).mint(&user)
    }

    /// Mint `recipients[i]` a passport from `projects[i]` for every `i`.
    ///
    /// `caller` must hold `Admin`. Statuses are not checked. Returns the
    /// token ids in input order.
    pub fn multi_mint(
        env: Env,
        caller: Address,
        projects: Vec<Address>,
        recipients: Vec<Address>,
    ) -> Vec<u64> {
        caller.require_auth();
        rbac::require_admin(&env, &caller);

        if projects.len() != recipients.len() {
            panic_with_error!(&env, Error::LengthMismatch);
        }

        let registry = env.current_contract_address();
        let mut token_ids = Vec::new(&env);
        for (project, recipient) in projects.iter().zip(recipients.iter()) {
            let token_id =
                PassportClient::new(&env, &project).mint_by_admin(&registry, &caller, &recipient);
            token_ids.push_back(token_id);
        }
        token_ids
    }
}

fn controller_client<'a>(env: &'a Env, caller: &Address, project: &Address) -> PassportClient<'a> {
    caller.require_auth();
    rbac::require_controller(env, caller);
    PassportClient::new(env, project)
}

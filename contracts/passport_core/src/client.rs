//! Cross-contract interface of a passport contract.
//!
//! The registry never links the passport crate; it talks to project
//! contracts through the generated [`PassportClient`]. Signatures here must
//! stay in sync with `passport::PassportContract`.

use soroban_sdk::{contractclient, Address, Env, String};

use crate::types::MintStatus;

#[contractclient(name = "PassportClient")]
pub trait PassportInterface {
    fn get_project_name(env: Env) -> String;

    fn get_passport_hash(env: Env) -> String;

    fn get_user_mint_status(env: Env, user: Address) -> MintStatus;

    fn change_status_to_unavailable(env: Env, caller: Address, user: Address);

    fn change_status_to_available(env: Env, caller: Address, user: Address);

    fn change_status_to_done(env: Env, caller: Address, user: Address);

    fn mint(env: Env, recipient: Address) -> u64;

    fn mint_by_admin(env: Env, caller: Address, minter: Address, recipient: Address) -> u64;
}

//! Events published by the passport contract.
//!
//! | Topic                  | Data            |
//! |------------------------|-----------------|
//! | `("status", user)`     | [`StatusChanged`] |
//! | `("minted", recipient)`| [`TokenMinted`]   |
//!
//! Role changes are published by `passport_core::rbac`.

use passport_core::MintStatus;
use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusChanged {
    pub user: Address,
    pub status: MintStatus,
    pub changed_by: Address,
}

/// Emitted once per mint; `minter` is the recipient itself for self-mints.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenMinted {
    pub minter: Address,
    pub recipient: Address,
    pub token_id: u64,
}

pub fn emit_status_changed(env: &Env, user: &Address, status: MintStatus, changed_by: &Address) {
    env.events().publish(
        (symbol_short!("status"), user.clone()),
        StatusChanged {
            user: user.clone(),
            status,
            changed_by: changed_by.clone(),
        },
    );
}

pub fn emit_token_minted(env: &Env, minter: &Address, recipient: &Address, token_id: u64) {
    env.events().publish(
        (symbol_short!("minted"), recipient.clone()),
        TokenMinted {
            minter: minter.clone(),
            recipient: recipient.clone(),
            token_id,
        },
    );
}

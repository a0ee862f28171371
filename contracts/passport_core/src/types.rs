//! # Types
//!
//! ## Mint status
//!
//! Every `(project, user)` pair carries a [`MintStatus`]. The discriminants
//! are part of the public ABI (front-ends compare against `0`, `1`, `2`):
//!
//! ```text
//! Unavailable (0) ──► Available (1) ──► Done (2)
//!        ▲                  │
//!        └──────────────────┘   (any state may be written by a controller)
//! ```
//!
//! Minting is the only transition a learner can trigger, and only from
//! `Available`.

use soroban_sdk::{contracttype, Address, String};

/// Per-user eligibility for a single project's passport.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum MintStatus {
    Unavailable = 0,
    Available = 1,
    Done = 2,
}

impl Default for MintStatus {
    fn default() -> Self {
        MintStatus::Unavailable
    }
}

/// Access role held by an address. An address holds at most one role.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Role {
    /// Grants roles, batch-mints, and has every `Controller` permission.
    Admin,
    /// Registers projects, changes mint statuses, mints on behalf of users.
    Controller,
}

impl Role {
    /// Whether holding `self` satisfies a check for `required`.
    pub fn covers(&self, required: Role) -> bool {
        matches!(
            (self, required),
            (Role::Admin, _) | (Role::Controller, Role::Controller)
        )
    }
}

/// Registry view of one project contract.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectInfo {
    pub address: Address,
    pub name: String,
    /// IPFS content hash of the passport image.
    pub passport_hash: String,
}

/// One row of a user's passport overview.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserProjectInfo {
    pub address: Address,
    pub passport_hash: String,
    pub status: MintStatus,
}

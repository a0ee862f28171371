//! # Passport core
//!
//! Building blocks shared by the `passport` and `passport_registry` contracts:
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`types`]   | `MintStatus`, `Role`, project info views                   |
//! | [`rbac`]    | role storage, grant/revoke, authorization guards           |
//! | [`storage`] | TTL constants and bump helpers                             |
//! | [`client`]  | `PassportClient`, the cross-contract view of a passport    |
//!
//! Both contracts panic with the same [`Error`] so a revert raised inside a
//! project contract surfaces unchanged through the registry.

#![no_std]

use soroban_sdk::contracterror;

pub mod client;
pub mod rbac;
pub mod storage;
pub mod types;


pub use client::{PassportClient, PassportInterface};
pub use types::{MintStatus, ProjectInfo, Role, UserProjectInfo};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized      = 1,
    AlreadyInitialized  = 2,
    NotAuthorized       = 3,
    RoleNotFound        = 4,
    /// "you're mint status is not AVAILABLE!"
    StatusNotAvailable  = 5,
    AlreadyMinted       = 6,
    TokenNotFound       = 7,
    /// "the address is already added!"
    ProjectAlreadyAdded = 8,
    /// "Length of data array must be the same."
    LengthMismatch      = 9,
    InvalidMetadata     = 10,
    CannotRevokeSelf    = 11,
}

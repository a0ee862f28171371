//! Canonical event types emitted by the passport contracts.
//!
//! These mirror the Soroban events published by
//! `contracts/passport/src/events.rs`, `contracts/passport_registry/src/events.rs`
//! and `contracts/passport_core/src/rbac.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The registry added a project contract (`proj_add` topic).
    ProjectAdded,
    /// A user's mint status changed on a project (`status` topic).
    StatusChanged,
    /// A passport was minted (`minted` topic).
    TokenMinted,
    /// A role was granted or replaced (`role_set` topic).
    RoleSet,
    /// A role was revoked (`role_del` topic).
    RoleDel,
    /// An event we don't recognise.
    Unknown,
}

impl EventKind {
    /// Every topic symbol the indexer subscribes to.
    pub const TOPICS: [&'static str; 5] = ["proj_add", "status", "minted", "role_set", "role_del"];

    /// Parse the leading topic symbol into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "proj_add" => Self::ProjectAdded,
            "status" => Self::StatusChanged,
            "minted" => Self::TokenMinted,
            "role_set" => Self::RoleSet,
            "role_del" => Self::RoleDel,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectAdded => "project_added",
            Self::StatusChanged => "status_changed",
            Self::TokenMinted => "token_minted",
            Self::RoleSet => "role_set",
            Self::RoleDel => "role_del",
            Self::Unknown => "unknown",
        }
    }
}

/// Off-chain mirror of the contracts' `MintStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MintStatus {
    Unavailable,
    Available,
    Done,
}

impl MintStatus {
    /// Decode the on-chain discriminant (`0`, `1`, `2`).
    pub fn from_discriminant(value: u64) -> Option<Self> {
        match value {
            0 => Some(Self::Unavailable),
            1 => Some(Self::Available),
            2 => Some(Self::Done),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "unavailable" => Some(Self::Unavailable),
            "available" => Some(Self::Available),
            "done" => Some(Self::Done),
            other => other.parse().ok().and_then(Self::from_discriminant),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Available => "available",
            Self::Done => "done",
        }
    }
}

/// A fully decoded passport event, ready to be stored in the database.
///
/// `subject` is the address in the second topic: the project for
/// `proj_add`, the user for `status`/`minted`, the target for role events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassportEvent {
    pub event_id: String,
    pub event_type: String,
    pub contract_id: String,
    pub subject: Option<String>,
    pub actor: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    pub token_id: Option<i64>,
    pub name: Option<String>,
    pub passport_hash: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub contract_id: String,
    pub subject: Option<String>,
    pub actor: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    pub token_id: Option<i64>,
    pub name: Option<String>,
    pub passport_hash: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// A project registered with the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectRecord {
    pub address: String,
    pub name: String,
    pub passport_hash: String,
    pub ledger: i64,
}

/// A minted passport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TokenRecord {
    pub token_id: i64,
    pub owner: String,
    pub minter: Option<String>,
    pub ledger: i64,
    pub tx_hash: Option<String>,
}

/// One user's standing on one registered project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPassport {
    pub project: String,
    pub name: String,
    pub passport_hash: String,
    pub status: MintStatus,
    pub token_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_round_trip_through_kind() {
        for topic in EventKind::TOPICS {
            assert_ne!(EventKind::from_topic(topic), EventKind::Unknown, "{topic}");
        }
        assert_eq!(EventKind::from_topic("funded"), EventKind::Unknown);
    }

    #[test]
    fn status_parsing() {
        assert_eq!(MintStatus::parse("1"), Some(MintStatus::Available));
        assert_eq!(MintStatus::parse("Done"), Some(MintStatus::Done));
        assert_eq!(MintStatus::parse("unavailable"), Some(MintStatus::Unavailable));
        assert_eq!(MintStatus::parse("7"), None);
        assert_eq!(MintStatus::from_discriminant(2), Some(MintStatus::Done));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&MintStatus::Available).unwrap();
        assert_eq!(json, "\"available\"");
    }
}

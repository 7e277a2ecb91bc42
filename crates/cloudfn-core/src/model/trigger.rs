//! Trigger kinds

use crate::error::FunctionError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The event type that invokes a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerKind {
    /// HTTP request
    Http,
    /// Cloud Storage object finalize
    Storage,
    /// Firestore document created
    FirestoreCreate,
    /// Firestore document updated
    FirestoreUpdate,
    /// Firestore document deleted
    FirestoreDelete,
    /// Any Firestore document write
    FirestoreWrite,
    /// Event function whose event type could not be determined
    Unknown,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 7] = [
        TriggerKind::Http,
        TriggerKind::Storage,
        TriggerKind::FirestoreCreate,
        TriggerKind::FirestoreUpdate,
        TriggerKind::FirestoreDelete,
        TriggerKind::FirestoreWrite,
        TriggerKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Http => "http",
            TriggerKind::Storage => "storage",
            TriggerKind::FirestoreCreate => "firestore-create",
            TriggerKind::FirestoreUpdate => "firestore-update",
            TriggerKind::FirestoreDelete => "firestore-delete",
            TriggerKind::FirestoreWrite => "firestore-write",
            TriggerKind::Unknown => "unknown",
        }
    }

    pub fn is_firestore(&self) -> bool {
        self.firestore_operation().is_some()
    }

    /// Document operation name for Firestore triggers ("create", "update", ...)
    pub fn firestore_operation(&self) -> Option<&'static str> {
        match self {
            TriggerKind::FirestoreCreate => Some("create"),
            TriggerKind::FirestoreUpdate => Some("update"),
            TriggerKind::FirestoreDelete => Some("delete"),
            TriggerKind::FirestoreWrite => Some("write"),
            _ => None,
        }
    }

    /// Whether a deploy command template exists for this kind
    pub fn is_deployable(&self) -> bool {
        !matches!(self, TriggerKind::Unknown)
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerKind {
    type Err = FunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        TriggerKind::ALL
            .into_iter()
            .filter(|kind| *kind != TriggerKind::Unknown)
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| FunctionError::UnknownTrigger(s.to_string()))
    }
}

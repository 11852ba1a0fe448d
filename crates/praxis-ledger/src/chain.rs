//! The append-only, hash-linked audit chain.
//!
//! Every lifecycle event (declared, executed, revoked, expired) becomes one
//! entry whose hash covers its own fields plus the previous entry's hash.
//! Tampering with any stored entry breaks the recomputation for that entry
//! or the linkage of the next one; `verify` detects both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use praxis_core::hash::canonical_hash;

/// `previous_hash` of the genesis entry: 64 zero characters.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Event category of a chain entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    IntentDeclared,
    IntentExecuted,
    IntentRevoked,
    IntentExpired,
}

/// One link in the chain. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditChainEntry {
    pub record_id: String,
    pub previous_hash: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: AuditEventKind,
    /// Event summary, never the full intent/execution record.
    pub data: serde_json::Value,
    /// SHA-256 over the canonical JSON of all other fields.
    pub hash: String,
}

/// Hashable view of an entry — everything except the hash itself.
#[derive(Serialize)]
struct HashableEntry<'a> {
    record_id: &'a str,
    previous_hash: &'a str,
    timestamp: &'a DateTime<Utc>,
    #[serde(rename = "type")]
    kind: &'a AuditEventKind,
    data: &'a serde_json::Value,
}

fn entry_hash(entry: &AuditChainEntry) -> String {
    canonical_hash(&HashableEntry {
        record_id: &entry.record_id,
        previous_hash: &entry.previous_hash,
        timestamp: &entry.timestamp,
        kind: &entry.kind,
        data: &entry.data,
    })
}

/// The process-wide append-only event sequence.
///
/// Seeded with a single genesis entry at construction and never reset.
/// `append` is the only write path; entries are never edited or removed.
#[derive(Debug)]
pub struct AuditChain {
    entries: Vec<AuditChainEntry>,
}

impl AuditChain {
    /// Create a chain seeded with its genesis entry.
    pub fn new() -> Self {
        let mut chain = Self { entries: Vec::new() };
        chain.append(
            AuditEventKind::IntentDeclared,
            serde_json::json!({
                "type": "genesis",
                "message": "Praxis audit chain initialized",
                "timestamp": Utc::now(),
            }),
        );
        chain
    }

    /// Hash of the most recent entry, or the all-zero genesis hash.
    pub fn last_hash(&self) -> &str {
        self.entries.last().map_or(GENESIS_HASH, |e| e.hash.as_str())
    }

    /// Append a new entry linked to the current tail and return it.
    pub fn append(&mut self, kind: AuditEventKind, data: serde_json::Value) -> &AuditChainEntry {
        let mut entry = AuditChainEntry {
            record_id: format!("audit-{}", Uuid::new_v4()),
            previous_hash: self.last_hash().to_string(),
            timestamp: Utc::now(),
            kind,
            data,
            hash: String::new(),
        };
        entry.hash = entry_hash(&entry);

        self.entries.push(entry);
        self.entries.last().expect("entry was just pushed")
    }

    /// Walk the chain and check linkage plus per-entry hash recomputation.
    ///
    /// Returns false on the first mismatch. A false result is evidence of
    /// tampering or storage corruption; there is no automatic repair.
    pub fn verify(&self) -> bool {
        for i in 1..self.entries.len() {
            let entry = &self.entries[i];
            let previous = &self.entries[i - 1];

            if entry.previous_hash != previous.hash {
                tracing::warn!(
                    record_id = %entry.record_id,
                    index = i,
                    "Audit chain linkage mismatch"
                );
                return false;
            }

            if entry_hash(entry) != entry.hash {
                tracing::warn!(
                    record_id = %entry.record_id,
                    index = i,
                    "Audit chain entry hash mismatch"
                );
                return false;
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view of the entries, oldest first.
    pub fn entries(&self) -> &[AuditChainEntry] {
        &self.entries
    }
}

impl Default for AuditChain {
    fn default() -> Self {
        Self::new()
    }
}

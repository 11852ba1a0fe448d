//! Canonical SHA-256 content hashing.
//!
//! Every hash in Praxis — intent fingerprints, execution fingerprints, and
//! audit chain entry hashes — goes through `canonical_hash` so that the same
//! record always produces the same digest regardless of field insertion order.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Compute the canonical SHA-256 hash of any serializable record.
///
/// The record is converted to a `serde_json::Value` first: JSON objects are
/// backed by a sorted map, so keys are ordered recursively before the bytes
/// are hashed. Returns the lowercase hex digest.
///
/// # Panics
///
/// Panics if the value cannot be serialized to JSON. Records flowing through
/// the ledgers are plain data; an unserializable one is a caller bug, not a
/// runtime condition to recover from.
pub fn canonical_hash<T: Serialize>(value: &T) -> String {
    let canonical =
        serde_json::to_value(value).expect("audit record serialization should not fail");
    let bytes =
        serde_json::to_vec(&canonical).expect("audit record serialization should not fail");
    hex::encode(Sha256::digest(&bytes))
}

//! Core domain types for the Praxis intent-execution audit ledgers.
//!
//! These types represent declared intents, the executions carried out under
//! their authority, and the open-ended caller payloads that flow through the
//! system hashed-but-uninterpreted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Identifiers ───────────────────────────────────────────────────

/// Unique, caller-opaque token identifying a declared intent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct IntentToken(pub Uuid);

impl IntentToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IntentToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for IntentToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an execution record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ExecutionId(pub Uuid);

impl ExecutionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Enumerations ──────────────────────────────────────────────────

/// Declared blast radius of an intent. Doubles as the risk tier that
/// selects the consensus policy; the derived `Ord` follows severity.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Lifecycle status of a declared intent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Approved,
    PendingReview,
    Rejected,
    Expired,
    Revoked,
}

impl IntentStatus {
    /// Terminal states admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Expired | Self::Revoked)
    }
}

impl std::fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Approved => "approved",
            Self::PendingReview => "pending_review",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        };
        f.write_str(s)
    }
}

/// Outcome of an execution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    Failed,
    Partial,
    Aborted,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Partial => "partial",
            Self::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

// ── Declaration payloads ──────────────────────────────────────────

/// What an intent claims it will touch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentScope {
    pub estimated_impact: ImpactLevel,
    #[serde(default)]
    pub requires_human_approval: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub systems: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
}

/// The original declaration payload, stored verbatim on the intent.
///
/// `action_type` is a free-form tag ("commit", "deploy", "delete", ...);
/// callers may attach arbitrary extra fields, which pass through unparsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeclareIntentInput {
    pub action_type: String,
    pub description: String,
    pub scope: IntentScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risks_acknowledged: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback_plan: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DeclareIntentInput {
    /// Advisory warnings surfaced at declaration time. These never block
    /// the declaration; they travel back to the caller alongside the token.
    pub fn validation_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.scope.estimated_impact == ImpactLevel::Critical && self.rollback_plan.is_none() {
            warnings.push("Critical impact action without rollback plan".to_string());
        }

        if self.action_type == "delete" && self.rollback_plan.is_none() {
            warnings
                .push("Delete operation without rollback plan - consider adding one".to_string());
        }

        if self.risks_acknowledged.is_empty() {
            warnings
                .push("No risks acknowledged - ensure risks have been considered".to_string());
        }

        warnings
    }
}

/// The action actually carried out under an intent's authority.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionPayload {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(flatten)]
    pub data: BTreeMap<String, serde_json::Value>,
}

/// Execution-time metadata. Only `agent_id` is interpreted by the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionContext {
    pub agent_id: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

// ── Stored records ────────────────────────────────────────────────

/// A declared intent as held by the intent ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredIntent {
    pub token: IntentToken,
    pub input: DeclareIntentInput,
    pub status: IntentStatus,
    pub created_at: DateTime<Utc>,
    /// Supplied at creation, never mutated afterwards.
    pub expires_at: DateTime<Utc>,
    pub declared_by: String,
    /// Content hash of the declaration, computed once at creation.
    /// Independent of the audit chain's own entry hashes.
    pub audit_hash: String,
    /// Ordered, append-only list of execution ids produced under this intent.
    pub executions: Vec<ExecutionId>,
}

/// An execution record as held by the execution ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredExecution {
    pub id: ExecutionId,
    pub intent_token: IntentToken,
    pub payload: ActionPayload,
    pub context: ExecutionContext,
    pub status: ExecutionStatus,
    pub result: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub audit_hash: String,
}

//! The ledger aggregate: intents, executions, and the audit chain behind
//! one write lock.
//!
//! Chain appends read the current tail hash before writing, so every
//! mutating operation and `verify_chain` serialize on the same mutex —
//! two concurrent appends can never claim the same `previous_hash`.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use praxis_core::hash::canonical_hash;
use praxis_core::types::{
    ActionPayload, DeclareIntentInput, ExecutionContext, ExecutionId, ExecutionStatus,
    ImpactLevel, IntentStatus, IntentToken, StoredExecution, StoredIntent,
};
use praxis_core::PraxisError;

use crate::chain::{AuditChain, AuditChainEntry, AuditEventKind};
use crate::storage::{ExecutionStore, IntentStore, MemoryExecutionStore, MemoryIntentStore};

/// Fields covered by an intent's creation-time audit hash.
#[derive(Serialize)]
struct HashableIntent<'a> {
    token: &'a IntentToken,
    input: &'a DeclareIntentInput,
    declared_by: &'a str,
    timestamp: &'a DateTime<Utc>,
}

/// Fields covered by an execution's creation-time audit hash.
#[derive(Serialize)]
struct HashableExecution<'a> {
    execution_id: &'a ExecutionId,
    intent_token: &'a IntentToken,
    payload: &'a ActionPayload,
    context: &'a ExecutionContext,
    status: &'a ExecutionStatus,
    timestamp: &'a DateTime<Utc>,
}

struct LedgerState<I, E> {
    intents: I,
    executions: E,
    chain: AuditChain,
}

/// The authoritative intent/execution store with its audit chain.
///
/// Construct one explicit instance per service (construction seeds the
/// chain's genesis entry) and share it by reference; all methods take
/// `&self` and serialize internally.
pub struct LedgerStore<I = MemoryIntentStore, E = MemoryExecutionStore> {
    inner: Mutex<LedgerState<I, E>>,
}

impl LedgerStore {
    /// Create a store backed by in-memory ledgers.
    pub fn new() -> Self {
        Self::with_backends(MemoryIntentStore::default(), MemoryExecutionStore::default())
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IntentStore, E: ExecutionStore> LedgerStore<I, E> {
    /// Create a store over explicit ledger backends.
    pub fn with_backends(intents: I, executions: E) -> Self {
        Self {
            inner: Mutex::new(LedgerState {
                intents,
                executions,
                chain: AuditChain::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, LedgerState<I, E>> {
        self.inner.lock().expect("ledger mutex poisoned")
    }

    // ── Intent lifecycle ──────────────────────────────────────────

    /// Declare a new intent.
    ///
    /// The intent starts `approved` unless the declaration asks for human
    /// approval or claims critical impact, in which case it starts
    /// `pending_review` and waits on the consensus gate's caller.
    pub fn declare_intent(
        &self,
        input: DeclareIntentInput,
        declared_by: &str,
        expires_at: DateTime<Utc>,
    ) -> StoredIntent {
        let token = IntentToken::new();
        let now = Utc::now();
        let audit_hash = canonical_hash(&HashableIntent {
            token: &token,
            input: &input,
            declared_by,
            timestamp: &now,
        });

        let status = if input.scope.requires_human_approval
            || input.scope.estimated_impact == ImpactLevel::Critical
        {
            IntentStatus::PendingReview
        } else {
            IntentStatus::Approved
        };

        let intent = StoredIntent {
            token,
            status,
            created_at: now,
            expires_at,
            declared_by: declared_by.to_string(),
            audit_hash,
            executions: Vec::new(),
            input,
        };

        let mut state = self.state();
        state.chain.append(
            AuditEventKind::IntentDeclared,
            serde_json::json!({
                "intent_token": token,
                "action_type": intent.input.action_type,
                "description": intent.input.description,
                "declared_by": declared_by,
                "scope": intent.input.scope,
            }),
        );
        state.intents.put(intent.clone());

        tracing::debug!(token = %token, status = %intent.status, "Intent declared");
        intent
    }

    /// Fetch an intent by token.
    ///
    /// This is the sole place expiry is materialized: an `approved` intent
    /// whose `expires_at` has passed transitions to `expired` here, with
    /// exactly one `intent_expired` chain entry, before being returned.
    pub fn get_intent(&self, token: &IntentToken) -> Option<StoredIntent> {
        let mut state = self.state();
        let mut intent = state.intents.get(token)?;

        if intent.status == IntentStatus::Approved && intent.expires_at < Utc::now() {
            intent.status = IntentStatus::Expired;
            state.intents.put(intent.clone());
            state.chain.append(
                AuditEventKind::IntentExpired,
                serde_json::json!({ "intent_token": token }),
            );
            tracing::debug!(token = %token, "Intent expired on read");
        }

        Some(intent)
    }

    /// Overwrite an intent's status — the consensus gate's caller uses this
    /// once a `pending_review` intent collects enough votes.
    ///
    /// Returns false for an unknown token, and for intents already in a
    /// terminal state (`rejected`, `expired`, `revoked` admit no way out).
    pub fn update_status(&self, token: &IntentToken, status: IntentStatus) -> bool {
        let mut state = self.state();
        let Some(mut intent) = state.intents.get(token) else {
            return false;
        };
        if intent.status.is_terminal() {
            return false;
        }

        intent.status = status;
        state.intents.put(intent);
        tracing::debug!(token = %token, status = %status, "Intent status updated");
        true
    }

    /// Revoke an intent. Legal only from `approved` or `pending_review`;
    /// any other status (or an unknown token) is a no-op returning false,
    /// with no chain entry.
    pub fn revoke_intent(&self, token: &IntentToken, reason: &str) -> bool {
        let mut state = self.state();
        let Some(mut intent) = state.intents.get(token) else {
            return false;
        };
        if !matches!(
            intent.status,
            IntentStatus::Approved | IntentStatus::PendingReview
        ) {
            return false;
        }

        intent.status = IntentStatus::Revoked;
        state.intents.put(intent);
        state.chain.append(
            AuditEventKind::IntentRevoked,
            serde_json::json!({
                "intent_token": token,
                "reason": reason,
                "timestamp": Utc::now(),
            }),
        );

        tracing::debug!(token = %token, reason, "Intent revoked");
        true
    }

    /// Snapshot of every intent, in no particular order.
    pub fn list_intents(&self) -> Vec<StoredIntent> {
        self.state().intents.list()
    }

    // ── Executions ────────────────────────────────────────────────

    /// Record an execution carried out under an intent's authority.
    ///
    /// Atomically (under the ledger lock): stores the execution, appends its
    /// id to the parent intent's execution list, and appends one
    /// `intent_executed` chain entry. An unknown intent token is a hard
    /// error — an execution must never exist without its declaring intent.
    pub fn record_execution(
        &self,
        id: ExecutionId,
        intent_token: &IntentToken,
        payload: ActionPayload,
        context: ExecutionContext,
        status: ExecutionStatus,
        result: serde_json::Value,
    ) -> Result<StoredExecution, PraxisError> {
        let mut state = self.state();
        let Some(mut intent) = state.intents.get(intent_token) else {
            return Err(PraxisError::UnknownIntent(*intent_token));
        };

        let now = Utc::now();
        let audit_hash = canonical_hash(&HashableExecution {
            execution_id: &id,
            intent_token,
            payload: &payload,
            context: &context,
            status: &status,
            timestamp: &now,
        });

        let execution = StoredExecution {
            id,
            intent_token: *intent_token,
            payload,
            context,
            status,
            result,
            created_at: now,
            audit_hash,
        };

        state.executions.put(execution.clone());
        intent.executions.push(id);
        state.intents.put(intent);

        state.chain.append(
            AuditEventKind::IntentExecuted,
            serde_json::json!({
                "execution_id": id,
                "intent_token": intent_token,
                "action_type": execution.payload.action_type,
                "status": status,
                "agent_id": execution.context.agent_id,
            }),
        );

        tracing::debug!(
            execution_id = %id,
            token = %intent_token,
            status = %status,
            "Execution recorded"
        );
        Ok(execution)
    }

    /// Fetch an execution by id.
    pub fn get_execution(&self, id: &ExecutionId) -> Option<StoredExecution> {
        self.state().executions.get(id)
    }

    /// Resolve an intent's execution id list, oldest first. Ids that no
    /// longer resolve are skipped rather than failing the whole query.
    pub fn executions_for_intent(&self, token: &IntentToken) -> Vec<StoredExecution> {
        let state = self.state();
        let Some(intent) = state.intents.get(token) else {
            return Vec::new();
        };

        intent
            .executions
            .iter()
            .filter_map(|id| state.executions.get(id))
            .collect()
    }

    // ── Audit chain ───────────────────────────────────────────────

    /// Re-derive the chain's integrity. A false result is evidence of
    /// tampering or corruption and should be escalated, not retried.
    pub fn verify_chain(&self) -> bool {
        self.state().chain.verify()
    }

    /// Number of entries in the chain (genesis included).
    pub fn chain_len(&self) -> usize {
        self.state().chain.len()
    }

    /// Hash of the chain's most recent entry.
    pub fn last_chain_hash(&self) -> String {
        self.state().chain.last_hash().to_string()
    }

    /// Snapshot of the chain entries, oldest first.
    pub fn chain_entries(&self) -> Vec<AuditChainEntry> {
        self.state().chain.entries().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use praxis_core::types::IntentScope;

    fn input(impact: ImpactLevel) -> DeclareIntentInput {
        DeclareIntentInput {
            action_type: "deploy".to_string(),
            description: "Roll out the review service".to_string(),
            scope: IntentScope {
                estimated_impact: impact,
                requires_human_approval: false,
                files: None,
                systems: None,
                data: None,
            },
            rationale: None,
            risks_acknowledged: vec!["downtime".to_string()],
            rollback_plan: Some("redeploy previous tag".to_string()),
            extra: BTreeMap::new(),
        }
    }

    fn payload() -> ActionPayload {
        ActionPayload {
            action_type: "deploy".to_string(),
            data: BTreeMap::from([(
                "target".to_string(),
                serde_json::json!("review-service"),
            )]),
        }
    }

    fn context(agent: &str) -> ExecutionContext {
        ExecutionContext {
            agent_id: agent.to_string(),
            extra: BTreeMap::new(),
        }
    }

    fn in_one_hour() -> DateTime<Utc> {
        Utc::now() + chrono::Duration::hours(1)
    }

    #[test]
    fn low_impact_intent_is_approved_immediately() {
        let store = LedgerStore::new();
        let intent = store.declare_intent(input(ImpactLevel::Low), "agent-7", in_one_hour());
        assert_eq!(intent.status, IntentStatus::Approved);
        assert_eq!(intent.audit_hash.len(), 64);
    }

    #[test]
    fn critical_impact_intent_waits_for_review() {
        let store = LedgerStore::new();
        let intent = store.declare_intent(input(ImpactLevel::Critical), "agent-7", in_one_hour());
        assert_eq!(intent.status, IntentStatus::PendingReview);
    }

    #[test]
    fn human_approval_flag_forces_review() {
        let store = LedgerStore::new();
        let mut declaration = input(ImpactLevel::Low);
        declaration.scope.requires_human_approval = true;
        let intent = store.declare_intent(declaration, "agent-7", in_one_hour());
        assert_eq!(intent.status, IntentStatus::PendingReview);
    }

    #[test]
    fn declaration_appends_one_chain_entry() {
        let store = LedgerStore::new();
        let before = store.chain_len();
        store.declare_intent(input(ImpactLevel::Low), "agent-7", in_one_hour());
        assert_eq!(store.chain_len(), before + 1);

        let entries = store.chain_entries();
        let last = entries.last().unwrap();
        assert_eq!(last.kind, AuditEventKind::IntentDeclared);
        assert_eq!(last.data["action_type"], serde_json::json!("deploy"));
    }

    #[test]
    fn expiry_is_materialized_lazily_exactly_once() {
        let store = LedgerStore::new();
        let expired_at = Utc::now() - chrono::Duration::minutes(5);
        let token = store
            .declare_intent(input(ImpactLevel::Low), "agent-7", expired_at)
            .token;
        let before = store.chain_len();

        let fetched = store.get_intent(&token).unwrap();
        assert_eq!(fetched.status, IntentStatus::Expired);
        assert_eq!(store.chain_len(), before + 1);
        assert_eq!(
            store.chain_entries().last().unwrap().kind,
            AuditEventKind::IntentExpired
        );

        // A second read must not append another entry.
        let again = store.get_intent(&token).unwrap();
        assert_eq!(again.status, IntentStatus::Expired);
        assert_eq!(store.chain_len(), before + 1);
    }

    #[test]
    fn pending_review_intents_do_not_expire() {
        let store = LedgerStore::new();
        let expired_at = Utc::now() - chrono::Duration::minutes(5);
        let token = store
            .declare_intent(input(ImpactLevel::Critical), "agent-7", expired_at)
            .token;

        let fetched = store.get_intent(&token).unwrap();
        assert_eq!(fetched.status, IntentStatus::PendingReview);
    }

    #[test]
    fn revoke_succeeds_once_then_refuses() {
        let store = LedgerStore::new();
        let token = store
            .declare_intent(input(ImpactLevel::Low), "agent-7", in_one_hour())
            .token;
        let before = store.chain_len();

        assert!(store.revoke_intent(&token, "plans changed"));
        assert_eq!(store.chain_len(), before + 1);

        // Second revoke is a no-op with no chain entry.
        assert!(!store.revoke_intent(&token, "plans changed again"));
        assert_eq!(store.chain_len(), before + 1);
    }

    #[test]
    fn revoke_unknown_token_leaves_chain_untouched() {
        let store = LedgerStore::new();
        let before = store.chain_len();
        assert!(!store.revoke_intent(&IntentToken::new(), "nothing there"));
        assert_eq!(store.chain_len(), before);
    }

    #[test]
    fn update_status_approves_pending_intent() {
        let store = LedgerStore::new();
        let token = store
            .declare_intent(input(ImpactLevel::Critical), "agent-7", in_one_hour())
            .token;

        assert!(store.update_status(&token, IntentStatus::Approved));
        assert_eq!(
            store.get_intent(&token).unwrap().status,
            IntentStatus::Approved
        );
    }

    #[test]
    fn update_status_refuses_terminal_states() {
        let store = LedgerStore::new();
        let token = store
            .declare_intent(input(ImpactLevel::Low), "agent-7", in_one_hour())
            .token;
        store.revoke_intent(&token, "done with it");

        assert!(!store.update_status(&token, IntentStatus::Approved));
        assert!(!store.update_status(&IntentToken::new(), IntentStatus::Approved));
    }

    #[test]
    fn execution_links_to_intent_and_chain() {
        let store = LedgerStore::new();
        let token = store
            .declare_intent(input(ImpactLevel::Low), "agent-7", in_one_hour())
            .token;
        let before = store.chain_len();

        let exec_id = ExecutionId::new();
        let execution = store
            .record_execution(
                exec_id,
                &token,
                payload(),
                context("agent-7"),
                ExecutionStatus::Success,
                serde_json::json!({ "deployed": true }),
            )
            .unwrap();

        assert_eq!(execution.audit_hash.len(), 64);
        assert_eq!(store.chain_len(), before + 1);
        assert_eq!(store.get_intent(&token).unwrap().executions, vec![exec_id]);

        let listed = store.executions_for_intent(&token);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, exec_id);
        assert_eq!(store.get_execution(&exec_id).unwrap().id, exec_id);
    }

    #[test]
    fn execution_against_unknown_intent_is_a_hard_error() {
        let store = LedgerStore::new();
        let before = store.chain_len();

        let result = store.record_execution(
            ExecutionId::new(),
            &IntentToken::new(),
            payload(),
            context("agent-7"),
            ExecutionStatus::Success,
            serde_json::Value::Null,
        );

        assert!(matches!(result, Err(PraxisError::UnknownIntent(_))));
        assert_eq!(store.chain_len(), before);
    }

    #[test]
    fn unresolvable_execution_ids_are_skipped() {
        let store = LedgerStore::new();
        let token = store
            .declare_intent(input(ImpactLevel::Low), "agent-7", in_one_hour())
            .token;

        // Inject a dangling id directly into the intent's execution list.
        {
            let mut state = store.state();
            let mut intent = state.intents.get(&token).unwrap();
            intent.executions.push(ExecutionId::new());
            state.intents.put(intent);
        }

        assert!(store.executions_for_intent(&token).is_empty());
    }

    #[test]
    fn executions_for_unknown_intent_is_empty() {
        let store = LedgerStore::new();
        assert!(store.executions_for_intent(&IntentToken::new()).is_empty());
    }

    #[test]
    fn chain_verifies_after_full_lifecycle() {
        let store = LedgerStore::new();
        let token = store
            .declare_intent(input(ImpactLevel::Low), "agent-7", in_one_hour())
            .token;
        store
            .record_execution(
                ExecutionId::new(),
                &token,
                payload(),
                context("agent-7"),
                ExecutionStatus::Success,
                serde_json::Value::Null,
            )
            .unwrap();
        store.revoke_intent(&token, "finished");

        assert!(store.verify_chain());
        assert_eq!(store.chain_len(), 4); // genesis + declared + executed + revoked
    }
}

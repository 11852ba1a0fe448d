//! Filtered, paginated queries over the combined intent/execution history.
//!
//! For each intent passing the intent-level filters the engine emits one
//! intent record, then one record per execution passing the execution-level
//! filters. The combined set is sorted by timestamp descending and paged
//! with offset/limit; `total` reports the pre-pagination count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use praxis_core::types::{ExecutionId, ExecutionStatus, ImpactLevel, IntentToken};
use praxis_ledger::storage::{ExecutionStore, IntentStore};
use praxis_ledger::LedgerStore;

/// Inclusive time window matched against an intent's `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Query facets. All are optional; unset filters match everything.
///
/// `agent_id` and `status` apply only to execution-derived records — an
/// intent's executions are not filtered by its own impact or action type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQueryFilters {
    pub action_type: Option<String>,
    pub impact_level: Option<ImpactLevel>,
    pub time_range: Option<TimeRange>,
    pub agent_id: Option<String>,
    pub status: Option<ExecutionStatus>,
}

/// One row in a query result: either an intent or one of its executions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub intent_token: IntentToken,
    /// Set only for execution-derived records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<ExecutionId>,
    pub action_type: String,
    pub description: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub agent_id: String,
    pub audit_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

/// A page of records plus the pre-pagination total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryPage {
    pub records: Vec<AuditRecord>,
    pub total: usize,
}

/// Run a filtered, paginated query against the ledgers.
pub fn query_audit<I: IntentStore, E: ExecutionStore>(
    store: &LedgerStore<I, E>,
    filters: &AuditQueryFilters,
    limit: usize,
    offset: usize,
    include_payloads: bool,
) -> QueryPage {
    let mut records = Vec::new();

    for intent in store.list_intents() {
        if let Some(action_type) = &filters.action_type {
            if &intent.input.action_type != action_type {
                continue;
            }
        }
        if let Some(impact) = filters.impact_level {
            if intent.input.scope.estimated_impact != impact {
                continue;
            }
        }
        if let Some(range) = &filters.time_range {
            if intent.created_at < range.start || intent.created_at > range.end {
                continue;
            }
        }

        records.push(AuditRecord {
            intent_token: intent.token,
            execution_id: None,
            action_type: intent.input.action_type.clone(),
            description: intent.input.description.clone(),
            status: intent.status.to_string(),
            timestamp: intent.created_at,
            agent_id: intent.declared_by.clone(),
            audit_hash: intent.audit_hash.clone(),
            payload: include_payloads.then(|| {
                serde_json::to_value(&intent.input)
                    .expect("intent input serialization should not fail")
            }),
        });

        for id in &intent.executions {
            let Some(execution) = store.get_execution(id) else {
                continue;
            };

            if let Some(agent_id) = &filters.agent_id {
                if &execution.context.agent_id != agent_id {
                    continue;
                }
            }
            if let Some(status) = filters.status {
                if execution.status != status {
                    continue;
                }
            }

            records.push(AuditRecord {
                intent_token: intent.token,
                execution_id: Some(execution.id),
                action_type: execution.payload.action_type.clone(),
                description: format!("Execution of {}", intent.input.description),
                status: execution.status.to_string(),
                timestamp: execution.created_at,
                agent_id: execution.context.agent_id.clone(),
                audit_hash: execution.audit_hash.clone(),
                payload: include_payloads.then(|| {
                    serde_json::to_value(&execution.payload)
                        .expect("action payload serialization should not fail")
                }),
            });
        }
    }

    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let total = records.len();
    let records = records.into_iter().skip(offset).take(limit).collect();

    QueryPage { records, total }
}

//! Windowed aggregate counts over the intent ledger.
//!
//! Pure read-only aggregation: no chain interaction, no side effects.
//! Note that `collect_stats` does not materialize lazy expiry — it reads
//! statuses as stored.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use praxis_core::types::IntentStatus;
use praxis_ledger::storage::{ExecutionStore, IntentStore};
use praxis_ledger::LedgerStore;

/// Aggregate counts over intents created within a trailing time window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerStats {
    pub intents_declared: u64,
    /// Intents with at least one recorded execution.
    pub intents_executed: u64,
    pub intents_rejected: u64,
    pub intents_expired: u64,
    pub actions_by_type: BTreeMap<String, u64>,
    pub actions_by_impact: BTreeMap<String, u64>,
}

/// Compute stats over all intents created within the trailing `window`.
pub fn collect_stats<I: IntentStore, E: ExecutionStore>(
    store: &LedgerStore<I, E>,
    window: Duration,
) -> LedgerStats {
    let cutoff = Utc::now() - window;
    let mut stats = LedgerStats::default();

    for intent in store.list_intents() {
        if intent.created_at < cutoff {
            continue;
        }

        stats.intents_declared += 1;
        *stats
            .actions_by_type
            .entry(intent.input.action_type.clone())
            .or_insert(0) += 1;
        *stats
            .actions_by_impact
            .entry(intent.input.scope.estimated_impact.to_string())
            .or_insert(0) += 1;

        if !intent.executions.is_empty() {
            stats.intents_executed += 1;
        }
        match intent.status {
            IntentStatus::Rejected => stats.intents_rejected += 1,
            IntentStatus::Expired => stats.intents_expired += 1,
            _ => {}
        }
    }

    stats
}

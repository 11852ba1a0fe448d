//! Keyed storage traits for the two ledgers.
//!
//! The traits return owned records so a durable backend (embedded KV store,
//! relational table) can be substituted without touching lifecycle logic.
//! The audit chain is deliberately not behind these traits — it is an
//! append-only log, not a keyed lookup (see [`crate::chain`]).

use std::collections::HashMap;

use praxis_core::types::{ExecutionId, IntentToken, StoredExecution, StoredIntent};

/// Keyed storage for intents.
pub trait IntentStore {
    fn put(&mut self, intent: StoredIntent);

    fn get(&self, token: &IntentToken) -> Option<StoredIntent>;

    /// Snapshot of every stored intent, in no particular order.
    fn list(&self) -> Vec<StoredIntent>;
}

/// Keyed storage for executions.
pub trait ExecutionStore {
    fn put(&mut self, execution: StoredExecution);

    fn get(&self, id: &ExecutionId) -> Option<StoredExecution>;
}

/// In-memory intent backend, the reference implementation.
#[derive(Debug, Default)]
pub struct MemoryIntentStore {
    intents: HashMap<IntentToken, StoredIntent>,
}

impl IntentStore for MemoryIntentStore {
    fn put(&mut self, intent: StoredIntent) {
        self.intents.insert(intent.token, intent);
    }

    fn get(&self, token: &IntentToken) -> Option<StoredIntent> {
        self.intents.get(token).cloned()
    }

    fn list(&self) -> Vec<StoredIntent> {
        self.intents.values().cloned().collect()
    }
}

/// In-memory execution backend, the reference implementation.
#[derive(Debug, Default)]
pub struct MemoryExecutionStore {
    executions: HashMap<ExecutionId, StoredExecution>,
}

impl ExecutionStore for MemoryExecutionStore {
    fn put(&mut self, execution: StoredExecution) {
        self.executions.insert(execution.id, execution);
    }

    fn get(&self, id: &ExecutionId) -> Option<StoredExecution> {
        self.executions.get(id).cloned()
    }
}

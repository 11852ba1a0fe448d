//! praxis-audit — Historical queries and aggregates over the Praxis ledgers.
//!
//! Queries join the intent and execution ledgers directly; the audit chain
//! proves integrity, the ledgers serve reads. Everything here is read-only.

pub mod query;
pub mod stats;

pub use query::{query_audit, AuditQueryFilters, AuditRecord, QueryPage, TimeRange};
pub use stats::{collect_stats, LedgerStats};

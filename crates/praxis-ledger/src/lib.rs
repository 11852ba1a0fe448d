//! praxis-ledger — Tamper-evident intent and execution ledgers.
//!
//! Three pieces cooperate behind one write lock:
//! - the intent ledger (token → intent, with the lifecycle state machine),
//! - the execution ledger (id → execution, linked to its parent intent),
//! - the audit chain, an append-only SHA-256-linked event log any reader
//!   can independently re-verify.
//!
//! [`store::LedgerStore`] is the explicit instance callers construct and
//! pass by reference; construction seeds the chain's genesis entry.

pub mod chain;
pub mod storage;
pub mod store;

pub use chain::{AuditChain, AuditChainEntry, AuditEventKind, GENESIS_HASH};
pub use store::LedgerStore;

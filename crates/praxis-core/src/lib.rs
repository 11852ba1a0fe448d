//! praxis-core: Shared types, configuration, and error handling for the Praxis platform.
//!
//! This crate provides the foundational pieces used across all Praxis components:
//! - Intent and execution record types for the audit ledgers
//! - Canonical SHA-256 content hashing used by the audit chain
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use error::PraxisError;

//! Per-tier consensus policies.
//!
//! Policies are configuration: they ship with hardened defaults and can be
//! overridden from `praxis.toml` `[consensus]` sections, but they are never
//! mutated at runtime. The critical-voter roster is a strict subset of the
//! advanced roster — only its members can satisfy the critical-tier check.

use std::collections::BTreeMap;

use serde::Deserialize;

use praxis_core::types::ImpactLevel;

/// Quorum requirements for one risk tier.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsensusPolicy {
    /// The tier this policy governs.
    pub tier: ImpactLevel,
    /// Minimum number of approving votes overall.
    pub required_votes: usize,
    /// High tier: approvals that must come from `advanced_voters`.
    #[serde(default)]
    pub required_advanced_votes: usize,
    /// Critical tier: approvals that must come from `critical_voters`.
    #[serde(default)]
    pub required_critical_votes: usize,
    /// Minimum constitutional score (0-100) for every approving voter.
    pub min_constitutional: f64,
    /// Minimum aggregate integrity score. Declared by policy, evaluated by
    /// the wider review process rather than the gate itself.
    pub min_integrity: f64,
    /// Senior reviewers eligible to satisfy the advanced requirement.
    #[serde(default)]
    pub advanced_voters: Vec<String>,
    /// Subset of `advanced_voters` eligible to satisfy the critical requirement.
    #[serde(default)]
    pub critical_voters: Vec<String>,
    /// Per-voter vote weights.
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

/// The full policy table, one policy per risk tier.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicySet {
    pub low: ConsensusPolicy,
    pub medium: ConsensusPolicy,
    pub high: ConsensusPolicy,
    pub critical: ConsensusPolicy,
}

impl PolicySet {
    /// The policy governing operations of the given risk tier.
    pub fn policy(&self, tier: ImpactLevel) -> &ConsensusPolicy {
        match tier {
            ImpactLevel::Low => &self.low,
            ImpactLevel::Medium => &self.medium,
            ImpactLevel::High => &self.high,
            ImpactLevel::Critical => &self.critical,
        }
    }
}

impl Default for PolicySet {
    fn default() -> Self {
        let advanced = vec![
            "arbiter-1".to_string(),
            "arbiter-2".to_string(),
            "arbiter-3".to_string(),
        ];
        let critical = vec!["arbiter-1".to_string(), "arbiter-2".to_string()];
        let weights = BTreeMap::from([
            ("arbiter-1".to_string(), 1.0),
            ("arbiter-2".to_string(), 1.0),
            ("arbiter-3".to_string(), 0.9),
            ("witness-1".to_string(), 0.7),
        ]);

        Self {
            low: ConsensusPolicy {
                tier: ImpactLevel::Low,
                required_votes: 1,
                required_advanced_votes: 0,
                required_critical_votes: 0,
                min_constitutional: 65.0,
                min_integrity: 0.85,
                advanced_voters: advanced.clone(),
                critical_voters: critical.clone(),
                weights: weights.clone(),
            },
            medium: ConsensusPolicy {
                tier: ImpactLevel::Medium,
                required_votes: 2,
                required_advanced_votes: 0,
                required_critical_votes: 0,
                min_constitutional: 70.0,
                min_integrity: 0.90,
                advanced_voters: advanced.clone(),
                critical_voters: critical.clone(),
                weights: weights.clone(),
            },
            high: ConsensusPolicy {
                tier: ImpactLevel::High,
                required_votes: 3,
                required_advanced_votes: 2,
                required_critical_votes: 0,
                min_constitutional: 75.0,
                min_integrity: 0.92,
                advanced_voters: advanced.clone(),
                critical_voters: critical.clone(),
                weights: weights.clone(),
            },
            critical: ConsensusPolicy {
                tier: ImpactLevel::Critical,
                required_votes: 3,
                required_advanced_votes: 0,
                required_critical_votes: 1,
                min_constitutional: 85.0,
                min_integrity: 0.95,
                advanced_voters: advanced,
                critical_voters: critical,
                weights,
            },
        }
    }
}

//! The consensus gate.
//!
//! `validate` is pure, total, and synchronous: it inspects a collected vote
//! set against a tier policy and produces a decision. It never mutates its
//! inputs and never fails — every rejection carries a human-readable reason.
//!
//! The check order is fixed and observable in the reasons it returns:
//! approval count first, advanced/critical role composition second,
//! per-approver constitutional score last.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use praxis_core::types::ImpactLevel;

use crate::policy::ConsensusPolicy;

/// One voter's ballot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    pub approved: bool,
    /// Constitutional confidence rating, 0-100.
    pub score: f64,
}

/// The gate's verdict. Rejection is an expected outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsensusDecision {
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ConsensusDecision {
    fn approve() -> Self {
        Self { approved: true, reason: None }
    }

    fn reject(reason: String) -> Self {
        Self { approved: false, reason: Some(reason) }
    }
}

/// Evaluate a vote set against a tier policy.
///
/// An empty vote set always fails the count check when the policy requires
/// at least one vote — an intent is never silently approved.
pub fn validate(votes: &BTreeMap<String, Vote>, policy: &ConsensusPolicy) -> ConsensusDecision {
    let approvals: Vec<(&str, &Vote)> = votes
        .iter()
        .filter(|(_, v)| v.approved)
        .map(|(name, v)| (name.as_str(), v))
        .collect();

    if approvals.len() < policy.required_votes {
        return ConsensusDecision::reject(format!(
            "Insufficient votes: {}/{}",
            approvals.len(),
            policy.required_votes
        ));
    }

    if policy.tier == ImpactLevel::High && policy.required_advanced_votes > 0 {
        let advanced: Vec<&str> = approvals
            .iter()
            .filter(|(name, _)| policy.advanced_voters.iter().any(|a| a == name))
            .map(|(name, _)| *name)
            .collect();

        if advanced.len() < policy.required_advanced_votes {
            let who = if advanced.is_empty() { "none".to_string() } else { advanced.join(", ") };
            return ConsensusDecision::reject(format!(
                "High-tier requires {} advanced reviewer approvals ({}). Got {}: {}",
                policy.required_advanced_votes,
                policy.advanced_voters.join("/"),
                advanced.len(),
                who
            ));
        }
    }

    if policy.tier == ImpactLevel::Critical && policy.required_critical_votes > 0 {
        let critical = approvals
            .iter()
            .filter(|(name, _)| policy.critical_voters.iter().any(|c| c == name))
            .count();

        if critical < policy.required_critical_votes {
            return ConsensusDecision::reject(format!(
                "Critical operations require {} approval(s) from critical reviewers ({}). \
                 No other reviewer can approve critical operations.",
                policy.required_critical_votes,
                policy.critical_voters.join("/")
            ));
        }
    }

    for (name, vote) in &approvals {
        if vote.score < policy.min_constitutional {
            return ConsensusDecision::reject(format!(
                "{} constitutional score too low: {}/{}",
                name, vote.score, policy.min_constitutional
            ));
        }
    }

    ConsensusDecision::approve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicySet;

    fn votes(entries: &[(&str, bool, f64)]) -> BTreeMap<String, Vote> {
        entries
            .iter()
            .map(|(name, approved, score)| {
                (name.to_string(), Vote { approved: *approved, score: *score })
            })
            .collect()
    }

    #[test]
    fn empty_vote_set_is_rejected() {
        let set = PolicySet::default();
        let decision = validate(&BTreeMap::new(), set.policy(ImpactLevel::Low));
        assert!(!decision.approved);
        assert_eq!(decision.reason.as_deref(), Some("Insufficient votes: 0/1"));
    }

    #[test]
    fn disapprovals_do_not_count() {
        let set = PolicySet::default();
        let ballots = votes(&[("arbiter-1", false, 95.0), ("arbiter-2", false, 95.0)]);
        let decision = validate(&ballots, set.policy(ImpactLevel::Medium));
        assert!(!decision.approved);
        assert_eq!(decision.reason.as_deref(), Some("Insufficient votes: 0/2"));
    }

    #[test]
    fn medium_tier_approves_on_count_and_score() {
        let set = PolicySet::default();
        let ballots = votes(&[("arbiter-3", true, 80.0), ("witness-1", true, 75.0)]);
        let decision = validate(&ballots, set.policy(ImpactLevel::Medium));
        assert!(decision.approved);
        assert!(decision.reason.is_none());
    }

    #[test]
    fn high_tier_needs_advanced_composition() {
        let set = PolicySet::default();
        // Three approvals, but only one from the advanced roster.
        let ballots = votes(&[
            ("arbiter-1", true, 90.0),
            ("witness-1", true, 90.0),
            ("witness-2", true, 90.0),
        ]);
        let decision = validate(&ballots, set.policy(ImpactLevel::High));
        assert!(!decision.approved);
        let reason = decision.reason.unwrap();
        assert!(reason.contains("advanced reviewer"));
        // The reason enumerates which advanced reviewers did approve.
        assert!(reason.contains("Got 1: arbiter-1"));
    }

    #[test]
    fn high_tier_reason_names_none_when_no_advanced_approved() {
        let set = PolicySet::default();
        let ballots = votes(&[
            ("witness-1", true, 90.0),
            ("witness-2", true, 90.0),
            ("witness-3", true, 90.0),
        ]);
        let decision = validate(&ballots, set.policy(ImpactLevel::High));
        assert!(decision.reason.unwrap().contains("Got 0: none"));
    }

    #[test]
    fn critical_tier_excludes_non_members() {
        let set = PolicySet::default();
        // arbiter-3 is advanced but not on the critical roster; its approval
        // can never satisfy the critical requirement.
        let ballots = votes(&[
            ("arbiter-3", true, 95.0),
            ("witness-1", true, 95.0),
            ("witness-2", true, 95.0),
        ]);
        let decision = validate(&ballots, set.policy(ImpactLevel::Critical));
        assert!(!decision.approved);
        let reason = decision.reason.unwrap();
        assert!(reason.contains("critical reviewers (arbiter-1/arbiter-2)"));
    }

    #[test]
    fn critical_tier_approves_with_roster_member() {
        let set = PolicySet::default();
        let ballots = votes(&[
            ("arbiter-1", true, 95.0),
            ("arbiter-3", true, 95.0),
            ("witness-1", true, 95.0),
        ]);
        let decision = validate(&ballots, set.policy(ImpactLevel::Critical));
        assert!(decision.approved);
    }

    #[test]
    fn low_score_approver_is_named() {
        let set = PolicySet::default();
        let ballots = votes(&[("arbiter-1", true, 95.0), ("witness-1", true, 40.0)]);
        let decision = validate(&ballots, set.policy(ImpactLevel::Medium));
        assert!(!decision.approved);
        assert_eq!(
            decision.reason.as_deref(),
            Some("witness-1 constitutional score too low: 40/70")
        );
    }

    #[test]
    fn count_check_runs_before_composition_check() {
        let set = PolicySet::default();
        // One advanced approval is both too few overall and too few advanced;
        // the count failure wins because it is checked first.
        let ballots = votes(&[("arbiter-1", true, 90.0)]);
        let decision = validate(&ballots, set.policy(ImpactLevel::High));
        assert_eq!(decision.reason.as_deref(), Some("Insufficient votes: 1/3"));
    }

    #[test]
    fn composition_check_runs_before_score_check() {
        let set = PolicySet::default();
        // Low score on an approver AND missing critical composition: the
        // composition failure is reported, not the score.
        let ballots = votes(&[
            ("arbiter-3", true, 10.0),
            ("witness-1", true, 10.0),
            ("witness-2", true, 10.0),
        ]);
        let decision = validate(&ballots, set.policy(ImpactLevel::Critical));
        assert!(decision.reason.unwrap().contains("critical reviewers"));
    }

    #[test]
    fn inputs_are_not_consumed() {
        let set = PolicySet::default();
        let ballots = votes(&[("arbiter-1", true, 90.0)]);
        let _ = validate(&ballots, set.policy(ImpactLevel::Low));
        let _ = validate(&ballots, set.policy(ImpactLevel::Low));
        assert_eq!(ballots.len(), 1);
    }
}

//! praxis-consensus — Risk-tiered quorum gating for declared intents.
//!
//! High-impact intents are gated behind a weighted multi-party vote. This
//! crate holds the per-tier policies (configuration, not runtime state) and
//! the pure [`gate::validate`] function that decides approve/reject for a
//! collected vote set. Rejection is a first-class outcome carried in the
//! decision's reason string, never an error.

pub mod gate;
pub mod policy;

pub use gate::{validate, ConsensusDecision, Vote};
pub use policy::{ConsensusPolicy, PolicySet};

use praxis_core::types::ImpactLevel;

/// Whether a voter cleared for `voter_tier` may participate in an operation
/// of `operation_tier`. Clearance is monotone in severity.
pub fn eligible_for_tier(voter_tier: ImpactLevel, operation_tier: ImpactLevel) -> bool {
    voter_tier >= operation_tier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_eligibility_is_monotone() {
        assert!(eligible_for_tier(ImpactLevel::Critical, ImpactLevel::Low));
        assert!(eligible_for_tier(ImpactLevel::High, ImpactLevel::High));
        assert!(!eligible_for_tier(ImpactLevel::Medium, ImpactLevel::Critical));
    }
}

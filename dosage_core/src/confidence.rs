//! Confidence scoring for recommendations.
//!
//! Scores combine supplement evidence, pharmacokinetic data completeness
//! and the evidence behind each adjustment, always clamped to [0.1, 0.95].

use crate::{DosageAdjustment, EvidenceLevel, PharmacokineticFactors, SupplementDefinition};

pub const MIN_CONFIDENCE: f64 = 0.1;
pub const MAX_CONFIDENCE: f64 = 0.95;

const BASE_CONFIDENCE: f64 = 0.5;

/// Penalty applied to the batch score for every adjustment in it
const BATCH_ADJUSTMENT_PENALTY: f64 = 0.02;

fn clamp_confidence(value: f64) -> f64 {
    value.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

fn evidence_bonus(level: EvidenceLevel) -> f64 {
    match level {
        EvidenceLevel::Strong => 0.3,
        EvidenceLevel::Moderate => 0.2,
        EvidenceLevel::Weak => 0.1,
        EvidenceLevel::Insufficient | EvidenceLevel::Conflicting => 0.05,
    }
}

fn adjustment_contribution(adjustment: &DosageAdjustment) -> f64 {
    match adjustment.evidence_level {
        EvidenceLevel::Strong => 0.05,
        EvidenceLevel::Moderate => 0.03,
        EvidenceLevel::Weak => -0.02,
        EvidenceLevel::Insufficient | EvidenceLevel::Conflicting => 0.0,
    }
}

/// Confidence for a single supplement's recommendation
pub fn recommendation_confidence(
    supplement: &SupplementDefinition,
    adjustments: &[DosageAdjustment],
    pharmacokinetics: &PharmacokineticFactors,
) -> f64 {
    let mut confidence = BASE_CONFIDENCE + evidence_bonus(supplement.evidence_level);

    if pharmacokinetics.bioavailability > 0.0 {
        confidence += 0.1;
    }
    if pharmacokinetics.half_life > 0.0 {
        confidence += 0.1;
    }

    confidence += adjustments.iter().map(adjustment_contribution).sum::<f64>();

    clamp_confidence(confidence)
}

/// Batch confidence: mean per-recommendation score minus 0.02 per adjustment
///
/// Returns the minimum confidence for an empty batch.
pub fn overall_confidence(confidences: &[f64], total_adjustments: usize) -> f64 {
    if confidences.is_empty() {
        return MIN_CONFIDENCE;
    }

    let mean = confidences.iter().sum::<f64>() / confidences.len() as f64;
    clamp_confidence(mean - BATCH_ADJUSTMENT_PENALTY * total_adjustments as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::supplement;
    use crate::pharmacokinetics::extract_pharmacokinetic_factors;
    use crate::{AdjustmentFactor, AdjustmentReason};
    use approx::assert_relative_eq;

    fn adjustment(evidence_level: EvidenceLevel) -> DosageAdjustment {
        DosageAdjustment {
            factor: AdjustmentFactor::HealthCondition,
            multiplier: 0.9,
            reason: AdjustmentReason::Diabetes,
            evidence_level,
        }
    }

    fn score(level: EvidenceLevel, adjustments: &[DosageAdjustment]) -> f64 {
        let mut s = supplement("magnesium");
        s.evidence_level = level;
        let pk = extract_pharmacokinetic_factors(&s);
        recommendation_confidence(&s, adjustments, &pk)
    }

    #[test]
    fn test_evidence_levels() {
        assert_relative_eq!(score(EvidenceLevel::Weak, &[]), 0.8, epsilon = 1e-9);
        assert_relative_eq!(score(EvidenceLevel::Moderate, &[]), 0.9, epsilon = 1e-9);
        assert_relative_eq!(score(EvidenceLevel::Insufficient, &[]), 0.75, epsilon = 1e-9);
        // 0.5 + 0.3 + 0.2 = 1.0 -> clamped
        assert_relative_eq!(score(EvidenceLevel::Strong, &[]), 0.95);
    }

    #[test]
    fn test_adjustment_contributions() {
        let weak = vec![adjustment(EvidenceLevel::Weak); 3];
        // 0.5 + 0.1 + 0.2 - 0.06
        assert_relative_eq!(score(EvidenceLevel::Weak, &weak), 0.74, epsilon = 1e-9);

        let mixed = [
            adjustment(EvidenceLevel::Moderate),
            adjustment(EvidenceLevel::Weak),
        ];
        // 0.5 + 0.05 + 0.2 + 0.03 - 0.02
        assert_relative_eq!(
            score(EvidenceLevel::Conflicting, &mixed),
            0.76,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_missing_pharmacokinetics_lowers_score() {
        let mut s = supplement("magnesium");
        s.evidence_level = EvidenceLevel::Weak;
        let mut pk = extract_pharmacokinetic_factors(&s);
        pk.bioavailability = 0.0;
        pk.half_life = 0.0;
        assert_relative_eq!(recommendation_confidence(&s, &[], &pk), 0.6, epsilon = 1e-9);
    }

    #[test]
    fn test_confidence_clamped_low() {
        let many_weak = vec![adjustment(EvidenceLevel::Weak); 60];
        assert_eq!(score(EvidenceLevel::Weak, &many_weak), MIN_CONFIDENCE);
    }

    #[test]
    fn test_overall_confidence() {
        assert_relative_eq!(overall_confidence(&[0.9, 0.7], 3), 0.74, epsilon = 1e-9);
        assert_eq!(overall_confidence(&[0.95, 0.95], 0), 0.95);
        assert_eq!(overall_confidence(&[0.5], 40), MIN_CONFIDENCE);
        assert_eq!(overall_confidence(&[], 0), MIN_CONFIDENCE);
    }
}

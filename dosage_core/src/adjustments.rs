//! Resolution of the adjustment chain for one supplement.
//!
//! Checks run in a fixed order and each may add one entry:
//! age, gender, pregnancy, breastfeeding, activity level, liver function,
//! kidney function, then one entry per matching health condition.

use crate::{
    AdjustmentFactor, AdjustmentReason, DosageAdjustment, EvidenceLevel, Gender,
    PhysiologyFactors, SupplementDefinition, UserProfile,
};

/// Liver capacity below which doses are reduced
const LIVER_CAPACITY_THRESHOLD: f64 = 0.8;

/// Creatinine clearance (mL/min) below which doses are reduced
const MILD_RENAL_IMPAIRMENT: f64 = 60.0;
const SEVERE_RENAL_IMPAIRMENT: f64 = 30.0;

/// Resolve every adjustment that applies to this user and supplement
pub fn resolve_adjustments(
    profile: &UserProfile,
    physiology: &PhysiologyFactors,
    supplement: &SupplementDefinition,
) -> Vec<DosageAdjustment> {
    let mut adjustments = Vec::new();

    if physiology.age_adjustment.multiplier != 1.0 {
        adjustments.push(DosageAdjustment {
            factor: AdjustmentFactor::Age,
            multiplier: physiology.age_adjustment.multiplier,
            reason: AdjustmentReason::AgeGroup {
                category: physiology.age_adjustment.category,
            },
            evidence_level: EvidenceLevel::Moderate,
        });
    }

    // The female multiplier is a modeling simplification without a cited
    // clinical source.
    if profile.gender != Gender::Other {
        let gender_multiplier = if profile.gender == Gender::Female {
            0.9
        } else {
            1.0
        };
        if gender_multiplier != 1.0 {
            adjustments.push(DosageAdjustment {
                factor: AdjustmentFactor::Gender,
                multiplier: gender_multiplier,
                reason: AdjustmentReason::Gender {
                    gender: profile.gender,
                },
                evidence_level: EvidenceLevel::Moderate,
            });
        }
    }

    if profile.pregnant {
        adjustments.push(DosageAdjustment {
            factor: AdjustmentFactor::Pregnancy,
            multiplier: 0.8,
            reason: AdjustmentReason::Pregnancy,
            evidence_level: EvidenceLevel::Strong,
        });
    }

    if profile.breastfeeding {
        adjustments.push(DosageAdjustment {
            factor: AdjustmentFactor::Breastfeeding,
            multiplier: 0.9,
            reason: AdjustmentReason::Breastfeeding,
            evidence_level: EvidenceLevel::Moderate,
        });
    }

    if physiology.activity_adjustment != 1.0 {
        adjustments.push(DosageAdjustment {
            factor: AdjustmentFactor::ActivityLevel,
            multiplier: physiology.activity_adjustment,
            reason: AdjustmentReason::ActivityLevel {
                level: profile.activity_level,
            },
            evidence_level: EvidenceLevel::Weak,
        });
    }

    let liver_capacity = physiology.liver_function.capacity;
    if liver_capacity < LIVER_CAPACITY_THRESHOLD {
        adjustments.push(DosageAdjustment {
            factor: AdjustmentFactor::LiverFunction,
            multiplier: 0.5 + liver_capacity * 0.5,
            reason: AdjustmentReason::ReducedLiverFunction,
            evidence_level: EvidenceLevel::Strong,
        });
    }

    let clearance = physiology.creatinine_clearance;
    if clearance < MILD_RENAL_IMPAIRMENT {
        let kidney_multiplier = if clearance < SEVERE_RENAL_IMPAIRMENT {
            0.5
        } else {
            0.75
        };
        adjustments.push(DosageAdjustment {
            factor: AdjustmentFactor::KidneyFunction,
            multiplier: kidney_multiplier,
            reason: AdjustmentReason::ReducedKidneyFunction,
            evidence_level: EvidenceLevel::Strong,
        });
    }

    adjustments.extend(
        profile
            .health_conditions
            .iter()
            .filter_map(|condition| condition_adjustment(condition, supplement)),
    );

    tracing::debug!(
        supplement_id = %supplement.id,
        count = adjustments.len(),
        "Resolved dosage adjustments"
    );

    adjustments
}

/// Adjustment for a single reported condition, first matching rule wins
///
/// A contraindication listed by the supplement takes precedence over the
/// generic diabetes and hypertension rules.
pub fn condition_adjustment(
    condition: &str,
    supplement: &SupplementDefinition,
) -> Option<DosageAdjustment> {
    let condition_lower = condition.to_lowercase();

    let contraindicated = supplement
        .contraindications
        .iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .any(|c| condition_lower.contains(&c));

    let (multiplier, reason, evidence_level) = if contraindicated {
        (
            0.5,
            AdjustmentReason::Contraindication {
                condition: condition.to_string(),
            },
            EvidenceLevel::Strong,
        )
    } else if condition_lower.contains("diabetes") || condition_lower.contains("cukrzyca") {
        (0.9, AdjustmentReason::Diabetes, EvidenceLevel::Moderate)
    } else if condition_lower.contains("hypertension") || condition_lower.contains("nadciśnienie")
    {
        (0.85, AdjustmentReason::Hypertension, EvidenceLevel::Moderate)
    } else {
        return None;
    };

    Some(DosageAdjustment {
        factor: AdjustmentFactor::HealthCondition,
        multiplier,
        reason,
        evidence_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physiology::calculate_physiology;
    use crate::physiology::tests::profile;
    use crate::{catalog::tests::supplement, ActivityLevel, Config};

    fn resolve(p: &UserProfile, s: &SupplementDefinition) -> Vec<DosageAdjustment> {
        let physiology = calculate_physiology(p, &Config::default()).unwrap();
        resolve_adjustments(p, &physiology, s)
    }

    fn factors(adjustments: &[DosageAdjustment]) -> Vec<AdjustmentFactor> {
        adjustments.iter().map(|a| a.factor).collect()
    }

    #[test]
    fn test_healthy_adult_male_has_no_adjustments() {
        let adjustments = resolve(&profile(30.0, Gender::Male), &supplement("magnesium"));
        assert!(adjustments.is_empty());
    }

    #[test]
    fn test_elderly_female_end_to_end_factors() {
        // Clearance = 70 * 70 * 0.85 / 72 ≈ 57.85 mL/min, in the 30-60 tier
        let p = profile(70.0, Gender::Female);
        let physiology = calculate_physiology(&p, &Config::default()).unwrap();
        assert!(physiology.creatinine_clearance < 60.0);
        assert!(physiology.creatinine_clearance >= 30.0);

        let adjustments = resolve_adjustments(&p, &physiology, &supplement("magnesium"));
        assert_eq!(
            factors(&adjustments),
            vec![
                AdjustmentFactor::Age,
                AdjustmentFactor::Gender,
                AdjustmentFactor::KidneyFunction
            ]
        );
        assert_eq!(adjustments[0].multiplier, 0.8);
        assert_eq!(adjustments[1].multiplier, 0.9);
        assert_eq!(adjustments[2].multiplier, 0.75);
        assert_eq!(adjustments[2].evidence_level, EvidenceLevel::Strong);
    }

    #[test]
    fn test_other_gender_gets_no_gender_adjustment() {
        let adjustments = resolve(&profile(30.0, Gender::Other), &supplement("magnesium"));
        assert!(!factors(&adjustments).contains(&AdjustmentFactor::Gender));
    }

    #[test]
    fn test_pregnancy_always_present_once() {
        for id in ["magnesium", "caffeine", "omega-3"] {
            let mut p = profile(28.0, Gender::Female);
            p.pregnant = true;
            let adjustments = resolve(&p, &supplement(id));

            let pregnancy: Vec<_> = adjustments
                .iter()
                .filter(|a| a.factor == AdjustmentFactor::Pregnancy)
                .collect();
            assert_eq!(pregnancy.len(), 1);
            assert_eq!(pregnancy[0].multiplier, 0.8);
            assert_eq!(pregnancy[0].evidence_level, EvidenceLevel::Strong);
        }
    }

    #[test]
    fn test_breastfeeding_and_activity() {
        let mut p = profile(30.0, Gender::Female);
        p.breastfeeding = true;
        p.activity_level = ActivityLevel::VeryActive;

        let adjustments = resolve(&p, &supplement("magnesium"));
        assert_eq!(
            factors(&adjustments),
            vec![
                AdjustmentFactor::Gender,
                AdjustmentFactor::Breastfeeding,
                AdjustmentFactor::ActivityLevel
            ]
        );
        assert_eq!(adjustments[1].evidence_level, EvidenceLevel::Moderate);
        assert_eq!(adjustments[2].multiplier, 1.2);
        assert_eq!(adjustments[2].evidence_level, EvidenceLevel::Weak);
    }

    #[test]
    fn test_liver_adjustment_uses_capacity() {
        let mut p = profile(30.0, Gender::Male);
        p.health_conditions = vec!["liver disease".into()];

        let adjustments = resolve(&p, &supplement("magnesium"));
        let liver = adjustments
            .iter()
            .find(|a| a.factor == AdjustmentFactor::LiverFunction)
            .unwrap();
        // capacity 0.6 -> 0.5 + 0.3
        assert!((liver.multiplier - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_severe_kidney_tier() {
        let mut p = profile(90.0, Gender::Female);
        p.weight = 45.0;
        let adjustments = resolve(&p, &supplement("magnesium"));
        let kidney = adjustments
            .iter()
            .find(|a| a.factor == AdjustmentFactor::KidneyFunction)
            .unwrap();
        assert_eq!(kidney.multiplier, 0.5);
    }

    #[test]
    fn test_contraindication_beats_diabetes() {
        let mut s = supplement("magnesium");
        s.contraindications = vec!["Diabetes".into()];

        let adj = condition_adjustment("Type 2 diabetes", &s).unwrap();
        assert_eq!(adj.multiplier, 0.5);
        assert_eq!(adj.evidence_level, EvidenceLevel::Strong);
        assert!(matches!(adj.reason, AdjustmentReason::Contraindication { .. }));
    }

    #[test]
    fn test_condition_keywords() {
        let s = supplement("l-theanine");

        let diabetes = condition_adjustment("cukrzyca typu 2", &s).unwrap();
        assert_eq!(diabetes.multiplier, 0.9);
        assert_eq!(diabetes.reason, AdjustmentReason::Diabetes);

        let hypertension = condition_adjustment("Nadciśnienie tętnicze", &s).unwrap();
        assert_eq!(hypertension.multiplier, 0.85);

        assert!(condition_adjustment("seasonal allergies", &s).is_none());
    }

    #[test]
    fn test_one_entry_per_condition_in_order() {
        let mut p = profile(30.0, Gender::Male);
        p.health_conditions = vec![
            "hypertension".into(),
            "chronic kidney disease".into(),
            "asthma".into(),
            "diabetes and hypertension".into(),
        ];

        let adjustments = resolve(&p, &supplement("magnesium"));
        let multipliers: Vec<f64> = adjustments
            .iter()
            .filter(|a| a.factor == AdjustmentFactor::HealthCondition)
            .map(|a| a.multiplier)
            .collect();
        // magnesium lists "Kidney disease" as a contraindication
        assert_eq!(multipliers, vec![0.85, 0.5, 0.9]);
    }

    #[test]
    fn test_reason_display_is_english() {
        let reason = AdjustmentReason::AgeGroup {
            category: crate::AgeCategory::Elderly,
        };
        assert_eq!(reason.to_string(), "Age-related adjustment for elderly");
    }
}

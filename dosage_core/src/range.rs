//! Composition of the recommended dosage range.
//!
//! The base range is scaled by the product of every adjustment multiplier,
//! then clamped so that the result never drops below 10% of the base
//! minimum nor exceeds 3x the base maximum.

use crate::{DosageAdjustment, DosageRange, SupplementDefinition, SupplementRequest};

/// Lower safety bound as a fraction of the base minimum
pub const MIN_FLOOR_FRACTION: f64 = 0.1;

/// Upper safety bound as a multiple of the base maximum
pub const MAX_CEILING_FACTOR: f64 = 3.0;

/// Half-width of the band built around a custom dose
const CUSTOM_DOSE_SPREAD: f64 = 0.2;

/// Pre-adjustment range: the therapeutic range, or a ±20% band around a
/// positive custom dose
pub fn base_range(supplement: &SupplementDefinition, request: &SupplementRequest) -> DosageRange {
    let unit = supplement.therapeutic_range.unit.clone();

    match request
        .custom_dosage
        .filter(|d| d.is_finite() && *d > 0.0)
    {
        Some(custom) => DosageRange {
            min: custom * (1.0 - CUSTOM_DOSE_SPREAD),
            max: custom * (1.0 + CUSTOM_DOSE_SPREAD),
            unit,
        },
        None => supplement.therapeutic_range.clone(),
    }
}

/// Product of all multipliers in the chain
pub fn combined_multiplier(adjustments: &[DosageAdjustment]) -> f64 {
    adjustments.iter().map(|a| a.multiplier).product()
}

/// Slack for representation error before rounding to cents
const ROUNDING_EPSILON: f64 = 1e-9;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ceil2(value: f64) -> f64 {
    (value * 100.0 - ROUNDING_EPSILON).ceil() / 100.0
}

fn floor2(value: f64) -> f64 {
    (value * 100.0 + ROUNDING_EPSILON).floor() / 100.0
}

/// Apply the adjustment chain to a base range and clamp to safety bounds
///
/// Values are rounded to 2 decimals, with the floor rounded up and the
/// ceiling rounded down so rounding never crosses a bound.
///
/// If clamping leaves the minimum above the maximum (only possible when the
/// chain shrinks the range below the floor), the maximum is raised to the
/// minimum so the result collapses onto the safety floor.
pub fn compose_range(base: &DosageRange, adjustments: &[DosageAdjustment]) -> DosageRange {
    let multiplier = combined_multiplier(adjustments);
    let floor = base.min * MIN_FLOOR_FRACTION;
    let ceiling = base.max * MAX_CEILING_FACTOR;

    let min = round2((base.min * multiplier).max(floor)).max(ceil2(floor));
    let mut max = round2((base.max * multiplier).min(ceiling)).min(floor2(ceiling));

    if min > max {
        tracing::warn!(
            "Clamped range inverted ({:.2} > {:.2}), collapsing onto the safety floor",
            min,
            max
        );
        max = min;
    }

    DosageRange {
        min,
        max,
        unit: base.unit.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::supplement;
    use crate::{AdjustmentFactor, AdjustmentReason, DesiredEffect, EvidenceLevel};

    fn request(custom_dosage: Option<f64>) -> SupplementRequest {
        SupplementRequest {
            supplement_id: "magnesium".into(),
            desired_effect: DesiredEffect::Therapeutic,
            custom_dosage,
            timing_preference: None,
            with_food: None,
        }
    }

    fn adjustment(multiplier: f64) -> DosageAdjustment {
        DosageAdjustment {
            factor: AdjustmentFactor::HealthCondition,
            multiplier,
            reason: AdjustmentReason::Diabetes,
            evidence_level: EvidenceLevel::Moderate,
        }
    }

    fn range(min: f64, max: f64) -> DosageRange {
        DosageRange {
            min,
            max,
            unit: "mg".into(),
        }
    }

    #[test]
    fn test_custom_dose_replaces_therapeutic_range() {
        let mut s = supplement("magnesium");
        s.therapeutic_range = range(100.0, 500.0);

        let base = base_range(&s, &request(Some(200.0)));
        assert!((base.min - 160.0).abs() < 1e-9);
        assert!((base.max - 240.0).abs() < 1e-9);
        assert_eq!(base.unit, "mg");
    }

    #[test]
    fn test_non_positive_custom_dose_ignored() {
        let s = supplement("magnesium");
        assert_eq!(base_range(&s, &request(Some(0.0))), s.therapeutic_range);
        assert_eq!(base_range(&s, &request(None)), s.therapeutic_range);
    }

    #[test]
    fn test_no_adjustments_keeps_base() {
        let composed = compose_range(&range(100.0, 500.0), &[]);
        assert_eq!(composed, range(100.0, 500.0));
    }

    #[test]
    fn test_chain_product_and_rounding() {
        let chain = [adjustment(0.8), adjustment(0.9), adjustment(0.75)];
        let composed = compose_range(&range(100.0, 500.0), &chain);
        assert_eq!(composed.min, 54.0);
        assert_eq!(composed.max, 270.0);
        assert!((combined_multiplier(&chain) - 0.54).abs() < 1e-12);

        let composed = compose_range(&range(33.333, 66.666), &[adjustment(1.0)]);
        assert_eq!(composed.min, 33.33);
        assert_eq!(composed.max, 66.67);
    }

    #[test]
    fn test_floor_clamp() {
        let chain = vec![adjustment(0.5); 6];
        let composed = compose_range(&range(100.0, 5000.0), &chain);
        // 100 * 0.5^6 = 1.5625 -> floor at 10
        assert_eq!(composed.min, 10.0);
        assert_eq!(composed.max, 78.13);
    }

    #[test]
    fn test_ceiling_clamp() {
        let chain = vec![adjustment(1.2); 8];
        let composed = compose_range(&range(100.0, 500.0), &chain);
        assert_eq!(composed.max, 1500.0);
        assert!(composed.min <= composed.max);
    }

    #[test]
    fn test_clamp_inversion_collapses_to_floor() {
        // 100 * 0.05 = 5 -> floored to 10; 110 * 0.05 = 5.5 stays; inverted
        let chain = [adjustment(0.5), adjustment(0.1)];
        let composed = compose_range(&range(100.0, 110.0), &chain);
        assert_eq!(composed.min, 10.0);
        assert_eq!(composed.max, 10.0);
    }

    #[test]
    fn test_rounding_respects_floor_on_small_base() {
        // Floor 0.0123 would round down to 0.01
        let composed = compose_range(&range(0.123, 0.2), &[adjustment(0.05)]);
        assert!(composed.min >= 0.123 * MIN_FLOOR_FRACTION);
        assert_eq!(composed.min, 0.02);
        assert_eq!(composed.max, 0.02);
    }

    #[test]
    fn test_rounding_respects_ceiling_on_small_base() {
        // Ceiling 0.369 would round up to 0.37
        let chain = vec![adjustment(1.2); 8];
        let composed = compose_range(&range(0.01, 0.123), &chain);
        assert!(composed.max <= 0.123 * MAX_CEILING_FACTOR);
        assert_eq!(composed.max, 0.36);
        assert_eq!(composed.min, 0.04);
    }

    #[test]
    fn test_bounds_hold_across_chains() {
        let bases = [range(100.0, 500.0), range(3.0, 5.0), range(50.0, 55.0)];
        let multipliers = [0.5, 0.75, 0.8, 0.85, 0.9, 1.05, 1.1, 1.2];

        for base in &bases {
            for len in 0..6 {
                for m in multipliers {
                    let chain = vec![adjustment(m); len];
                    let composed = compose_range(base, &chain);
                    assert!(composed.min >= base.min * MIN_FLOOR_FRACTION - 1e-9);
                    assert!(composed.max <= base.max * MAX_CEILING_FACTOR + 1e-9);
                    assert!(composed.min <= composed.max);
                }
            }
        }
    }
}

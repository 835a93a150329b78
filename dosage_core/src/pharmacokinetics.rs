//! Pharmacokinetic factor extraction from supplement data.
//!
//! Missing data is never an error: bioavailability falls back to 50% and
//! half-life to 8 hours.

use crate::{ActiveCompound, PharmacokineticFactors, SupplementDefinition};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_BIOAVAILABILITY: f64 = 50.0;
pub const DEFAULT_HALF_LIFE_HOURS: f64 = 8.0;

/// "6-8 hours", "4h", "12-24h", "1.5 hours", "3 godzin"
static HALF_LIFE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)(?:\s*[-–]\s*(\d+(?:\.\d+)?))?\s*(?:hours?|h|godzin)")
        .expect("half-life pattern is valid")
});

fn has_pharmacokinetic_data(compound: &ActiveCompound) -> bool {
    let bioavailability = compound
        .bioavailability
        .is_some_and(|b| b.is_finite() && b != 0.0);
    let half_life = compound
        .half_life
        .as_deref()
        .is_some_and(|h| !h.trim().is_empty());
    bioavailability || half_life
}

/// Pick the compound that drives the pharmacokinetic factors
///
/// The first compound exposing bioavailability or half-life wins, else the
/// first compound at all.
pub fn primary_compound(supplement: &SupplementDefinition) -> Option<&ActiveCompound> {
    supplement
        .active_compounds
        .iter()
        .find(|c| has_pharmacokinetic_data(c))
        .or_else(|| supplement.active_compounds.first())
}

/// Parse a free-text half-life into hours
///
/// Ranges are averaged. Returns `None` when no finite hour value can be
/// read.
pub fn parse_half_life(text: &str) -> Option<f64> {
    let captures = HALF_LIFE_PATTERN.captures(text)?;
    let min: f64 = captures.get(1)?.as_str().parse().ok()?;
    let max: f64 = match captures.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => min,
    };
    Some((min + max) / 2.0).filter(|h| h.is_finite())
}

pub fn extract_pharmacokinetic_factors(supplement: &SupplementDefinition) -> PharmacokineticFactors {
    let compound = primary_compound(supplement);

    let bioavailability = compound
        .and_then(|c| c.bioavailability)
        .filter(|b| b.is_finite() && *b != 0.0)
        .unwrap_or(DEFAULT_BIOAVAILABILITY);

    let half_life = match compound.and_then(|c| c.half_life.as_deref()) {
        Some(text) => match parse_half_life(text).filter(|h| *h > 0.0) {
            Some(hours) => hours,
            None => {
                tracing::warn!(
                    supplement_id = %supplement.id,
                    "Unparseable half-life {:?}, defaulting to {}h",
                    text,
                    DEFAULT_HALF_LIFE_HOURS
                );
                DEFAULT_HALF_LIFE_HOURS
            }
        },
        None => DEFAULT_HALF_LIFE_HOURS,
    };

    PharmacokineticFactors {
        bioavailability,
        half_life,
        absorption_rate: 1.0,
        elimination_rate: 1.0,
        volume_of_distribution: 1.0,
        protein_binding: 50.0,
        first_pass_metabolism: 30.0,
    }
}

//! Built-in catalog of supplement definitions.
//!
//! This module provides a small set of well-studied supplements so that the
//! engine and CLI work without an external data file.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Supplement definitions keyed by id
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub supplements: HashMap<String, SupplementDefinition>,
}

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn compound(name: &str, bioavailability: f64, half_life: &str) -> ActiveCompound {
    ActiveCompound {
        name: name.into(),
        bioavailability: Some(bioavailability),
        half_life: Some(half_life.into()),
    }
}

fn application(condition: &str, efficacy: Efficacy, duration: &str) -> ClinicalApplication {
    ClinicalApplication {
        condition: condition.into(),
        efficacy,
        duration: Some(duration.into()),
    }
}

fn range(min: f64, max: f64, unit: &str) -> DosageRange {
    DosageRange {
        min,
        max,
        unit: unit.into(),
    }
}

/// Builds the default catalog
///
/// **Note**: prefer `get_default_catalog()` which returns a cached reference.
pub fn build_default_catalog() -> Catalog {
    let definitions = vec![
        SupplementDefinition {
            id: "magnesium".into(),
            name: "Magnesium".into(),
            therapeutic_range: range(200.0, 400.0, "mg"),
            active_compounds: vec![compound("Magnesium", 80.0, "30-60 hours")],
            contraindications: vec!["Kidney disease".into(), "Kidney failure".into()],
            evidence_level: EvidenceLevel::Strong,
            clinical_applications: vec![
                application("Magnesium deficiency", Efficacy::High, "Days to weeks"),
                application("Anxiety", Efficacy::Moderate, "2-4 weeks"),
                application("Sleep quality", Efficacy::Moderate, "8-12 weeks"),
            ],
            timing: vec!["evening".into()],
            with_food: true,
        },
        SupplementDefinition {
            id: "caffeine".into(),
            name: "Caffeine".into(),
            therapeutic_range: range(50.0, 400.0, "mg"),
            active_compounds: vec![compound("Caffeine", 99.0, "4-6 hours")],
            contraindications: vec![
                "Pregnancy".into(),
                "Anxiety disorders".into(),
                "Heart conditions".into(),
            ],
            evidence_level: EvidenceLevel::Strong,
            clinical_applications: vec![
                application("Alertness", Efficacy::High, "Hours to days"),
                application("Physical performance", Efficacy::High, "2-4 hours"),
            ],
            timing: vec!["morning".into(), "afternoon".into()],
            with_food: false,
        },
        SupplementDefinition {
            id: "omega-3".into(),
            name: "Omega-3 Fatty Acids".into(),
            therapeutic_range: range(1000.0, 3000.0, "mg"),
            active_compounds: vec![
                compound("EPA (Eicosapentaenoic Acid)", 85.0, "18-24 hours"),
                compound("DHA (Docosahexaenoic Acid)", 85.0, "2-3 days"),
            ],
            contraindications: vec!["Bleeding disorders".into()],
            evidence_level: EvidenceLevel::Strong,
            clinical_applications: vec![
                application("Cardiovascular health", Efficacy::High, "Months"),
                application("Depression", Efficacy::Moderate, "8-12 weeks"),
            ],
            timing: vec!["morning".into(), "evening".into()],
            with_food: true,
        },
        SupplementDefinition {
            id: "creatine".into(),
            name: "Creatine".into(),
            therapeutic_range: range(3.0, 5.0, "g"),
            active_compounds: vec![compound("Creatine Monohydrate", 95.0, "3-4 hours")],
            contraindications: vec!["Kidney disease".into(), "Kidney impairment".into()],
            evidence_level: EvidenceLevel::Strong,
            clinical_applications: vec![
                application("Strength and power", Efficacy::High, "4-8 weeks"),
                application("Cognitive performance", Efficacy::Moderate, "4-8 weeks"),
                application("Depression", Efficacy::Low, "Months to years"),
            ],
            timing: vec!["post-workout".into(), "morning".into()],
            with_food: false,
        },
        SupplementDefinition {
            id: "l-theanine".into(),
            name: "L-Theanine".into(),
            therapeutic_range: range(100.0, 400.0, "mg"),
            active_compounds: vec![compound("L-Theanine", 95.0, "4-5 hours")],
            contraindications: vec!["Pregnancy".into(), "Breastfeeding".into()],
            evidence_level: EvidenceLevel::Moderate,
            clinical_applications: vec![
                application("Stress and anxiety", Efficacy::High, "Days to weeks"),
                application("Sleep quality", Efficacy::Moderate, "2-4 weeks"),
            ],
            timing: vec!["morning".into(), "evening".into()],
            with_food: false,
        },
    ];

    Catalog::from_definitions(definitions)
}

impl Catalog {
    pub fn from_definitions(definitions: Vec<SupplementDefinition>) -> Self {
        let supplements = definitions
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();
        Self { supplements }
    }

    /// Definitions sorted by id
    pub fn sorted(&self) -> Vec<&SupplementDefinition> {
        let mut defs: Vec<_> = self.supplements.values().collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, def) in &self.supplements {
            if id.is_empty() || def.id.is_empty() {
                errors.push("Supplement has empty ID".to_string());
            }
            if id != &def.id {
                errors.push(format!(
                    "Supplement key '{}' doesn't match definition.id '{}'",
                    id, def.id
                ));
            }
            if def.name.is_empty() {
                errors.push(format!("Supplement '{}' has empty name", id));
            }

            let range = &def.therapeutic_range;
            if !range.min.is_finite() || range.min <= 0.0 {
                errors.push(format!(
                    "Supplement '{}': therapeutic min {} is not positive",
                    id, range.min
                ));
            }
            if !range.max.is_finite() || range.max <= 0.0 {
                errors.push(format!(
                    "Supplement '{}': therapeutic max {} is not positive",
                    id, range.max
                ));
            }
            if range.min > range.max {
                errors.push(format!(
                    "Supplement '{}': therapeutic min {} > max {}",
                    id, range.min, range.max
                ));
            }
            if range.unit.is_empty() {
                errors.push(format!("Supplement '{}' has empty dosage unit", id));
            }

            for compound in &def.active_compounds {
                if let Some(b) = compound.bioavailability {
                    if !(0.0..=100.0).contains(&b) {
                        errors.push(format!(
                            "Supplement '{}': compound '{}' bioavailability {} outside 0-100",
                            id, compound.name, b
                        ));
                    }
                }
            }
        }

        errors
    }
}

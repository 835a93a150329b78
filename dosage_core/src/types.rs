//! Core domain types for the dosage engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - User profiles and the requests made on their behalf
//! - Supplement definitions (read-only data from a repository)
//! - Derived physiology factors
//! - Adjustments, recommendations and batch results

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// User Types
// ============================================================================

/// Biological sex used by the clearance and gender adjustment rules
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Self-reported physical activity level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        };
        f.write_str(s)
    }
}

/// Physiology of the person a dosage is calculated for
///
/// Supplied per call and never stored by the engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Age in years
    pub age: f64,
    /// Body weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub health_conditions: Vec<String>,
    #[serde(default)]
    pub pregnant: bool,
    #[serde(default)]
    pub breastfeeding: bool,
}

// ============================================================================
// Supplement Definition Types
// ============================================================================

/// Categorical strength of the evidence behind a claim
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceLevel {
    Strong,
    Moderate,
    Weak,
    Insufficient,
    Conflicting,
}

/// Dose range with its unit (e.g. 200-400 mg)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DosageRange {
    pub min: f64,
    pub max: f64,
    pub unit: String,
}

/// An active compound and whatever pharmacokinetic data is known for it
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActiveCompound {
    pub name: String,
    /// Percentage of the dose reaching systemic circulation (0-100)
    #[serde(default)]
    pub bioavailability: Option<f64>,
    /// Free-text half-life, e.g. "4-6 hours"
    #[serde(default)]
    pub half_life: Option<String>,
}

/// Efficacy tag attached to a clinical application
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Efficacy {
    High,
    Moderate,
    Low,
    Insufficient,
}

/// A condition the supplement has been studied for
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClinicalApplication {
    pub condition: String,
    pub efficacy: Efficacy,
    #[serde(default)]
    pub duration: Option<String>,
}

/// Read-only supplement data supplied by a repository
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SupplementDefinition {
    pub id: String,
    pub name: String,
    pub therapeutic_range: DosageRange,
    #[serde(default)]
    pub active_compounds: Vec<ActiveCompound>,
    #[serde(default)]
    pub contraindications: Vec<String>,
    pub evidence_level: EvidenceLevel,
    #[serde(default)]
    pub clinical_applications: Vec<ClinicalApplication>,
    /// Default intake times when the request gives no preference
    #[serde(default)]
    pub timing: Vec<String>,
    #[serde(default)]
    pub with_food: bool,
}

// ============================================================================
// Request Types
// ============================================================================

/// What the user wants the supplement for
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DesiredEffect {
    Therapeutic,
    Preventive,
    Optimal,
    #[serde(other)]
    Other,
}

/// One supplement the user asks a dosage for
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SupplementRequest {
    pub supplement_id: String,
    pub desired_effect: DesiredEffect,
    /// Replaces the therapeutic range with a ±20% band around this dose
    #[serde(default)]
    pub custom_dosage: Option<f64>,
    #[serde(default)]
    pub timing_preference: Option<Vec<String>>,
    #[serde(default)]
    pub with_food: Option<bool>,
}

/// Complete input to a batch calculation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DosageCalculationInput {
    pub user_profile: UserProfile,
    pub supplements: Vec<SupplementRequest>,
}

// ============================================================================
// Derived Physiology Types
// ============================================================================

/// Age band selecting the age multiplier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    Children,
    Adult,
    Elderly,
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgeCategory::Children => "children",
            AgeCategory::Adult => "adult",
            AgeCategory::Elderly => "elderly",
        };
        f.write_str(s)
    }
}

/// Estimated hepatic function, both values on a 0-1 scale
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct LiverFunction {
    pub capacity: f64,
    pub enzyme_activity: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgeAdjustment {
    pub multiplier: f64,
    pub category: AgeCategory,
}

/// Factors derived from a [`UserProfile`], recomputed on every call
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PhysiologyFactors {
    /// Body surface area in m² (Mosteller)
    pub bsa: f64,
    pub bmi: f64,
    /// Estimated creatinine clearance in mL/min (Cockcroft-Gault)
    pub creatinine_clearance: f64,
    pub liver_function: LiverFunction,
    pub age_adjustment: AgeAdjustment,
    pub activity_adjustment: f64,
}

// ============================================================================
// Adjustment Types
// ============================================================================

/// Which part of the profile an adjustment comes from
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentFactor {
    Age,
    Gender,
    Pregnancy,
    Breastfeeding,
    ActivityLevel,
    LiverFunction,
    KidneyFunction,
    HealthCondition,
}

impl fmt::Display for AdjustmentFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdjustmentFactor::Age => "age",
            AdjustmentFactor::Gender => "gender",
            AdjustmentFactor::Pregnancy => "pregnancy",
            AdjustmentFactor::Breastfeeding => "breastfeeding",
            AdjustmentFactor::ActivityLevel => "activity_level",
            AdjustmentFactor::LiverFunction => "liver_function",
            AdjustmentFactor::KidneyFunction => "kidney_function",
            AdjustmentFactor::HealthCondition => "health_condition",
        };
        f.write_str(s)
    }
}

/// Language-neutral reason code for an adjustment
///
/// Callers localize these; `Display` renders a plain English sentence.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum AdjustmentReason {
    AgeGroup { category: AgeCategory },
    Gender { gender: Gender },
    Pregnancy,
    Breastfeeding,
    ActivityLevel { level: ActivityLevel },
    ReducedLiverFunction,
    ReducedKidneyFunction,
    Contraindication { condition: String },
    Diabetes,
    Hypertension,
}

impl fmt::Display for AdjustmentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustmentReason::AgeGroup { category } => {
                write!(f, "Age-related adjustment for {}", category)
            }
            AdjustmentReason::Gender { gender } => {
                let g = match gender {
                    Gender::Male => "male",
                    Gender::Female => "female",
                    Gender::Other => "other",
                };
                write!(f, "Gender-based adjustment for {}", g)
            }
            AdjustmentReason::Pregnancy => f.write_str("Conservative dosing during pregnancy"),
            AdjustmentReason::Breastfeeding => {
                f.write_str("Adjustment for breastfeeding mothers")
            }
            AdjustmentReason::ActivityLevel { level } => {
                write!(f, "Activity level adjustment: {}", level)
            }
            AdjustmentReason::ReducedLiverFunction => {
                f.write_str("Reduced liver function requires dose adjustment")
            }
            AdjustmentReason::ReducedKidneyFunction => {
                f.write_str("Reduced kidney function requires dose adjustment")
            }
            AdjustmentReason::Contraindication { condition } => {
                write!(f, "Contraindication: {}", condition)
            }
            AdjustmentReason::Diabetes => f.write_str("Diabetes-related adjustment"),
            AdjustmentReason::Hypertension => f.write_str("Hypertension-related adjustment"),
        }
    }
}

/// One multiplicative step of the adjustment chain
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DosageAdjustment {
    pub factor: AdjustmentFactor,
    pub multiplier: f64,
    pub reason: AdjustmentReason,
    pub evidence_level: EvidenceLevel,
}

// ============================================================================
// Output Types
// ============================================================================

/// Pharmacokinetic parameters used for a recommendation
///
/// Only bioavailability and half-life come from supplement data; the rest
/// are normalized defaults.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PharmacokineticFactors {
    /// Percent (0-100)
    pub bioavailability: f64,
    /// Hours
    pub half_life: f64,
    pub absorption_rate: f64,
    pub elimination_rate: f64,
    /// L/kg
    pub volume_of_distribution: f64,
    /// Percent
    pub protein_binding: f64,
    /// Percent
    pub first_pass_metabolism: f64,
}

/// Personalized dosage for one supplement
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DosageRecommendation {
    pub supplement_id: String,
    pub supplement_name: String,
    pub recommended_dosage: DosageRange,
    pub confidence: f64,
    pub timing: Vec<String>,
    pub with_food: bool,
    pub duration: String,
    pub adjustments: Vec<DosageAdjustment>,
    pub pharmacokinetic_factors: PharmacokineticFactors,
}

/// Output of a batch calculation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DosageCalculationResult {
    pub recommendations: Vec<DosageRecommendation>,
    /// Every adjustment of every recommendation, in resolution order
    pub adjustments: Vec<DosageAdjustment>,
    pub confidence: f64,
}

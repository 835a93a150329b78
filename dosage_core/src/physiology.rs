//! Physiology factors derived from a user profile.
//!
//! - Body surface area (Mosteller)
//! - BMI
//! - Creatinine clearance (Cockcroft-Gault, serum creatinine assumed 1.0 mg/dL)
//! - Liver function estimate from age and reported conditions
//! - Age and activity multipliers from the configured tables

use crate::{
    AgeAdjustment, AgeCategory, Config, Error, Gender, LiverFunction, PhysiologyFactors, Result,
    UserProfile,
};
use serde::{Deserialize, Serialize};

const REFERENCE_SERUM_CREATININE: f64 = 1.0;

/// Reject profiles that would divide by zero or produce NaN downstream
pub fn validate_profile(profile: &UserProfile) -> Result<()> {
    let fields = [
        ("age", profile.age),
        ("weight", profile.weight),
        ("height", profile.height),
    ];

    for (name, value) in fields {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::Validation(format!(
                "{} must be a positive number, got {}",
                name, value
            )));
        }
    }

    Ok(())
}

/// Compute all physiology factors for a profile
pub fn calculate_physiology(profile: &UserProfile, config: &Config) -> Result<PhysiologyFactors> {
    validate_profile(profile)?;

    let bsa = (profile.height * profile.weight / 3600.0).sqrt();

    let height_m = profile.height / 100.0;
    let bmi = profile.weight / (height_m * height_m);

    let creatinine_clearance = creatinine_clearance(profile, config);
    let liver_function = estimate_liver_function(profile);
    let age_adjustment = age_adjustment(profile.age, config);
    let activity_adjustment = config
        .activity_multipliers
        .for_level(profile.activity_level);

    tracing::debug!(
        bsa,
        bmi,
        creatinine_clearance,
        liver_capacity = liver_function.capacity,
        age_category = %age_adjustment.category,
        "Computed physiology factors"
    );

    Ok(PhysiologyFactors {
        bsa,
        bmi,
        creatinine_clearance,
        liver_function,
        age_adjustment,
        activity_adjustment,
    })
}

/// Cockcroft-Gault estimate in mL/min
///
/// Ages above 140 would go negative; the result is floored at zero.
fn creatinine_clearance(profile: &UserProfile, config: &Config) -> f64 {
    let gender_constant = config.creatinine_clearance.constant_for(profile.gender);
    let clearance = (140.0 - profile.age) * profile.weight * gender_constant
        / (72.0 * REFERENCE_SERUM_CREATININE);
    clearance.max(0.0)
}

fn condition_mentions(profile: &UserProfile, keywords: &[&str]) -> bool {
    profile.health_conditions.iter().any(|condition| {
        let lower = condition.to_lowercase();
        keywords.iter().any(|k| lower.contains(k))
    })
}

/// Estimate liver capacity and enzyme activity on a 0-1 scale
///
/// The age band and the two condition checks compound multiplicatively.
pub fn estimate_liver_function(profile: &UserProfile) -> LiverFunction {
    let mut capacity = 1.0;
    let mut enzyme_activity = 1.0;

    if profile.age > 65.0 {
        capacity *= 0.8;
        enzyme_activity *= 0.85;
    } else if profile.age > 40.0 {
        capacity *= 0.95;
        enzyme_activity *= 0.95;
    }

    if condition_mentions(profile, &["liver", "wątroba"]) {
        capacity *= 0.6;
        enzyme_activity *= 0.5;
    }

    if condition_mentions(profile, &["cirrhosis", "marskość"]) {
        capacity *= 0.3;
        enzyme_activity *= 0.2;
    }

    LiverFunction {
        capacity,
        enzyme_activity,
    }
}

pub fn age_category(age: f64) -> AgeCategory {
    if age < 18.0 {
        AgeCategory::Children
    } else if age > 65.0 {
        AgeCategory::Elderly
    } else {
        AgeCategory::Adult
    }
}

pub fn age_adjustment(age: f64, config: &Config) -> AgeAdjustment {
    let category = age_category(age);
    AgeAdjustment {
        multiplier: config.age_multipliers.for_category(category),
        category,
    }
}

// ============================================================================
// General health metrics
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

/// Summary metrics shown next to a calculation
///
/// These do not feed the dosage rules.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthMetrics {
    /// BMI rounded to one decimal
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    /// Basal metabolic rate in kcal/day (Mifflin-St Jeor)
    pub bmr: f64,
    /// Total daily energy expenditure in kcal/day
    pub tdee: f64,
}

fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

fn tdee_activity_factor(profile: &UserProfile) -> f64 {
    use crate::ActivityLevel::*;
    match profile.activity_level {
        Sedentary => 1.2,
        Light => 1.375,
        Moderate => 1.55,
        Active => 1.725,
        VeryActive => 1.9,
    }
}

pub fn health_metrics(profile: &UserProfile) -> Result<HealthMetrics> {
    validate_profile(profile)?;

    let height_m = profile.height / 100.0;
    let bmi = profile.weight / (height_m * height_m);

    let gender_offset = match profile.gender {
        Gender::Male => 5.0,
        Gender::Female | Gender::Other => -161.0,
    };
    let bmr = 10.0 * profile.weight + 6.25 * profile.height - 5.0 * profile.age + gender_offset;
    let tdee = bmr * tdee_activity_factor(profile);

    Ok(HealthMetrics {
        bmi: (bmi * 10.0).round() / 10.0,
        bmi_category: bmi_category(bmi),
        bmr: bmr.round(),
        tdee: tdee.round(),
    })
}

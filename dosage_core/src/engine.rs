//! Dosage calculation engine.
//!
//! For every requested supplement, in order:
//! - Fetch its definition from the repository (missing → whole batch fails)
//! - Extract pharmacokinetic factors
//! - Resolve the adjustment chain and compose the clamped range
//! - Score confidence and pick a duration
//!
//! The engine holds no per-call state. The progress callback is passed to
//! each call, so one engine can serve concurrent requests.

use crate::adjustments::resolve_adjustments;
use crate::confidence::{overall_confidence, recommendation_confidence};
use crate::pharmacokinetics::extract_pharmacokinetic_factors;
use crate::physiology::{calculate_physiology, validate_profile};
use crate::progress::{
    supplement_percent, CalculationProgress, ProgressReporter, ProgressStage, ANALYZING_PERCENT,
    COMPLETED_PERCENT, FINALIZING_PERCENT, STARTED_PERCENT,
};
use crate::range::{base_range, compose_range};
use crate::repository::SupplementRepository;
use crate::{
    Config, DesiredEffect, DosageCalculationInput, DosageCalculationResult, DosageRecommendation,
    Efficacy, Error, PhysiologyFactors, Result, SupplementDefinition, SupplementRequest,
    UserProfile,
};

/// Personalized dosage calculator over an injected supplement repository
#[derive(Clone, Debug)]
pub struct DosageEngine<R> {
    repository: R,
    config: Config,
}

impl<R: SupplementRepository> DosageEngine<R> {
    /// Engine with the default multiplier tables
    pub fn new(repository: R) -> Self {
        Self::with_config(repository, Config::default())
    }

    pub fn with_config(repository: R, config: Config) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Calculate recommendations for every requested supplement
    ///
    /// Fails on the first invalid input or unknown supplement; no partial
    /// results are returned.
    pub fn calculate(
        &self,
        input: &DosageCalculationInput,
        progress: Option<&mut dyn FnMut(&CalculationProgress)>,
    ) -> Result<DosageCalculationResult> {
        let mut reporter = ProgressReporter::new(progress);

        validate_profile(&input.user_profile)?;
        if input.supplements.is_empty() {
            return Err(Error::Validation(
                "at least one supplement must be requested".into(),
            ));
        }

        tracing::info!(
            "Calculating dosages for {} supplement(s)",
            input.supplements.len()
        );
        reporter.report(ProgressStage::Started, STARTED_PERCENT);

        let physiology = calculate_physiology(&input.user_profile, &self.config)?;

        reporter.report(
            ProgressStage::AnalyzingSupplements,
            ANALYZING_PERCENT,
        );

        let total = input.supplements.len();
        let mut recommendations = Vec::with_capacity(total);

        for (index, request) in input.supplements.iter().enumerate() {
            let supplement = self
                .repository
                .get_supplement(&request.supplement_id)?
                .ok_or_else(|| Error::SupplementNotFound(request.supplement_id.clone()))?;

            reporter.report(
                ProgressStage::CalculatingSupplement {
                    index,
                    supplement_id: supplement.id.clone(),
                },
                supplement_percent(index, total),
            );

            let recommendation =
                recommend(&supplement, request, &input.user_profile, &physiology);
            recommendations.push(recommendation);
        }

        reporter.report(ProgressStage::Finalizing, FINALIZING_PERCENT);

        let adjustments: Vec<_> = recommendations
            .iter()
            .flat_map(|r| r.adjustments.iter().cloned())
            .collect();
        let confidences: Vec<f64> = recommendations.iter().map(|r| r.confidence).collect();
        let confidence = overall_confidence(&confidences, adjustments.len());

        tracing::info!(
            "Calculated {} recommendation(s), {} adjustment(s), confidence {:.2}",
            recommendations.len(),
            adjustments.len(),
            confidence
        );
        reporter.report(ProgressStage::Completed, COMPLETED_PERCENT);

        Ok(DosageCalculationResult {
            recommendations,
            adjustments,
            confidence,
        })
    }
}

/// Build the recommendation for one supplement
///
/// Pure function of its inputs; identical inputs give identical output.
pub fn recommend(
    supplement: &SupplementDefinition,
    request: &SupplementRequest,
    profile: &UserProfile,
    physiology: &PhysiologyFactors,
) -> DosageRecommendation {
    let pharmacokinetic_factors = extract_pharmacokinetic_factors(supplement);
    let adjustments = resolve_adjustments(profile, physiology, supplement);

    let base = base_range(supplement, request);
    let recommended_dosage = compose_range(&base, &adjustments);

    let confidence =
        recommendation_confidence(supplement, &adjustments, &pharmacokinetic_factors);

    tracing::debug!(
        supplement_id = %supplement.id,
        min = recommended_dosage.min,
        max = recommended_dosage.max,
        confidence,
        "Composed recommendation"
    );

    DosageRecommendation {
        supplement_id: supplement.id.clone(),
        supplement_name: supplement.name.clone(),
        recommended_dosage,
        confidence,
        timing: request
            .timing_preference
            .clone()
            .unwrap_or_else(|| supplement.timing.clone()),
        with_food: request.with_food.unwrap_or(supplement.with_food),
        duration: recommended_duration(supplement, request.desired_effect),
        adjustments,
        pharmacokinetic_factors,
    }
}

/// Duration from clinical data, else a default for the desired effect
pub fn recommended_duration(supplement: &SupplementDefinition, effect: DesiredEffect) -> String {
    let clinical = supplement
        .clinical_applications
        .iter()
        .filter(|app| app.efficacy != Efficacy::Insufficient)
        .find_map(|app| app.duration.as_deref().filter(|d| !d.trim().is_empty()));

    if let Some(duration) = clinical {
        return duration.to_string();
    }

    match effect {
        DesiredEffect::Therapeutic => "4-12 weeks",
        DesiredEffect::Preventive => "continuous use",
        DesiredEffect::Optimal => "8-16 weeks",
        DesiredEffect::Other => "4-8 weeks",
    }
    .to_string()
}

//! Progress milestones emitted during a batch calculation.
//!
//! The engine reports stage identifiers only; turning them into display
//! text is up to the caller.

use serde::{Deserialize, Serialize};

/// Stage identifier reported to progress callbacks
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ProgressStage {
    Started,
    AnalyzingSupplements,
    CalculatingSupplement { index: usize, supplement_id: String },
    Finalizing,
    Completed,
}

/// One progress notification
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalculationProgress {
    pub stage: ProgressStage,
    /// 0-100
    pub percent: f64,
}

pub const STARTED_PERCENT: f64 = 10.0;
pub const ANALYZING_PERCENT: f64 = 30.0;
pub const FINALIZING_PERCENT: f64 = 90.0;
pub const COMPLETED_PERCENT: f64 = 100.0;

/// Share of the bar spent on per-supplement work, above 30% up to 70%
const PER_SUPPLEMENT_SPAN: f64 = 40.0;

/// Percent reported for supplement `index` of `total`
///
/// Always strictly above `ANALYZING_PERCENT`, reaching 70% on the last one.
pub fn supplement_percent(index: usize, total: usize) -> f64 {
    if total == 0 {
        return ANALYZING_PERCENT + PER_SUPPLEMENT_SPAN;
    }
    ANALYZING_PERCENT + ((index + 1) as f64 / total as f64) * PER_SUPPLEMENT_SPAN
}

/// Optional, call-scoped progress sink
pub(crate) struct ProgressReporter<'a> {
    callback: Option<&'a mut dyn FnMut(&CalculationProgress)>,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn new(callback: Option<&'a mut dyn FnMut(&CalculationProgress)>) -> Self {
        Self { callback }
    }

    pub(crate) fn report(&mut self, stage: ProgressStage, percent: f64) {
        tracing::trace!(?stage, percent, "Calculation progress");
        if let Some(callback) = self.callback.as_deref_mut() {
            callback(&CalculationProgress { stage, percent });
        }
    }
}

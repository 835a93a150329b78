//! Report envelope around a calculation result.
//!
//! The engine output is deterministic; the report adds an id and a
//! timestamp so a stored or transmitted calculation can be referenced.

use crate::physiology::{health_metrics, HealthMetrics};
use crate::{DosageCalculationResult, Result, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalculationReport {
    pub calculation_id: Uuid,
    pub calculated_at: DateTime<Utc>,
    pub result: DosageCalculationResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_metrics: Option<HealthMetrics>,
}

impl CalculationReport {
    /// Wrap a result with a fresh id and the current time
    pub fn new(result: DosageCalculationResult) -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            calculated_at: Utc::now(),
            result,
            health_metrics: None,
        }
    }

    /// Attach BMI/BMR/TDEE for the profile the result was calculated for
    pub fn with_health_metrics(mut self, profile: &UserProfile) -> Result<Self> {
        self.health_metrics = Some(health_metrics(profile)?);
        Ok(self)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

//! CSV export of dosage recommendations.
//!
//! One row per recommendation. Lists (timing, adjustments) are flattened
//! into `;`-separated cells.

use crate::{DosageCalculationResult, DosageRecommendation, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    supplement_id: String,
    supplement_name: String,
    min: f64,
    max: f64,
    unit: String,
    confidence: f64,
    timing: String,
    with_food: bool,
    duration: String,
    adjustments: String,
    bioavailability: f64,
    half_life_hours: f64,
}

impl From<&DosageRecommendation> for CsvRow {
    fn from(rec: &DosageRecommendation) -> Self {
        let adjustments = rec
            .adjustments
            .iter()
            .map(|a| format!("{}x{}", a.factor, a.multiplier))
            .collect::<Vec<_>>()
            .join(";");

        CsvRow {
            supplement_id: rec.supplement_id.clone(),
            supplement_name: rec.supplement_name.clone(),
            min: rec.recommended_dosage.min,
            max: rec.recommended_dosage.max,
            unit: rec.recommended_dosage.unit.clone(),
            confidence: rec.confidence,
            timing: rec.timing.join(";"),
            with_food: rec.with_food,
            duration: rec.duration.clone(),
            adjustments,
            bioavailability: rec.pharmacokinetic_factors.bioavailability,
            half_life_hours: rec.pharmacokinetic_factors.half_life,
        }
    }
}

/// Serialize recommendations as CSV (with headers) into any writer
pub fn write_recommendations<W: Write>(writer: W, result: &DosageCalculationResult) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for rec in &result.recommendations {
        csv_writer.serialize(CsvRow::from(rec))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write recommendations to a CSV file, replacing any existing file
///
/// Returns the number of rows written.
pub fn export_csv(path: &Path, result: &DosageCalculationResult) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_recommendations(&file, result)?;
    file.sync_all()?;

    tracing::info!(
        "Wrote {} recommendation(s) to {:?}",
        result.recommendations.len(),
        path
    );

    Ok(result.recommendations.len())
}

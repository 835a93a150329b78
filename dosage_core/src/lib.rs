#![forbid(unsafe_code)]

//! Core domain model and calculation logic for personalized supplement dosing.
//!
//! This crate provides:
//! - Domain types (profiles, supplement definitions, recommendations)
//! - Physiology, adjustment, range and confidence calculators
//! - The dosage engine with progress reporting
//! - Supplement repositories and the built-in catalog
//! - CSV export and report envelopes

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod catalog;
pub mod repository;
pub mod physiology;
pub mod pharmacokinetics;
pub mod adjustments;
pub mod range;
pub mod confidence;
pub mod progress;
pub mod engine;
pub mod export;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use catalog::{build_default_catalog, get_default_catalog, Catalog};
pub use repository::{
    InMemorySupplementRepository, JsonFileSupplementRepository, SupplementRepository,
};
pub use engine::DosageEngine;
pub use progress::{CalculationProgress, ProgressStage};
pub use report::CalculationReport;
pub use physiology::HealthMetrics;

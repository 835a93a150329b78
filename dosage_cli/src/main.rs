use clap::{Parser, Subcommand};
use dosage_core::repository::{load_catalog_file, read_catalog_file};
use dosage_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dosecalc")]
#[command(about = "Personalized supplement dosage calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate dosage recommendations for a profile and supplement list
    Calculate {
        /// JSON file with `user_profile` and `supplements`
        #[arg(long)]
        input: PathBuf,

        /// JSON file with supplement definitions (overrides config)
        #[arg(long)]
        supplements: Option<PathBuf>,

        /// Also write recommendations to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,
    },

    /// List supplements in the catalog
    Catalog {
        /// JSON file with supplement definitions (overrides config)
        #[arg(long)]
        supplements: Option<PathBuf>,
    },

    /// Validate the catalog
    Validate {
        /// JSON file with supplement definitions (overrides config)
        #[arg(long)]
        supplements: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dosage_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Calculate {
            input,
            supplements,
            csv,
            quiet,
        } => cmd_calculate(&config, &input, supplements, csv, quiet),
        Commands::Catalog { supplements } => cmd_catalog(&config, supplements),
        Commands::Validate { supplements } => cmd_validate(&config, supplements),
    }
}

/// Supplements file from `--supplements`, then the config file
fn supplements_path(config: &Config, supplements: Option<PathBuf>) -> Option<PathBuf> {
    supplements.or_else(|| config.data.supplements_file.clone())
}

/// Validated catalog from the supplements file, else the built-in set
fn resolve_catalog(config: &Config, supplements: Option<PathBuf>) -> Result<Catalog> {
    match supplements_path(config, supplements) {
        Some(path) => {
            tracing::info!("Using supplements file {:?}", path);
            load_catalog_file(&path)
        }
        None => {
            tracing::info!("Using built-in supplement catalog");
            Ok(get_default_catalog().clone())
        }
    }
}

fn cmd_calculate(
    config: &Config,
    input_path: &Path,
    supplements: Option<PathBuf>,
    csv_path: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let contents = std::fs::read_to_string(input_path)?;
    let input: DosageCalculationInput = serde_json::from_str(&contents)?;

    let catalog = resolve_catalog(config, supplements)?;
    let repository = InMemorySupplementRepository::from(catalog);
    let engine = DosageEngine::with_config(repository, config.clone());

    let mut show_progress = |p: &CalculationProgress| {
        eprintln!("[{:>3.0}%] {}", p.percent, stage_label(&p.stage));
    };
    let progress: Option<&mut dyn FnMut(&CalculationProgress)> = if quiet {
        None
    } else {
        Some(&mut show_progress)
    };

    let result = engine.calculate(&input, progress)?;
    tracing::debug!(
        "Calculated {} recommendation(s)",
        result.recommendations.len()
    );

    if let Some(path) = csv_path {
        let rows = dosage_core::export::export_csv(&path, &result)?;
        if !quiet {
            eprintln!("Wrote {} row(s) to {}", rows, path.display());
        }
    }

    let report = CalculationReport::new(result).with_health_metrics(&input.user_profile)?;
    println!("{}", report.to_json_pretty()?);

    Ok(())
}

fn stage_label(stage: &ProgressStage) -> String {
    match stage {
        ProgressStage::Started => "Starting calculation".to_string(),
        ProgressStage::AnalyzingSupplements => "Analyzing supplements".to_string(),
        ProgressStage::CalculatingSupplement { supplement_id, .. } => {
            format!("Calculating {}", supplement_id)
        }
        ProgressStage::Finalizing => "Finalizing".to_string(),
        ProgressStage::Completed => "Done".to_string(),
    }
}

fn cmd_catalog(config: &Config, supplements: Option<PathBuf>) -> Result<()> {
    let catalog = resolve_catalog(config, supplements)?;

    for def in catalog.sorted() {
        let range = &def.therapeutic_range;
        println!(
            "{:<14} {:<24} {}-{} {} ({:?})",
            def.id, def.name, range.min, range.max, range.unit, def.evidence_level
        );
    }

    Ok(())
}

fn cmd_validate(config: &Config, supplements: Option<PathBuf>) -> Result<()> {
    let catalog = match supplements_path(config, supplements) {
        Some(path) => read_catalog_file(&path)?,
        None => get_default_catalog().clone(),
    };
    let errors = catalog.validate();

    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation(format!(
            "{} problem(s) found",
            errors.len()
        )));
    }

    println!("✓ Catalog OK ({} supplements)", catalog.supplements.len());
    Ok(())
}

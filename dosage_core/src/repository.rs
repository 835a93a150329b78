//! Supplement data access.
//!
//! The engine only sees the [`SupplementRepository`] trait; where the data
//! actually lives is up to the embedding application.

use crate::catalog::{get_default_catalog, Catalog};
use crate::{Error, Result, SupplementDefinition};
use fs2::FileExt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read-only lookup of supplement definitions by id
pub trait SupplementRepository {
    /// Returns `Ok(None)` when the id is unknown
    fn get_supplement(&self, id: &str) -> Result<Option<SupplementDefinition>>;
}

impl<R: SupplementRepository + ?Sized> SupplementRepository for &R {
    fn get_supplement(&self, id: &str) -> Result<Option<SupplementDefinition>> {
        (**self).get_supplement(id)
    }
}

/// Repository backed by an in-memory catalog
#[derive(Clone, Debug, Default)]
pub struct InMemorySupplementRepository {
    catalog: Catalog,
}

impl InMemorySupplementRepository {
    pub fn new(definitions: Vec<SupplementDefinition>) -> Self {
        Self {
            catalog: Catalog::from_definitions(definitions),
        }
    }

    /// Repository over the built-in catalog
    pub fn with_default_catalog() -> Self {
        Self {
            catalog: get_default_catalog().clone(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl From<Catalog> for InMemorySupplementRepository {
    fn from(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

impl SupplementRepository for InMemorySupplementRepository {
    fn get_supplement(&self, id: &str) -> Result<Option<SupplementDefinition>> {
        Ok(self.catalog.supplements.get(id).cloned())
    }
}

/// Load a catalog from a JSON array of supplement definitions
///
/// The file is read under a shared lock so that a concurrent writer
/// replacing it cannot hand us a half-written document. Definitions that
/// fail [`Catalog::validate`] reject the whole file.
pub fn load_catalog_file(path: &Path) -> Result<Catalog> {
    let catalog = read_catalog_file(path)?;

    let errors = catalog.validate();
    if !errors.is_empty() {
        tracing::warn!(
            "Supplements file {:?} has {} problem(s)",
            path,
            errors.len()
        );
        return Err(Error::CatalogValidation(errors.join("; ")));
    }

    Ok(catalog)
}

/// Load a catalog without validating it
pub fn read_catalog_file(path: &Path) -> Result<Catalog> {
    let file = File::open(path).map_err(|e| {
        tracing::warn!("Unable to open supplements file {:?}: {}", path, e);
        e
    })?;

    file.lock_shared()?;
    let mut contents = String::new();
    let read_result = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read_result?;

    let definitions: Vec<SupplementDefinition> = serde_json::from_str(&contents)?;
    tracing::info!(
        "Loaded {} supplement definitions from {:?}",
        definitions.len(),
        path
    );

    Ok(Catalog::from_definitions(definitions))
}

/// Repository loaded once from a JSON file
#[derive(Clone, Debug)]
pub struct JsonFileSupplementRepository {
    inner: InMemorySupplementRepository,
}

impl JsonFileSupplementRepository {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self {
            inner: load_catalog_file(path)?.into(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        self.inner.catalog()
    }
}

impl SupplementRepository for JsonFileSupplementRepository {
    fn get_supplement(&self, id: &str) -> Result<Option<SupplementDefinition>> {
        self.inner.get_supplement(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::supplement;

    #[test]
    fn test_in_memory_lookup() {
        let repo = InMemorySupplementRepository::new(vec![supplement("caffeine")]);
        assert!(repo.get_supplement("caffeine").unwrap().is_some());
        assert!(repo.get_supplement("magnesium").unwrap().is_none());
    }

    #[test]
    fn test_default_catalog_repository() {
        let repo = InMemorySupplementRepository::with_default_catalog();
        let omega = repo.get_supplement("omega-3").unwrap().unwrap();
        assert_eq!(omega.therapeutic_range.max, 3000.0);
    }

    #[test]
    fn test_json_file_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("supplements.json");

        let defs = vec![supplement("creatine"), supplement("l-theanine")];
        std::fs::write(&path, serde_json::to_string_pretty(&defs).unwrap()).unwrap();

        let repo = JsonFileSupplementRepository::load(&path).unwrap();
        assert_eq!(repo.catalog().supplements.len(), 2);
        assert_eq!(
            repo.get_supplement("creatine").unwrap(),
            Some(supplement("creatine"))
        );
    }

    #[test]
    fn test_json_file_minimal_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("supplements.json");
        let json = r#"[{
            "id": "zinc",
            "name": "Zinc",
            "therapeutic_range": {"min": 15, "max": 30, "unit": "mg"},
            "evidence_level": "MODERATE"
        }]"#;
        std::fs::write(&path, json).unwrap();

        let repo = JsonFileSupplementRepository::load(&path).unwrap();
        let zinc = repo.get_supplement("zinc").unwrap().unwrap();
        assert!(zinc.active_compounds.is_empty());
        assert!(!zinc.with_food);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let result = JsonFileSupplementRepository::load(&path);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();

        let cases = [
            ("negative.json", r#"{"min": -100, "max": 50, "unit": "mg"}"#, "not positive"),
            ("inverted.json", r#"{"min": 500, "max": 100, "unit": "mg"}"#, "min 500 > max 100"),
        ];

        for (name, range, expected) in cases {
            let path = temp_dir.path().join(name);
            let json = format!(
                r#"[{{"id": "bad", "name": "Bad", "therapeutic_range": {}, "evidence_level": "WEAK"}}]"#,
                range
            );
            std::fs::write(&path, json).unwrap();

            match JsonFileSupplementRepository::load(&path) {
                Err(Error::CatalogValidation(msg)) => assert!(msg.contains(expected), "{}", msg),
                other => panic!("expected CatalogValidation for {}, got {:?}", name, other),
            }

            // Still readable for reporting problems
            let catalog = read_catalog_file(&path).unwrap();
            assert!(!catalog.validate().is_empty());
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = JsonFileSupplementRepository::load(&temp_dir.path().join("nope.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}

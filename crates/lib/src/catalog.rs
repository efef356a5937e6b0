//! # Schema Catalog
//!
//! Structured, read-only descriptions of the tables the model may query. The
//! catalog is loaded once at startup, validated, and rendered into the prompt.
//!
//! The bundled Pallas catalog and its few-shot examples live in
//! `assets/pallas.yml`; a file with the same shape can replace it.

use crate::{
    errors::CatalogError,
    example_bank::{Example, ExampleBank},
};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// The bundled Pallas catalog document.
pub const BUNDLED_CATALOG: &str = include_str!("../assets/pallas.yml");

/// One entry of a table's column glossary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnNote {
    pub name: String,
    pub description: String,
}

/// Human-readable description of a single table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableDescription {
    /// The table identifier as used in SQL.
    pub name: String,
    /// A short business label, e.g. `STORES`.
    pub label: String,
    /// What a row of the table represents.
    pub purpose: String,
    #[serde(default)]
    pub columns: Vec<ColumnNote>,
}

impl TableDescription {
    fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::MissingField {
                context: "A table description".to_string(),
                field: "name",
            });
        }
        let context = format!("Table `{}`", self.name);
        if self.label.trim().is_empty() {
            return Err(CatalogError::MissingField {
                context,
                field: "label",
            });
        }
        if self.purpose.trim().is_empty() {
            return Err(CatalogError::MissingField {
                context,
                field: "purpose",
            });
        }
        for column in &self.columns {
            if column.name.trim().is_empty() {
                return Err(CatalogError::MissingField {
                    context: format!("A column of table `{}`", self.name),
                    field: "name",
                });
            }
            if column.description.trim().is_empty() {
                return Err(CatalogError::MissingField {
                    context: format!("Column `{}.{}`", self.name, column.name),
                    field: "description",
                });
            }
        }
        Ok(())
    }

    fn render(&self) -> String {
        let mut block = format!("{}:\n{}: {}", self.name, self.label, self.purpose);
        for column in &self.columns {
            block.push_str(&format!("\n- {}: {}", column.name, column.description));
        }
        block
    }
}

/// The validated set of table descriptions, in insertion order.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    tables: Vec<TableDescription>,
}

impl SchemaCatalog {
    /// Validates the descriptions and builds the catalog.
    ///
    /// Table names are compared case-insensitively, since MySQL table
    /// references in the examples are written in upper case.
    pub fn new(tables: Vec<TableDescription>) -> Result<Self, CatalogError> {
        if tables.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for table in &tables {
            table.validate()?;
            if !seen.insert(table.name.to_lowercase()) {
                return Err(CatalogError::DuplicateTable(table.name.clone()));
            }
        }
        Ok(Self { tables })
    }

    pub fn tables(&self) -> &[TableDescription] {
        &self.tables
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Renders every table, in insertion order, for embedding into a prompt.
    pub fn render(&self) -> String {
        self.tables
            .iter()
            .map(TableDescription::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// The on-disk shape of a catalog file: tables plus the few-shot examples
/// that must only reference those tables.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    tables: Vec<TableDescription>,
    #[serde(default)]
    examples: Vec<Example>,
}

/// A catalog and example bank that were loaded together and cross-checked.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: SchemaCatalog,
    pub examples: ExampleBank,
}

impl LoadedCatalog {
    /// Parses a YAML catalog document and validates it.
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_yaml::from_str(content)?;
        let catalog = SchemaCatalog::new(document.tables)?;
        let examples = ExampleBank::new(document.examples)?;
        examples.validate_against(&catalog)?;
        Ok(Self { catalog, examples })
    }

    /// Reads and validates a catalog document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let loaded = Self::from_yaml_str(&content)?;
        info!(
            path = %path.display(),
            tables = loaded.catalog.tables().len(),
            examples = loaded.examples.len(),
            "Loaded schema catalog from file."
        );
        Ok(loaded)
    }

    /// The Pallas retail catalog shipped with the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUNDLED_CATALOG)
    }
}

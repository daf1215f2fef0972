//! Parameter catalog: every named input, derived field and output of a scenario
//!
//! The catalog is process-wide configuration data. It is built once on first
//! use and never mutated afterwards; [`ParameterCatalog::validate`] checks
//! that every formula reference resolves and that derived fields are
//! evaluated in dependency order.

mod definition;
mod table;
pub mod ids;

pub use definition::{Category, FormulaRef, ParamValue, ParameterDefinition, ParameterKind};

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::calculator::DerivedField;
use crate::error::{ConfigurationError, EngineError};

/// Ordered, read-only collection of parameter definitions
#[derive(Debug, Clone)]
pub struct ParameterCatalog {
    definitions: Vec<ParameterDefinition>,
    index: HashMap<&'static str, usize>,
}

static GLOBAL: OnceLock<ParameterCatalog> = OnceLock::new();

impl ParameterCatalog {
    /// The built-in catalog, shared by every run in the process
    pub fn global() -> &'static ParameterCatalog {
        GLOBAL.get_or_init(|| Self::from_definitions(table::definitions()))
    }

    /// Build a catalog from explicit definitions (later duplicates are caught by `validate`)
    pub fn from_definitions(definitions: Vec<ParameterDefinition>) -> Self {
        let mut index = HashMap::with_capacity(definitions.len());
        for (i, def) in definitions.iter().enumerate() {
            index.entry(def.id).or_insert(i);
        }
        Self { definitions, index }
    }

    /// All definitions in category order, then declaration order
    pub fn all(&self) -> &[ParameterDefinition] {
        &self.definitions
    }

    /// Look up a definition by id
    pub fn get(&self, id: &str) -> Result<&ParameterDefinition, EngineError> {
        self.index
            .get(id)
            .map(|&i| &self.definitions[i])
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &ParameterDefinition> {
        self.definitions.iter().filter(move |d| d.category == category)
    }

    /// Definitions whose value is produced rather than supplied
    pub fn formula_parameters(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.definitions.iter().filter(|d| d.is_formula())
    }

    /// Check ids, formula references and evaluation order
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.index.len() != self.definitions.len() {
            let mut seen = HashMap::new();
            for def in &self.definitions {
                if seen.insert(def.id, ()).is_some() {
                    return Err(ConfigurationError::DuplicateId(def.id.to_string()));
                }
            }
        }

        // Position of each derived field in the calculator's evaluation order
        let order: HashMap<&'static str, usize> = DerivedField::EVALUATION_ORDER
            .iter()
            .enumerate()
            .map(|(i, f)| (f.target(), i))
            .collect();

        for def in &self.definitions {
            let field = match def.kind {
                ParameterKind::Formula(FormulaRef::Derived(field)) => field,
                _ => continue,
            };
            if field.target() != def.id {
                return Err(ConfigurationError::MissingCalculator(def.id.to_string()));
            }
            let own_position = *order
                .get(field.target())
                .ok_or_else(|| ConfigurationError::MissingCalculator(def.id.to_string()))?;

            for &reference in field.inputs() {
                let referenced = self.get(reference).map_err(|_| ConfigurationError::DanglingReference {
                    field: def.id.to_string(),
                    reference: reference.to_string(),
                })?;

                if let ParameterKind::Formula(formula) = referenced.kind {
                    let ready = match formula {
                        FormulaRef::Derived(_) => order
                            .get(reference)
                            .map(|&p| p < own_position)
                            .unwrap_or(false),
                        FormulaRef::Ranking | FormulaRef::AllConstraintsMet => false,
                    };
                    if !ready {
                        return Err(ConfigurationError::OutOfOrderReference {
                            field: def.id.to_string(),
                            reference: reference.to_string(),
                        });
                    }
                }
            }
        }

        // Every registry entry must land on a catalog formula parameter
        for field in DerivedField::EVALUATION_ORDER {
            match self.get(field.target()).map(|d| &d.kind) {
                Ok(ParameterKind::Formula(FormulaRef::Derived(f))) if *f == field => {}
                _ => return Err(ConfigurationError::MissingCalculator(field.target().to_string())),
            }
        }

        Ok(())
    }
}

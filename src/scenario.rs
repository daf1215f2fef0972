//! A single scenario: one full assignment of catalog parameters
//!
//! Scenarios are created from the shared fixed inputs plus one cross-product
//! tuple, filled in by the calculator, then frozen once filtering completes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{ParamValue, ParameterCatalog};
use crate::error::ArithmeticError;

/// One fully assigned parameter set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// 1-based position in the full cross-product order
    pub id: u64,

    /// Passed every enabled constraint
    pub viable: bool,

    /// Value for every parameter id
    pub values: BTreeMap<String, ParamValue>,
}

impl Scenario {
    pub fn new(id: u64, values: BTreeMap<String, ParamValue>) -> Self {
        Self {
            id,
            viable: false,
            values,
        }
    }

    pub fn get(&self, id: &str) -> Option<&ParamValue> {
        self.values.get(id)
    }

    /// Numeric value of a parameter, as required by the calculator
    pub fn number(&self, id: &str) -> Result<f64, ArithmeticError> {
        self.values
            .get(id)
            .and_then(ParamValue::as_number)
            .ok_or_else(|| ArithmeticError::MissingInput(id.to_string()))
    }

    /// Numeric value or NaN, for reporting paths that tolerate gaps
    pub fn number_or_nan(&self, id: &str) -> f64 {
        self.number(id).unwrap_or(f64::NAN)
    }

    pub fn set(&mut self, id: &str, value: impl Into<ParamValue>) {
        self.values.insert(id.to_string(), value.into());
    }

    /// True once every catalog parameter, formulas included, has a value
    pub fn is_complete(&self, catalog: &ParameterCatalog) -> bool {
        catalog.all().iter().all(|d| self.values.contains_key(d.id))
    }

    /// Parameters missing from this scenario
    pub fn missing<'c>(&self, catalog: &'c ParameterCatalog) -> Vec<&'c str> {
        catalog
            .all()
            .iter()
            .filter(|d| !self.values.contains_key(d.id))
            .map(|d| d.id)
            .collect()
    }
}

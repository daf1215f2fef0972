//! Fixed inputs shared by every scenario, and project intake data that seeds them

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{EngineConfig, RangeSpec};
use crate::catalog::{ids, ParamValue, ParameterCatalog};
use crate::error::{ConfigurationError, EngineError};

/// Hours in an average month, used to turn a per-kWh rate into monthly rent
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Width of the rent band placed around a project's contracted rent
const RENT_BAND: f64 = 0.20;

/// Values for every non-formula parameter
///
/// Ranged parameters are overwritten per scenario; everything else is read
/// from here unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedInputs {
    values: BTreeMap<String, ParamValue>,
}

impl FixedInputs {
    /// Catalog defaults for every input parameter
    pub fn from_catalog(catalog: &ParameterCatalog) -> Self {
        let values = catalog
            .all()
            .iter()
            .filter_map(|d| d.default_value().map(|v| (d.id.to_string(), v)))
            .collect();
        Self { values }
    }

    /// Override one input, checking the id and value type against the catalog
    pub fn set(
        &mut self,
        catalog: &ParameterCatalog,
        id: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), EngineError> {
        let value = value.into();
        let definition = catalog
            .get(id)
            .map_err(|_| ConfigurationError::UnknownParameter(id.to_string()))?;
        if definition.is_formula() {
            return Err(ConfigurationError::NotAnInput(id.to_string()).into());
        }
        if !definition.accepts(&value) {
            return Err(ConfigurationError::TypeMismatch {
                id: id.to_string(),
                expected: definition.expected_type(),
            }
            .into());
        }
        self.values.insert(id.to_string(), value);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ParamValue> {
        self.values.get(id)
    }

    pub fn number(&self, id: &str) -> Option<f64> {
        self.get(id).and_then(ParamValue::as_number)
    }

    pub fn values(&self) -> &BTreeMap<String, ParamValue> {
        &self.values
    }
}

/// Project intake fields that seed a run
///
/// Missing or zero fields leave the corresponding inputs untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    /// Total internal capex for the site, land included
    #[serde(default)]
    pub capex_total: Option<f64>,
    #[serde(default)]
    pub power_capacity_mw: Option<f64>,
    #[serde(default)]
    pub expected_pue: Option<f64>,
    /// Contracted offtaker rate per kWh
    #[serde(default)]
    pub offtaker_rent_per_kwh: Option<f64>,
}

fn supplied(field: Option<f64>) -> Option<f64> {
    field.filter(|v| *v != 0.0)
}

impl ProjectData {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, EngineError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Apply this project to a set of fixed inputs and ranges
    ///
    /// - `power_capacity_mw` sets `GrossITLoad_01`, `expected_pue` sets `PUE_02`.
    /// - `capex_total` sets `CapexCostPrice_08` per MW so that internal project
    ///   costs (capex per MW times load, plus land) equal `capex_total`.
    /// - `offtaker_rent_per_kwh` replaces the `GrossMonthlyRent_04` range with
    ///   a ±20% band around `rate * GrossITLoad * 1000 * 730`, in five steps.
    ///
    /// Parameters set here are removed from the ranges so the project value
    /// is not overridden per scenario.
    pub fn apply(
        &self,
        catalog: &ParameterCatalog,
        fixed: &FixedInputs,
        config: &EngineConfig,
    ) -> Result<(FixedInputs, EngineConfig), EngineError> {
        let mut fixed = fixed.clone();
        let mut config = config.clone();

        if let Some(load) = supplied(self.power_capacity_mw) {
            fixed.set(catalog, ids::GROSS_IT_LOAD, load)?;
            config = config.without_range(ids::GROSS_IT_LOAD);
        }
        if let Some(pue) = supplied(self.expected_pue) {
            fixed.set(catalog, ids::PUE, pue)?;
            config = config.without_range(ids::PUE);
        }

        let load = fixed
            .number(ids::GROSS_IT_LOAD)
            .ok_or_else(|| ConfigurationError::TypeMismatch {
                id: ids::GROSS_IT_LOAD.to_string(),
                expected: "number",
            })?;

        if let Some(capex) = supplied(self.capex_total) {
            let land = fixed.number(ids::LAND_PURCHASE_FEES).unwrap_or(0.0);
            if load <= 0.0 || capex < land {
                return Err(ConfigurationError::InvalidRange {
                    id: ids::CAPEX_COST_PRICE.to_string(),
                    reason: format!("capex_total {} cannot cover land {} at {} MW", capex, land, load),
                }
                .into());
            }
            fixed.set(catalog, ids::CAPEX_COST_PRICE, (capex - land) / load)?;
            config = config.without_range(ids::CAPEX_COST_PRICE);
        }

        if let Some(rate) = supplied(self.offtaker_rent_per_kwh) {
            let monthly = rate * load * 1000.0 * HOURS_PER_MONTH;
            let min = monthly * (1.0 - RENT_BAND);
            let max = monthly * (1.0 + RENT_BAND);
            let spec = RangeSpec::new(min, max, (max - min) / 4.0);
            config = config.with_range(catalog, ids::GROSS_MONTHLY_RENT, spec)?;
        }

        Ok((fixed, config))
    }
}

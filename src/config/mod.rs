//! Engine configuration: ranged parameters and their expansion
//!
//! [`EngineConfig`] is an immutable value. Narrowing or widening a range
//! returns a new config, so concurrent runs never see each other's edits.

pub mod loader;
mod project;

pub use project::{FixedInputs, ProjectData};

use serde::{Deserialize, Serialize};

use crate::catalog::{ids, ParameterCatalog};
use crate::error::{ConfigurationError, EngineError};

/// Upper bound on the values a single range may expand to
pub const MAX_VALUES_PER_RANGE: usize = 100_000;

/// How a range is stepped from `min` towards `max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepPolicy {
    /// `v += step` while `v <= max`; floating-point drift is kept as is
    #[default]
    Accumulate,
    /// `min + i * step` for each whole step that fits, so no drift builds up
    Counted,
}

/// Range for one variable parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct RangeSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Accumulated expansion of min/max/step, kept for output only
    ///
    /// Always derived from the bounds: runs re-expand with their own
    /// [`StepPolicy`] and deserializing recomputes it. Empty for a range
    /// that fails validation.
    pub current: Vec<f64>,
}

/// Serialized form of a range; `current` is never read back
#[derive(Deserialize)]
struct RangeBounds {
    min: f64,
    max: f64,
    step: f64,
}

impl TryFrom<RangeBounds> for RangeSpec {
    type Error = String;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        let mut spec = Self {
            min: bounds.min,
            max: bounds.max,
            step: bounds.step,
            current: Vec::new(),
        };
        spec.validate()?;
        spec.select();
        Ok(spec)
    }
}

impl RangeSpec {
    /// Build a range and select its full expansion
    ///
    /// Nothing is expanded for an invalid range; [`EngineConfig::with_range`]
    /// reports it.
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        let mut spec = Self {
            min,
            max,
            step,
            current: Vec::new(),
        };
        if spec.validate().is_ok() {
            spec.select();
        }
        spec
    }

    /// Single-value range
    pub fn fixed(value: f64) -> Self {
        Self::new(value, value, 0.0)
    }

    fn select(&mut self) {
        self.current = self.expand(StepPolicy::Accumulate);
    }

    /// Ordered candidate values, ascending from `min`, never past `max`
    ///
    /// A degenerate range (`step <= 0` or `max <= min`) yields `[min]`.
    /// Accumulation stops once adding `step` no longer moves the value.
    pub fn expand(&self, policy: StepPolicy) -> Vec<f64> {
        if self.is_degenerate() {
            return vec![self.min];
        }

        match policy {
            StepPolicy::Accumulate => {
                let mut values = Vec::new();
                let mut v = self.min;
                while v <= self.max {
                    values.push(v);
                    let next = v + self.step;
                    if next <= v {
                        break;
                    }
                    v = next;
                }
                values
            }
            StepPolicy::Counted => {
                let steps = ((self.max - self.min) / self.step + 1e-9).floor() as usize;
                (0..=steps)
                    .map(|i| (self.min + i as f64 * self.step).min(self.max))
                    .collect()
            }
        }
    }

    /// Non-finite bounds are treated as degenerate here and rejected by `validate`
    fn is_degenerate(&self) -> bool {
        self.step <= 0.0 || self.max <= self.min || !self.max.is_finite() || !self.step.is_finite()
    }

    /// Number of values `expand` would produce, without allocating them
    pub fn len(&self, policy: StepPolicy) -> usize {
        if self.is_degenerate() {
            return 1;
        }
        match policy {
            StepPolicy::Accumulate => {
                let mut count = 0;
                let mut v = self.min;
                while v <= self.max {
                    count += 1;
                    let next = v + self.step;
                    if next <= v {
                        break;
                    }
                    v = next;
                }
                count
            }
            StepPolicy::Counted => ((self.max - self.min) / self.step + 1e-9).floor() as usize + 1,
        }
    }

    /// Reason the range cannot be expanded, if any
    fn validate(&self) -> Result<(), String> {
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return Err("bounds and step must be finite".to_string());
        }
        if self.is_degenerate() {
            return Ok(());
        }
        if (self.max - self.min) / self.step > MAX_VALUES_PER_RANGE as f64 {
            return Err(format!("more than {} values", MAX_VALUES_PER_RANGE));
        }
        // Magnitude peaks at one of the bounds, so both must still move
        if self.min + self.step == self.min || self.max - self.step == self.max {
            return Err(format!("step {} is below the precision of the bounds", self.step));
        }
        Ok(())
    }

    fn check(&self, id: &str) -> Result<(), ConfigurationError> {
        self.validate().map_err(|reason| ConfigurationError::InvalidRange {
            id: id.to_string(),
            reason,
        })
    }
}

/// A ranged parameter, keyed by catalog id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeEntry {
    pub id: String,
    pub spec: RangeSpec,
}

/// Ordered set of ranged parameters
///
/// Entry order is the cross-product key order: the first entry varies
/// slowest, the last fastest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    ranges: Vec<RangeEntry>,
}

impl EngineConfig {
    /// Config with no ranged parameters (every value comes from fixed inputs)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from (id, range) pairs, checking every id against the catalog
    pub fn from_ranges<I, S>(catalog: &ParameterCatalog, ranges: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (S, RangeSpec)>,
        S: Into<String>,
    {
        let mut config = Self::empty();
        for (id, spec) in ranges {
            config = config.with_range(catalog, id, spec)?;
        }
        Ok(config)
    }

    /// Default ranges, all single-valued until widened
    pub fn default_ranges(catalog: &ParameterCatalog) -> Result<Self, EngineError> {
        Self::from_ranges(
            catalog,
            [
                // Financial
                (ids::GROSS_MONTHLY_RENT, RangeSpec::new(160.0, 160.0, 20.0)),
                (ids::OPEX, RangeSpec::new(20.0, 20.0, 5.0)),
                (ids::CAPEX_COST_PRICE, RangeSpec::new(7_500_000.0, 7_500_000.0, 3_500_000.0)),
                (ids::CAPEX_MARKET_RATE, RangeSpec::fixed(11_000_000.0)),
                (ids::LAND_PURCHASE_FEES, RangeSpec::fixed(10_000_000.0)),
                (ids::TOTAL_STRUCTURING_FEES, RangeSpec::fixed(33_305_000.0)),
                // Senior debt
                (ids::TARGET_DSCR_SENIOR, RangeSpec::new(1.65, 1.65, 0.05)),
                (ids::SENIOR_COUPON, RangeSpec::new(4.0, 4.0, 0.25)),
                (ids::SENIOR_TENOR, RangeSpec::new(15.0, 15.0, 5.0)),
                (ids::LEASE_TERM_YEARS, RangeSpec::new(15.0, 15.0, 5.0)),
                // Mezzanine debt
                (ids::EFFECTIVE_DSCR_BUFFER, RangeSpec::new(42.5, 42.5, 7.5)),
                (ids::TARGET_DSCR_MEZZ, RangeSpec::new(70.0, 70.0, 20.0)),
                (ids::MEZZ_COUPON, RangeSpec::new(7.0, 7.0, 0.25)),
                (ids::MEZZ_TENOR_YEARS, RangeSpec::new(15.0, 15.0, 5.0)),
                // Equity
                (ids::DEBT_HEADROOM, RangeSpec::new(20.0, 20.0, 5.0)),
                (ids::TARGET_EQUITY_IRR, RangeSpec::new(16.0, 16.0, 1.0)),
            ],
        )
    }

    /// New config with `id` ranged (replacing any existing range in place)
    pub fn with_range(
        &self,
        catalog: &ParameterCatalog,
        id: impl Into<String>,
        mut spec: RangeSpec,
    ) -> Result<Self, EngineError> {
        let id = id.into();
        let definition = catalog
            .get(&id)
            .map_err(|_| ConfigurationError::UnknownParameter(id.clone()))?;
        if !definition.is_numeric_input() {
            return Err(ConfigurationError::NotRangeable(id).into());
        }
        spec.check(&id)?;
        spec.select();

        let mut next = self.clone();
        match next.ranges.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.spec = spec,
            None => next.ranges.push(RangeEntry { id, spec }),
        }
        Ok(next)
    }

    /// New config with the bounds of an existing range replaced
    ///
    /// The selected values are re-expanded from the new bounds.
    pub fn update_range(&self, id: &str, min: f64, max: f64, step: f64) -> Result<Self, EngineError> {
        let position = self
            .ranges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ConfigurationError::UnknownParameter(id.to_string()))?;

        let mut spec = RangeSpec { min, max, step, current: Vec::new() };
        spec.check(id)?;
        spec.select();

        let mut next = self.clone();
        next.ranges[position].spec = spec;
        Ok(next)
    }

    /// New config without the range for `id`
    pub fn without_range(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.ranges.retain(|e| e.id != id);
        next
    }

    pub fn ranges(&self) -> &[RangeEntry] {
        &self.ranges
    }

    pub fn range(&self, id: &str) -> Option<&RangeSpec> {
        self.ranges.iter().find(|e| e.id == id).map(|e| &e.spec)
    }

    /// Expanded value list per ranged parameter, in key order
    pub fn expanded(&self, policy: StepPolicy) -> Vec<(String, Vec<f64>)> {
        self.ranges
            .iter()
            .map(|e| (e.id.clone(), e.spec.expand(policy)))
            .collect()
    }
}

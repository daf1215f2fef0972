//! Load ranged parameters from CSV
//!
//! One row per ranged parameter, in cross-product key order:
//!
//! ```text
//! parameter,min,max,step
//! GrossMonthlyRent_04,140,180,20
//! ```

use std::io::Read;
use std::path::Path;

use csv::{Reader, ReaderBuilder, Trim};

use super::{EngineConfig, RangeSpec};
use crate::catalog::ParameterCatalog;
use crate::error::EngineError;

/// Default location of the range table
pub const DEFAULT_RANGES_PATH: &str = "data/default_ranges.csv";

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct RangeRow {
    parameter: String,
    min: f64,
    max: f64,
    step: f64,
}

/// Cells are trimmed so hand-aligned tables parse
fn range_reader() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.trim(Trim::All);
    builder
}

/// Load ranges from a CSV file
pub fn load_ranges<P: AsRef<Path>>(path: P, catalog: &ParameterCatalog) -> Result<EngineConfig, EngineError> {
    let reader = range_reader().from_path(path)?;
    collect_ranges(reader, catalog)
}

/// Load ranges from any reader (e.g., string buffer)
pub fn load_ranges_from_reader<R: Read>(reader: R, catalog: &ParameterCatalog) -> Result<EngineConfig, EngineError> {
    let reader = range_reader().from_reader(reader);
    collect_ranges(reader, catalog)
}

/// Load ranges from the default location
pub fn load_default_ranges(catalog: &ParameterCatalog) -> Result<EngineConfig, EngineError> {
    load_ranges(DEFAULT_RANGES_PATH, catalog)
}

fn collect_ranges<R: Read>(mut reader: Reader<R>, catalog: &ParameterCatalog) -> Result<EngineConfig, EngineError> {
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: RangeRow = result?;
        rows.push((row.parameter, RangeSpec::new(row.min, row.max, row.step)));
    }
    log::debug!("Loaded {} ranged parameters", rows.len());
    EngineConfig::from_ranges(catalog, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids;
    use crate::config::StepPolicy;
    use crate::error::ConfigurationError;

    #[test]
    fn test_load_ranges_from_reader() {
        let csv = "parameter,min,max,step\n\
                   GrossMonthlyRent_04, 140, 180, 20\n\
                   SeniorTenor_18,10,20,5\n";
        let config = load_ranges_from_reader(csv.as_bytes(), ParameterCatalog::global()).unwrap();

        assert_eq!(config.ranges().len(), 2);
        assert_eq!(config.ranges()[0].id, ids::GROSS_MONTHLY_RENT);
        assert_eq!(
            config.range(ids::SENIOR_TENOR).unwrap().expand(StepPolicy::Accumulate),
            vec![10.0, 15.0, 20.0]
        );
    }

    #[test]
    fn test_unknown_parameter_row() {
        let csv = "parameter,min,max,step\nMadeUp_99,1,2,1\n";
        let result = load_ranges_from_reader(csv.as_bytes(), ParameterCatalog::global());
        assert!(matches!(
            result,
            Err(EngineError::Configuration(ConfigurationError::UnknownParameter(_)))
        ));
    }

    #[test]
    fn test_malformed_number() {
        let csv = "parameter,min,max,step\nOPEX_06,low,30,5\n";
        let result = load_ranges_from_reader(csv.as_bytes(), ParameterCatalog::global());
        assert!(matches!(result, Err(EngineError::Csv(_))));
    }

    #[test]
    fn test_padded_file_matches_reader() {
        let csv = "parameter, min, max, step\n\
                   GrossMonthlyRent_04, 140, 180, 20\n\
                   SeniorTenor_18 ,10 ,20 ,5\n";
        let path = std::env::temp_dir().join(format!("capstack_padded_ranges_{}.csv", std::process::id()));
        std::fs::write(&path, csv).unwrap();

        let from_file = load_ranges(&path, ParameterCatalog::global());
        std::fs::remove_file(&path).ok();
        let from_file = from_file.unwrap();

        assert_eq!(from_file, load_ranges_from_reader(csv.as_bytes(), ParameterCatalog::global()).unwrap());
        assert_eq!(
            from_file.range(ids::GROSS_MONTHLY_RENT).unwrap().expand(StepPolicy::Accumulate),
            vec![140.0, 160.0, 180.0]
        );
    }

    #[test]
    fn test_oversized_row_rejected() {
        let csv = "parameter,min,max,step\nLandPurchaseFees_10,0,1e10,1\n";
        let result = load_ranges_from_reader(csv.as_bytes(), ParameterCatalog::global());
        assert!(matches!(
            result,
            Err(EngineError::Configuration(ConfigurationError::InvalidRange { .. }))
        ));
    }

    #[test]
    fn test_load_default_ranges() {
        let config = load_default_ranges(ParameterCatalog::global()).expect("Failed to load ranges");
        assert!(!config.ranges().is_empty());
        assert!(config.range(ids::LEASE_TERM_YEARS).is_some());
        assert!(config.range(ids::SENIOR_TENOR).is_some());
    }
}

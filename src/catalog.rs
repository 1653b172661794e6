//! # Field and Unit Catalog
//!
//! The forecast API only accepts a fixed set of field paths in its `fields`
//! parameter and three unit systems in `units`. Both sets are part of the
//! external contract: adding a field path is a code change, not configuration.
//!
//! The field whitelist doubles as the typed lookup table for
//! [`ForecastDataPoint::get`](crate::forecast::ForecastDataPoint::get). Each
//! entry pairs the dotted API path with an [`Accessor`] describing where the
//! value lives in a decoded record, so lookups dispatch through the table
//! instead of building keys at runtime.
//!
//! ## Path forms
//! - `wind.speed`: a leaf, stored under the flattened key `wind_speed`
//! - `wind.*`: a wildcard, resolves to the whole nested `wind` object
//! - `swell.components[].period`: the API's list notation for a swell
//!   component attribute; lookups read the `combined` component
//! - `swell.components.primary.period`: a named swell component attribute

use std::fmt;
use std::str::FromStr;

use crate::error::{ForecastError, Result};

/// Where a whitelisted field is read from in a decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    /// Scalar stored under this key of the flattened record
    Leaf(&'static str),
    /// Whole nested object stored under this top-level key of the raw record
    Group(&'static str),
}

/// One entry of the field whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Dotted API path, exactly as sent in the `fields` parameter
    pub path: &'static str,
    pub accessor: Accessor,
}

const fn leaf(path: &'static str, key: &'static str) -> FieldSpec {
    FieldSpec {
        path,
        accessor: Accessor::Leaf(key),
    }
}

const fn group(path: &'static str, key: &'static str) -> FieldSpec {
    FieldSpec {
        path,
        accessor: Accessor::Group(key),
    }
}

/// Every field path accepted by the forecast API.
pub const FIELD_TABLE: &[FieldSpec] = &[
    leaf("timestamp", "timestamp"),
    leaf("localTimestamp", "localTimestamp"),
    leaf("issueTimestamp", "issueTimestamp"),
    leaf("fadedRating", "fadedRating"),
    leaf("solidRating", "solidRating"),
    leaf("threeHourTimeText", "threeHourTimeText"),
    // swell
    group("swell.*", "swell"),
    leaf("swell.minBreakingHeight", "swell_minBreakingHeight"),
    leaf("swell.absMinBreakingHeight", "swell_absMinBreakingHeight"),
    leaf("swell.maxBreakingHeight", "swell_maxBreakingHeight"),
    leaf("swell.absMaxBreakingHeight", "swell_absMaxBreakingHeight"),
    leaf("swell.probability", "swell_probability"),
    leaf("swell.unit", "swell_unit"),
    leaf("swell.components[].absHeight", "swell_components_combined_absHeight"),
    leaf("swell.components[].period", "swell_components_combined_period"),
    leaf("swell.components[].direction", "swell_components_combined_direction"),
    leaf(
        "swell.components[].compassDirection",
        "swell_components_combined_compassDirection",
    ),
    leaf("swell.components[].isIncoming", "swell_components_combined_isIncoming"),
    leaf("swell.components.combined.height", "swell_components_combined_height"),
    leaf("swell.components.combined.period", "swell_components_combined_period"),
    leaf("swell.components.combined.direction", "swell_components_combined_direction"),
    leaf(
        "swell.components.combined.compassDirection",
        "swell_components_combined_compassDirection",
    ),
    leaf("swell.components.primary.height", "swell_components_primary_height"),
    leaf("swell.components.primary.period", "swell_components_primary_period"),
    leaf("swell.components.primary.direction", "swell_components_primary_direction"),
    leaf(
        "swell.components.primary.compassDirection",
        "swell_components_primary_compassDirection",
    ),
    leaf("swell.components.secondary.height", "swell_components_secondary_height"),
    leaf("swell.components.secondary.period", "swell_components_secondary_period"),
    leaf("swell.components.secondary.direction", "swell_components_secondary_direction"),
    leaf(
        "swell.components.secondary.compassDirection",
        "swell_components_secondary_compassDirection",
    ),
    leaf("swell.components.tertiary.height", "swell_components_tertiary_height"),
    leaf("swell.components.tertiary.period", "swell_components_tertiary_period"),
    leaf("swell.components.tertiary.direction", "swell_components_tertiary_direction"),
    leaf(
        "swell.components.tertiary.compassDirection",
        "swell_components_tertiary_compassDirection",
    ),
    // wind
    group("wind.*", "wind"),
    leaf("wind.speed", "wind_speed"),
    leaf("wind.direction", "wind_direction"),
    leaf("wind.compassDirection", "wind_compassDirection"),
    leaf("wind.chill", "wind_chill"),
    leaf("wind.gusts", "wind_gusts"),
    leaf("wind.unit", "wind_unit"),
    // condition
    group("condition.*", "condition"),
    leaf("condition.temperature", "condition_temperature"),
    leaf("condition.weather", "condition_weather"),
    leaf("condition.pressure", "condition_pressure"),
    leaf("condition.unitPressure", "condition_unitPressure"),
    leaf("condition.unit", "condition_unit"),
    // charts
    group("charts.*", "charts"),
    leaf("charts.swell", "charts_swell"),
    leaf("charts.period", "charts_period"),
    leaf("charts.wind", "charts_wind"),
    leaf("charts.pressure", "charts_pressure"),
    leaf("charts.sst", "charts_sst"),
];

const UNIT_TABLE: &[Unit] = &[Unit::Us, Unit::Uk, Unit::Eu];

/// Unit systems accepted by the `units` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Us,
    Uk,
    Eu,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Us, Unit::Uk, Unit::Eu];

    /// Wire code for this unit system.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Us => "us",
            Unit::Uk => "uk",
            Unit::Eu => "eu",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ForecastError;

    /// Exact, case-sensitive match against the three wire codes.
    fn from_str(s: &str) -> Result<Self> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| ForecastError::InvalidUnit(s.to_string()))
    }
}

/// Chart images published with each forecast record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartType {
    Swell,
    Period,
    Wind,
    Pressure,
    Sst,
}

impl ChartType {
    pub const ALL: [ChartType; 5] = [
        ChartType::Swell,
        ChartType::Period,
        ChartType::Wind,
        ChartType::Pressure,
        ChartType::Sst,
    ];

    /// Field path of this chart's URL.
    pub fn field_path(&self) -> &'static str {
        match self {
            ChartType::Swell => "charts.swell",
            ChartType::Period => "charts.period",
            ChartType::Wind => "charts.wind",
            ChartType::Pressure => "charts.pressure",
            ChartType::Sst => "charts.sst",
        }
    }
}

impl FromStr for ChartType {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "swell" => Ok(ChartType::Swell),
            "period" => Ok(ChartType::Period),
            "wind" => Ok(ChartType::Wind),
            "pressure" => Ok(ChartType::Pressure),
            "sst" => Ok(ChartType::Sst),
            other => Err(ForecastError::InvalidField(format!("charts.{other}"))),
        }
    }
}

/// Immutable whitelist of field paths and unit systems.
///
/// The catalog is plain data handed to [`QueryBuilder`](crate::query::QueryBuilder)
/// and to field lookups; it holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct FieldCatalog {
    fields: &'static [FieldSpec],
    units: &'static [Unit],
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl FieldCatalog {
    /// Catalog matching the public forecast API.
    pub const fn standard() -> Self {
        FieldCatalog {
            fields: FIELD_TABLE,
            units: UNIT_TABLE,
        }
    }

    /// Build a catalog over a custom table (used to restrict the accepted set).
    pub const fn new(fields: &'static [FieldSpec], units: &'static [Unit]) -> Self {
        FieldCatalog { fields, units }
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.fields.iter().any(|spec| spec.path == path)
    }

    /// Look up a field path, failing with `InvalidField` naming the path.
    pub fn resolve(&self, path: &str) -> Result<&'static FieldSpec> {
        self.fields
            .iter()
            .find(|spec| spec.path == path)
            .ok_or_else(|| ForecastError::InvalidField(path.to_string()))
    }

    /// Validate a whole field list, stopping at the first unknown path.
    pub fn validate_fields<S: AsRef<str>>(&self, paths: &[S]) -> Result<()> {
        for path in paths {
            self.resolve(path.as_ref())?;
        }
        Ok(())
    }

    /// Parse and validate a unit code.
    pub fn validate_unit(&self, code: &str) -> Result<Unit> {
        let unit: Unit = code.parse()?;
        if self.units.contains(&unit) {
            Ok(unit)
        } else {
            Err(ForecastError::InvalidUnit(code.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_whitelisted_field_resolves() {
        let catalog = FieldCatalog::standard();
        for spec in FIELD_TABLE {
            assert_eq!(catalog.resolve(spec.path).unwrap().path, spec.path);
        }
        assert!(catalog.validate_fields(&["timestamp", "wind.*", "condition.temperature"]).is_ok());
    }

    #[test]
    fn test_unknown_field_is_rejected_by_name() {
        let catalog = FieldCatalog::standard();
        let err = catalog
            .validate_fields(&["timestamp", "wind.*", "invalid"])
            .unwrap_err();
        assert_eq!(err, ForecastError::InvalidField("invalid".to_string()));
    }

    #[test]
    fn test_field_paths_are_unique() {
        for (i, a) in FIELD_TABLE.iter().enumerate() {
            for b in &FIELD_TABLE[i + 1..] {
                assert_ne!(a.path, b.path, "duplicate whitelist entry");
            }
        }
    }

    #[test]
    fn test_valid_units() {
        let catalog = FieldCatalog::standard();
        for code in ["us", "uk", "eu"] {
            assert_eq!(catalog.validate_unit(code).unwrap().as_str(), code);
        }
    }

    #[test]
    fn test_invalid_units() {
        let catalog = FieldCatalog::standard();
        for code in ["invalid", "US", "", " us", "metric"] {
            assert_eq!(
                catalog.validate_unit(code),
                Err(ForecastError::InvalidUnit(code.to_string()))
            );
        }
    }

    #[test]
    fn test_restricted_catalog() {
        static ONLY_TIME: [FieldSpec; 1] = [leaf("timestamp", "timestamp")];
        static ONLY_EU: [Unit; 1] = [Unit::Eu];
        let catalog = FieldCatalog::new(&ONLY_TIME, &ONLY_EU);

        assert!(catalog.contains("timestamp"));
        assert!(!catalog.contains("wind.speed"));
        assert!(catalog.validate_unit("eu").is_ok());
        assert!(catalog.validate_unit("us").is_err());
    }

    #[test]
    fn test_chart_types_are_whitelisted() {
        let catalog = FieldCatalog::standard();
        for chart in ChartType::ALL {
            assert!(catalog.contains(chart.field_path()));
        }
        assert!("gif".parse::<ChartType>().is_err());
    }
}

//! CSV ingestion for the county-level input data.
//!
//! Numeric cells are parsed leniently: blanks, stray text, and non-finite
//! values all become `None` so that a single bad cell never aborts a run.
//! Which columns were present in the header is tracked separately, because
//! several downstream steps only apply when their source columns exist.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Deserializer};

use crate::error::{ReportError, Result};

/// Header names understood by the pipeline.
pub mod columns {
    pub const COUNTY: &str = "county_full";
    pub const STATE: &str = "state_full";
    pub const CLINIC_COUNT: &str = "clinic_count";
    pub const POPULATION: &str = "population";
    pub const SVI_OVERALL: &str = "svi_overall";
    pub const SVI_SOCIOECONOMIC: &str = "svi_socioeconomic";
    pub const STROKE: &str = "stroke";
    pub const PHYSICAL_INACTIVITY: &str = "physical_inactivity";
    pub const SELF_CARE_DISABILITY: &str = "self_care_disability";
    pub const SOCIAL_ISOLATION: &str = "social_isolation";
    pub const HEALTH_BURDEN: &str = "health_burden_score";
    pub const CLINICS_PER_100K: &str = "clinics_per_100k";
    pub const HEALTH_NEED: &str = "health_need";
    pub const POP_ADJUSTED_GAP: &str = "pop_adjusted_gap";
}

/// Columns the report cannot be built without.
const REQUIRED_COLUMNS: &[&str] = &[
    columns::COUNTY,
    columns::STATE,
    columns::CLINIC_COUNT,
    columns::SVI_OVERALL,
    columns::SVI_SOCIOECONOMIC,
];

/// One input row. Optional fields are `None` when the column is missing or
/// the cell did not parse as a finite number.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountyRecord {
    #[serde(rename = "county_full", default)]
    pub county: String,
    #[serde(rename = "state_full", default)]
    pub state: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub clinic_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub population: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub svi_overall: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub svi_socioeconomic: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub stroke: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub physical_inactivity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub self_care_disability: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub social_isolation: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub health_burden_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub clinics_per_100k: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub health_need: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pop_adjusted_gap: Option<f64>,
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite()))
}

/// The parsed input: all rows plus the set of header columns that were
/// actually present. Derivation steps extend the column set as they add
/// values (see [`crate::metrics::enrich`]).
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<CountyRecord>,
    present: HashSet<String>,
}

impl Dataset {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ReportError::io(path, e))?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut csv = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let present: HashSet<String> = csv
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !present.contains(*c))
            .collect();
        if !missing.is_empty() {
            return Err(ReportError::MissingColumns(missing.join(", ")));
        }

        let mut rows = Vec::new();
        for record in csv.deserialize() {
            rows.push(record?);
        }
        if rows.is_empty() {
            return Err(ReportError::EmptyDataset);
        }

        Ok(Self { rows, present })
    }

    pub fn rows(&self) -> &[CountyRecord] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [CountyRecord] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.present.contains(name)
    }

    /// Marks a derived column as available for later steps.
    pub(crate) fn add_column(&mut self, name: &str) {
        self.present.insert(name.to_string());
    }

    /// All finite values of one field, in row order.
    pub fn finite_values(&self, select: impl Fn(&CountyRecord) -> Option<f64>) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|r| select(r))
            .filter(|v| v.is_finite())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn parse(input: &str) -> Dataset {
        Dataset::from_reader(input.as_bytes()).unwrap()
    }

    #[test]
    fn reads_rows_and_tracks_columns() {
        let data = parse(indoc! {"
            county_full,state_full,clinic_count,svi_overall,svi_socioeconomic,population
            Adams County,Ohio,3,0.81,0.77,27000
            Baker County,Oregon,0,0.42,0.35,16000
        "});
        assert_eq!(data.len(), 2);
        assert!(data.has_column(columns::POPULATION));
        assert!(!data.has_column(columns::HEALTH_BURDEN));
        assert_eq!(data.rows()[0].county, "Adams County");
        assert_eq!(data.rows()[1].clinic_count, Some(0.0));
    }

    #[test]
    fn bad_cells_become_none() {
        let data = parse(indoc! {"
            county_full,state_full,clinic_count,svi_overall,svi_socioeconomic
            Adams County,Ohio,three,0.81,
            Baker County,Oregon, 2 ,inf,0.35
        "});
        assert_eq!(data.rows()[0].clinic_count, None);
        assert_eq!(data.rows()[0].svi_socioeconomic, None);
        // whitespace is trimmed, non-finite values are rejected
        assert_eq!(data.rows()[1].clinic_count, Some(2.0));
        assert_eq!(data.rows()[1].svi_overall, None);
    }

    #[test]
    fn short_rows_are_padded_with_none() {
        let data = parse(indoc! {"
            county_full,state_full,clinic_count,svi_overall,svi_socioeconomic,population
            Adams County,Ohio,3,0.81,0.77
        "});
        assert_eq!(data.rows()[0].population, None);
    }

    #[test]
    fn missing_required_columns_are_reported_together() {
        let err = Dataset::from_reader(
            indoc! {"
                county_full,clinic_count
                Adams County,3
            "}
            .as_bytes(),
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("state_full"));
        assert!(message.contains("svi_overall"));
        assert!(message.contains("svi_socioeconomic"));
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = Dataset::from_reader(
            "county_full,state_full,clinic_count,svi_overall,svi_socioeconomic\n".as_bytes(),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::EmptyDataset));
    }

    #[test]
    fn finite_values_keeps_row_order() {
        let data = parse(indoc! {"
            county_full,state_full,clinic_count,svi_overall,svi_socioeconomic
            A,X,5,0.1,0.2
            B,X,,0.3,0.4
            C,Y,1,0.5,0.6
        "});
        assert_eq!(data.finite_values(|r| r.clinic_count), vec![5.0, 1.0]);
    }
}

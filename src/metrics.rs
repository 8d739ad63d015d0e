//! Derived access metrics and the grouping helpers built on top of them.
//!
//! [`enrich`] fills in the columns the report needs when the input does not
//! already carry them. Each derivation only runs when its source columns are
//! present, and a column that came in with the CSV is never overwritten.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::dataset::{columns, CountyRecord, Dataset};
use crate::stats;

/// Placeholder used when the input has no population column at all.
pub const DEFAULT_POPULATION: f64 = 100_000.0;

/// How many counties the ranking page shows.
pub const TOP_COUNTY_COUNT: usize = 20;

/// How many states the density page shows.
pub const TOP_STATE_COUNT: usize = 15;

/// Runs every derivation in dependency order.
pub fn enrich(data: &mut Dataset) {
    derive_health_burden(data);
    ensure_population(data);
    derive_clinic_density(data);
    derive_health_need(data);
    derive_pop_adjusted_gap(data);
}

fn burden_components(data: &Dataset) -> Vec<fn(&CountyRecord) -> Option<f64>> {
    let all: [(&str, fn(&CountyRecord) -> Option<f64>); 4] = [
        (columns::STROKE, |r| r.stroke),
        (columns::PHYSICAL_INACTIVITY, |r| r.physical_inactivity),
        (columns::SELF_CARE_DISABILITY, |r| r.self_care_disability),
        (columns::SOCIAL_ISOLATION, |r| r.social_isolation),
    ];
    all.iter()
        .filter(|(name, _)| data.has_column(name))
        .map(|&(_, select)| select)
        .collect()
}

/// Row-wise mean of whichever health variables the input carries.
fn derive_health_burden(data: &mut Dataset) {
    if data.has_column(columns::HEALTH_BURDEN) {
        return;
    }
    let selectors = burden_components(data);
    if selectors.is_empty() {
        debug!("no health variables present; skipping health burden score");
        return;
    }
    debug!(
        "averaging {} health variable(s) into {}",
        selectors.len(),
        columns::HEALTH_BURDEN
    );
    for row in data.rows_mut() {
        let values: Vec<f64> = selectors.iter().filter_map(|select| select(row)).collect();
        row.health_burden_score = stats::mean(&values);
    }
    data.add_column(columns::HEALTH_BURDEN);
}

fn ensure_population(data: &mut Dataset) {
    if data.has_column(columns::POPULATION) {
        return;
    }
    warn!(
        "no population column found; assuming {DEFAULT_POPULATION} residents per county"
    );
    for row in data.rows_mut() {
        row.population = Some(DEFAULT_POPULATION);
    }
    data.add_column(columns::POPULATION);
}

/// Clinics per 100,000 residents. Rows where the ratio cannot be formed
/// (missing count, zero population) get 0 rather than a hole.
fn derive_clinic_density(data: &mut Dataset) {
    if data.has_column(columns::CLINICS_PER_100K) {
        return;
    }
    for row in data.rows_mut() {
        let raw = match (row.clinic_count, row.population) {
            (Some(clinics), Some(population)) => clinics / population * 100_000.0,
            _ => f64::NAN,
        };
        row.clinics_per_100k = Some(if raw.is_finite() { raw } else { 0.0 });
    }
    data.add_column(columns::CLINICS_PER_100K);
}

/// Min-max normalization of the health burden score onto `[0, 1]`.
/// A degenerate range (all scores equal) maps everything to 0.
fn derive_health_need(data: &mut Dataset) {
    if data.has_column(columns::HEALTH_NEED) || !data.has_column(columns::HEALTH_BURDEN) {
        return;
    }
    let Some((lo, hi)) = stats::min_max(&data.finite_values(|r| r.health_burden_score)) else {
        return;
    };
    let range = hi - lo;
    for row in data.rows_mut() {
        row.health_need = row
            .health_burden_score
            .map(|score| if range > 0.0 { (score - lo) / range } else { 0.0 });
    }
    data.add_column(columns::HEALTH_NEED);
}

fn derive_pop_adjusted_gap(data: &mut Dataset) {
    if data.has_column(columns::POP_ADJUSTED_GAP) || !data.has_column(columns::HEALTH_NEED) {
        return;
    }
    for row in data.rows_mut() {
        row.pop_adjusted_gap = match (row.health_need, row.population) {
            (Some(need), Some(population)) => Some(need * population),
            _ => None,
        };
    }
    data.add_column(columns::POP_ADJUSTED_GAP);
}

/// Coarse clinic-presence buckets used for the grouped comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClinicPresence {
    Zero,
    Few,
    Many,
}

impl ClinicPresence {
    pub const ALL: [ClinicPresence; 3] = [Self::Zero, Self::Few, Self::Many];

    pub fn of(clinic_count: f64) -> Self {
        if clinic_count <= 0.0 {
            Self::Zero
        } else if clinic_count <= 2.0 {
            Self::Few
        } else {
            Self::Many
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Zero => "No Clinics",
            Self::Few => "1-2 Clinics",
            Self::Many => "3+ Clinics",
        }
    }
}

/// `None` when the clinic count itself is unknown.
pub fn presence_of(record: &CountyRecord) -> Option<ClinicPresence> {
    record.clinic_count.map(ClinicPresence::of)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SviQuartile {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl SviQuartile {
    pub const ALL: [SviQuartile; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    pub fn label(self) -> &'static str {
        match self {
            Self::Q1 => "Low SVI (Q1)",
            Self::Q2 => "Medium-Low SVI (Q2)",
            Self::Q3 => "Medium-High SVI (Q3)",
            Self::Q4 => "High SVI (Q4)",
        }
    }
}

/// Quartile thresholds of the overall SVI distribution, with right-closed
/// bins: a value exactly on a cut falls into the lower quartile.
#[derive(Debug, Clone, Copy)]
pub struct SviQuartileCut {
    cuts: [f64; 3],
}

impl SviQuartileCut {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        Some(Self {
            cuts: [
                stats::quantile(values, 0.25)?,
                stats::quantile(values, 0.5)?,
                stats::quantile(values, 0.75)?,
            ],
        })
    }

    pub fn classify(&self, value: f64) -> SviQuartile {
        if value <= self.cuts[0] {
            SviQuartile::Q1
        } else if value <= self.cuts[1] {
            SviQuartile::Q2
        } else if value <= self.cuts[2] {
            SviQuartile::Q3
        } else {
            SviQuartile::Q4
        }
    }
}

/// Finite values of `value` grouped by clinic presence, empty groups dropped.
pub fn presence_groups(
    data: &Dataset,
    value: impl Fn(&CountyRecord) -> Option<f64>,
) -> Vec<(ClinicPresence, Vec<f64>)> {
    ClinicPresence::ALL
        .iter()
        .filter_map(|&category| {
            let values: Vec<f64> = data
                .rows()
                .iter()
                .filter(|r| presence_of(r) == Some(category))
                .filter_map(|r| value(r))
                .filter(|v| v.is_finite())
                .collect();
            (!values.is_empty()).then_some((category, values))
        })
        .collect()
}

/// Finite values of `value` grouped by overall-SVI quartile, empty groups
/// dropped. Empty when the dataset has no usable SVI values.
pub fn svi_quartile_groups(
    data: &Dataset,
    value: impl Fn(&CountyRecord) -> Option<f64>,
) -> Vec<(SviQuartile, Vec<f64>)> {
    let Some(cut) = SviQuartileCut::from_values(&data.finite_values(|r| r.svi_overall)) else {
        return Vec::new();
    };
    SviQuartile::ALL
        .iter()
        .filter_map(|&quartile| {
            let values: Vec<f64> = data
                .rows()
                .iter()
                .filter(|r| r.svi_overall.map(|svi| cut.classify(svi)) == Some(quartile))
                .filter_map(|r| value(r))
                .filter(|v| v.is_finite())
                .collect();
            (!values.is_empty()).then_some((quartile, values))
        })
        .collect()
}

/// Per-state rollup of the county rows.
#[derive(Debug, Clone, PartialEq)]
pub struct StateStats {
    pub state: String,
    pub clinic_count: f64,
    pub population: f64,
    pub clinics_per_100k: f64,
    pub mean_health_burden: Option<f64>,
    pub mean_svi: Option<f64>,
}

/// Aggregates rows by state, in alphabetical order. Missing cells are
/// skipped: sums treat them as zero, means ignore them.
pub fn state_summaries(data: &Dataset) -> Vec<StateStats> {
    #[derive(Default)]
    struct Acc {
        clinics: f64,
        population: f64,
        burden: Vec<f64>,
        svi: Vec<f64>,
    }

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for row in data.rows() {
        let acc = groups.entry(row.state.as_str()).or_default();
        if let Some(clinics) = row.clinic_count {
            acc.clinics += clinics;
        }
        if let Some(population) = row.population {
            acc.population += population;
        }
        if let Some(burden) = row.health_burden_score {
            acc.burden.push(burden);
        }
        if let Some(svi) = row.svi_overall {
            acc.svi.push(svi);
        }
    }

    groups
        .into_iter()
        .map(|(state, acc)| {
            let raw = if acc.population > 0.0 {
                acc.clinics / acc.population * 100_000.0
            } else {
                0.0
            };
            StateStats {
                state: state.to_string(),
                clinic_count: acc.clinics,
                population: acc.population,
                clinics_per_100k: if raw.is_finite() { raw } else { 0.0 },
                mean_health_burden: stats::mean(&acc.burden),
                mean_svi: stats::mean(&acc.svi),
            }
        })
        .collect()
}

pub fn top_states_by_density(states: &[StateStats], limit: usize) -> Vec<&StateStats> {
    let mut ranked: Vec<&StateStats> = states.iter().collect();
    ranked.sort_by(|a, b| b.clinics_per_100k.total_cmp(&a.clinics_per_100k));
    ranked.truncate(limit);
    ranked
}

/// Counties ranked by population-adjusted gap, highest first. Rows without a
/// gap value are left out; ties keep their input order.
pub fn top_underserved(data: &Dataset, limit: usize) -> Vec<&CountyRecord> {
    let mut ranked: Vec<&CountyRecord> = data
        .rows()
        .iter()
        .filter(|r| r.pop_adjusted_gap.is_some_and(f64::is_finite))
        .collect();
    ranked.sort_by(|a, b| {
        let ga = a.pop_adjusted_gap.unwrap_or(f64::MIN);
        let gb = b.pop_adjusted_gap.unwrap_or(f64::MIN);
        gb.total_cmp(&ga)
    });
    ranked.truncate(limit);
    ranked
}

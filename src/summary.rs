//! Headline figures for the executive summary, plus the number formatting
//! shared by the narrative pages.

use crate::dataset::{CountyRecord, Dataset};
use crate::stats;

/// A mean compared between counties without and with clinics. Either side is
/// `None` when its group is empty or carries no values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupComparison {
    pub without_clinics: Option<f64>,
    pub with_clinics: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryFigures {
    pub total_counties: usize,
    pub counties_without_clinics: usize,
    pub counties_with_clinics: usize,
    pub total_clinics: f64,
    pub svi_overall: GroupComparison,
    pub svi_socioeconomic: GroupComparison,
    pub health_burden: GroupComparison,
}

impl SummaryFigures {
    /// Rows with an unknown clinic count stay out of both groups but still
    /// count toward the total.
    pub fn compute(data: &Dataset) -> Self {
        let without: Vec<&CountyRecord> = data
            .rows()
            .iter()
            .filter(|r| r.clinic_count == Some(0.0))
            .collect();
        let with: Vec<&CountyRecord> = data
            .rows()
            .iter()
            .filter(|r| r.clinic_count.is_some_and(|c| c > 0.0))
            .collect();

        let compare = |select: fn(&CountyRecord) -> Option<f64>| GroupComparison {
            without_clinics: group_mean(&without, select),
            with_clinics: group_mean(&with, select),
        };

        Self {
            total_counties: data.len(),
            counties_without_clinics: without.len(),
            counties_with_clinics: with.len(),
            total_clinics: data.finite_values(|r| r.clinic_count).iter().sum(),
            svi_overall: compare(|r| r.svi_overall),
            svi_socioeconomic: compare(|r| r.svi_socioeconomic),
            health_burden: compare(|r| r.health_burden_score),
        }
    }

    pub fn share_without_clinics(&self) -> f64 {
        percent_of(self.counties_without_clinics, self.total_counties)
    }

    pub fn share_with_clinics(&self) -> f64 {
        percent_of(self.counties_with_clinics, self.total_counties)
    }
}

fn percent_of(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn group_mean(
    rows: &[&CountyRecord],
    select: impl Fn(&CountyRecord) -> Option<f64>,
) -> Option<f64> {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|r| select(r))
        .filter(|v| v.is_finite())
        .collect();
    stats::mean(&values)
}

/// `1234567` -> `"1,234,567"`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Fixed-precision formatting with `"n/a"` for missing values.
pub fn format_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use indoc::indoc;

    #[test]
    fn figures_split_rows_by_clinic_presence() {
        let data = Dataset::from_reader(
            indoc! {"
                county_full,state_full,clinic_count,svi_overall,svi_socioeconomic,health_burden_score
                A,X,0,0.75,0.9,20
                B,X,0,0.25,0.7,18
                C,X,3,0.2,0.3,10
                D,X,,0.4,0.5,14
            "}
            .as_bytes(),
        )
        .unwrap();
        let figures = SummaryFigures::compute(&data);

        assert_eq!(figures.total_counties, 4);
        assert_eq!(figures.counties_without_clinics, 2);
        assert_eq!(figures.counties_with_clinics, 1);
        assert_eq!(figures.total_clinics, 3.0);
        assert_eq!(figures.share_without_clinics(), 50.0);
        assert_eq!(figures.share_with_clinics(), 25.0);
        assert_eq!(figures.svi_overall.without_clinics, Some(0.5));
        assert_eq!(figures.svi_overall.with_clinics, Some(0.2));
        assert_eq!(figures.health_burden.without_clinics, Some(19.0));
    }

    #[test]
    fn empty_groups_compare_as_none() {
        let data = Dataset::from_reader(
            indoc! {"
                county_full,state_full,clinic_count,svi_overall,svi_socioeconomic
                A,X,2,0.5,0.5
            "}
            .as_bytes(),
        )
        .unwrap();
        let figures = SummaryFigures::compute(&data);
        assert_eq!(figures.counties_without_clinics, 0);
        assert_eq!(figures.svi_overall.without_clinics, None);
        assert_eq!(figures.svi_overall.with_clinics, Some(0.5));
    }

    #[test]
    fn count_formatting_inserts_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn optional_formatting_falls_back_to_na() {
        assert_eq!(format_opt(Some(0.123456), 3), "0.123");
        assert_eq!(format_opt(None, 2), "n/a");
    }
}

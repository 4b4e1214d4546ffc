//! Aggregation engine for derived exposure statistics
//!
//! Consumes a snapshot of observation rows (already joined to object name,
//! filter type name and session start date) and materializes the two derived
//! views: the per-object/per-filter-type exposure matrix and the monthly
//! exposure series. Performs no I/O and never mutates its input.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::db::models::ObservationFact;

/// One row of the per-object exposure matrix. `by_filter_type` is parallel
/// to [`ExposureMatrix::filter_types`]; pairs with no observations hold 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRow {
    pub object_name: String,
    pub by_filter_type: Vec<f64>,
    /// Sum of the row's filter type columns, in seconds. Rendered with a
    /// value-proportional color scale downstream; raw number here.
    pub total: f64,
}

/// Per-object/per-filter-type cumulative exposure table.
///
/// Columns are exactly the filter type names that appear on at least one
/// observation, sorted by name so the layout is stable and enumerable. Rows
/// are one per object with at least one observation, sorted by object name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExposureMatrix {
    pub filter_types: Vec<String>,
    pub rows: Vec<ExposureRow>,
}

impl ExposureMatrix {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of every cell, in seconds. Equals the sum of total exposure over
    /// all input observations.
    pub fn grand_total(&self) -> f64 {
        self.rows.iter().map(|r| r.total).sum()
    }

    /// Exposure for one (object, filter type) pair, if both appear in the
    /// table.
    pub fn exposure_for(&self, object_name: &str, filter_type: &str) -> Option<f64> {
        let col = self.filter_types.iter().position(|f| f == filter_type)?;
        let row = self.rows.iter().find(|r| r.object_name == object_name)?;
        Some(row.by_filter_type[col])
    }
}

/// Build the per-object/per-filter-type exposure matrix from an observation
/// snapshot. An empty snapshot yields an empty table.
pub fn object_filter_matrix(facts: &[ObservationFact]) -> ExposureMatrix {
    let filter_types: BTreeSet<&str> = facts.iter().map(|f| f.filter_type.as_str()).collect();

    // {object_name: {filter_type: summed exposure}}
    let mut sums: BTreeMap<&str, HashMap<&str, f64>> = BTreeMap::new();
    for fact in facts {
        *sums
            .entry(fact.object_name.as_str())
            .or_default()
            .entry(fact.filter_type.as_str())
            .or_insert(0.0) += fact.total_exposure;
    }

    let rows = sums
        .into_iter()
        .map(|(object_name, by_type)| {
            let by_filter_type: Vec<f64> = filter_types
                .iter()
                .map(|ft| by_type.get(*ft).copied().unwrap_or(0.0))
                .collect();
            let total = by_filter_type.iter().sum();
            ExposureRow {
                object_name: object_name.to_string(),
                by_filter_type,
                total,
            }
        })
        .collect();

    ExposureMatrix {
        filter_types: filter_types.into_iter().map(str::to_string).collect(),
        rows,
    }
}

/// Cumulative exposure for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    /// Seconds. Conversion to hours is a presentation concern.
    pub total_exposure: f64,
}

impl MonthlyTotal {
    /// "YYYY-MM" label used by the monthly chart and exports.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Bucket the observation snapshot by the calendar month of the session
/// start date, ascending by (year, month). Months with no observations are
/// omitted, including gaps between populated months; the start date already
/// encodes the evening-start convention, so no rollover logic is applied
/// here.
pub fn monthly_totals(facts: &[ObservationFact]) -> Vec<MonthlyTotal> {
    use chrono::Datelike;

    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for fact in facts {
        let key = (fact.start_date.year(), fact.start_date.month());
        *buckets.entry(key).or_insert(0.0) += fact.total_exposure;
    }

    buckets
        .into_iter()
        .map(|((year, month), total_exposure)| MonthlyTotal {
            year,
            month,
            total_exposure,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fact(object: &str, filter_type: &str, date: (i32, u32, u32), exposure: f64) -> ObservationFact {
        ObservationFact {
            object_name: object.to_string(),
            filter_type: filter_type.to_string(),
            start_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            total_exposure: exposure,
        }
    }

    #[test]
    fn matrix_of_empty_snapshot_is_empty() {
        let matrix = object_filter_matrix(&[]);
        assert!(matrix.is_empty());
        assert!(matrix.filter_types.is_empty());
        assert_eq!(matrix.grand_total(), 0.0);
    }

    #[test]
    fn matrix_groups_by_object_and_filter_type() {
        // 10x300s L + 5x600s Ha on M31, 4x120s L on M42
        let facts = vec![
            fact("M31", "Luminance", (2025, 1, 10), 3000.0),
            fact("M31", "Ha", (2025, 1, 11), 3000.0),
            fact("M42", "Luminance", (2025, 2, 1), 480.0),
        ];
        let matrix = object_filter_matrix(&facts);

        assert_eq!(matrix.filter_types, vec!["Ha", "Luminance"]);
        assert_eq!(matrix.rows.len(), 2);

        assert_eq!(matrix.exposure_for("M31", "Luminance"), Some(3000.0));
        assert_eq!(matrix.exposure_for("M31", "Ha"), Some(3000.0));
        assert_eq!(matrix.rows[0].object_name, "M31");
        assert_eq!(matrix.rows[0].total, 6000.0);

        // Ha appears globally, so M42 gets an explicit zero cell
        assert_eq!(matrix.exposure_for("M42", "Ha"), Some(0.0));
        assert_eq!(matrix.exposure_for("M42", "Luminance"), Some(480.0));
        assert_eq!(matrix.rows[1].total, 480.0);
    }

    #[test]
    fn matrix_cells_sum_to_input_total() {
        let facts = vec![
            fact("M31", "Luminance", (2025, 1, 10), 1234.5),
            fact("M31", "Luminance", (2025, 1, 12), 765.5),
            fact("NGC 7000", "Ha", (2025, 3, 2), 900.0),
            fact("M42", "Oiii", (2025, 3, 4), 120.25),
        ];
        let input_total: f64 = facts.iter().map(|f| f.total_exposure).sum();
        let matrix = object_filter_matrix(&facts);

        let cell_total: f64 = matrix
            .rows
            .iter()
            .flat_map(|r| r.by_filter_type.iter())
            .sum();
        assert!((cell_total - input_total).abs() < 1e-9);
        assert!((matrix.grand_total() - input_total).abs() < 1e-9);
    }

    #[test]
    fn row_total_equals_sum_of_row_cells() {
        let facts = vec![
            fact("M31", "Luminance", (2025, 1, 10), 3000.0),
            fact("M31", "Ha", (2025, 1, 11), 1500.0),
            fact("M31", "Oiii", (2025, 1, 12), 250.5),
        ];
        let matrix = object_filter_matrix(&facts);
        let row = &matrix.rows[0];
        let sum: f64 = row.by_filter_type.iter().sum();
        assert!((row.total - sum).abs() < 1e-9);
    }

    #[test]
    fn monthly_totals_bucket_by_calendar_month() {
        let facts = vec![
            fact("M31", "Luminance", (2025, 1, 5), 1000.0),
            fact("M42", "Ha", (2025, 1, 28), 2000.0),
            fact("M31", "Luminance", (2025, 2, 3), 500.0),
        ];
        let months = monthly_totals(&facts);

        assert_eq!(months.len(), 2);
        assert_eq!((months[0].year, months[0].month), (2025, 1));
        assert_eq!(months[0].total_exposure, 3000.0);
        assert_eq!((months[1].year, months[1].month), (2025, 2));
        assert_eq!(months[1].total_exposure, 500.0);
    }

    #[test]
    fn monthly_totals_are_chronological_and_skip_empty_months() {
        let facts = vec![
            fact("M42", "Ha", (2025, 3, 15), 700.0),
            fact("M31", "Luminance", (2024, 11, 2), 300.0),
            fact("M31", "Luminance", (2025, 3, 1), 100.0),
        ];
        let months = monthly_totals(&facts);

        let keys: Vec<(i32, u32)> = months.iter().map(|m| (m.year, m.month)).collect();
        // December through February have no data and are omitted
        assert_eq!(keys, vec![(2024, 11), (2025, 3)]);
        assert_eq!(months[1].total_exposure, 800.0);
    }

    #[test]
    fn monthly_totals_sum_to_input_total() {
        let facts = vec![
            fact("M31", "Luminance", (2024, 12, 31), 10.0),
            fact("M31", "Luminance", (2025, 1, 1), 20.0),
            fact("M42", "Ha", (2025, 6, 15), 30.5),
        ];
        let input_total: f64 = facts.iter().map(|f| f.total_exposure).sum();
        let sum: f64 = monthly_totals(&facts).iter().map(|m| m.total_exposure).sum();
        assert!((sum - input_total).abs() < 1e-9);
    }

    #[test]
    fn monthly_label_is_zero_padded() {
        let m = MonthlyTotal {
            year: 2025,
            month: 3,
            total_exposure: 0.0,
        };
        assert_eq!(m.label(), "2025-03");
    }

    #[test]
    fn monthly_totals_of_empty_snapshot_are_empty() {
        assert!(monthly_totals(&[]).is_empty());
    }
}

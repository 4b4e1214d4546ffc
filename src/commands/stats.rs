//! Aggregation commands
//!
//! Thin wrappers that fetch the flat observation facts from the repository
//! and hand them to the aggregation engine in [`crate::stats`].

use crate::db::repository;
use crate::error::Result;
use crate::state::AppState;
use crate::stats::{monthly_totals, object_filter_matrix, ExposureMatrix, MonthlyTotal};

/// Total exposure per object and filter type, over all observations.
pub fn object_filter_stats(state: &AppState) -> Result<ExposureMatrix> {
    let mut conn = state.db.get()?;
    let facts = repository::get_observation_facts(&mut conn)?;
    Ok(object_filter_matrix(&facts))
}

/// Total exposure per calendar month of the session start date, over all
/// observations. Months without data are omitted.
pub fn monthly_stats(state: &AppState) -> Result<Vec<MonthlyTotal>> {
    let mut conn = state.db.get()?;
    let facts = repository::get_observation_facts(&mut conn)?;
    Ok(monthly_totals(&facts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::commands::catalog::{create_filter, create_filter_type, FilterInput, FilterTypeInput};
    use crate::commands::observations::tests::{observation_input, seed_references_on};
    use crate::commands::observations::create_observation;
    use crate::commands::testing::test_state;

    #[test]
    fn stats_aggregate_across_sessions_and_filter_types() {
        let (_dir, state) = test_state();
        let january = seed_references_on(
            &state,
            "January night",
            "M31",
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        );
        let broadband = create_filter_type(
            &state,
            FilterTypeInput {
                name: "Broadband".to_string(),
                priority: 1,
            },
        )
        .unwrap();
        let luminance = create_filter(
            &state,
            FilterInput {
                name: "Luminance".to_string(),
                filter_type_id: broadband.id,
            },
        )
        .unwrap();

        // 10 x 300s in Ha plus 8 x 60s in Luminance, same object
        create_observation(&state, observation_input(&january, 10, 300.0)).unwrap();
        let mut lum = observation_input(&january, 8, 60.0);
        lum.filter_id = luminance.id;
        create_observation(&state, lum).unwrap();

        let matrix = object_filter_stats(&state).unwrap();
        assert_eq!(matrix.filter_types, vec!["Broadband", "Narrowband"]);
        assert_eq!(matrix.exposure_for("M31", "Narrowband"), Some(3000.0));
        assert_eq!(matrix.exposure_for("M31", "Broadband"), Some(480.0));
        assert_eq!(matrix.grand_total(), 3480.0);
    }

    #[test]
    fn monthly_stats_group_by_session_start_month() {
        let (_dir, state) = test_state();
        let january = seed_references_on(
            &state,
            "January night",
            "M31",
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        );
        create_observation(&state, observation_input(&january, 10, 300.0)).unwrap();

        // A second session two months later, reusing the same gear
        let march = crate::commands::sessions::create_session(
            &state,
            crate::commands::sessions::SessionInput {
                name: "March night".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                comments: None,
            },
        )
        .unwrap();
        let mut input = observation_input(&january, 4, 120.0);
        input.session_id = march.id;
        create_observation(&state, input).unwrap();

        let totals = monthly_stats(&state).unwrap();
        let labels: Vec<String> = totals.iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["2024-01", "2024-03"]);
        assert_eq!(totals[0].total_exposure, 3000.0);
        assert_eq!(totals[1].total_exposure, 480.0);
    }

    #[test]
    fn empty_catalogue_yields_empty_stats() {
        let (_dir, state) = test_state();
        assert!(object_filter_stats(&state).unwrap().is_empty());
        assert!(monthly_stats(&state).unwrap().is_empty());
    }
}

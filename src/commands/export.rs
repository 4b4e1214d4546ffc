//! Export commands
//!
//! Build the export table from the observation list exactly as displayed
//! and hand it to the renderers in [`crate::export`].

use std::path::Path;

use crate::commands::observations::list_observation_details;
use crate::db::models::ObservationDetail;
use crate::error::Result;
use crate::export::{write_csv, write_html, ExportTable};
use crate::state::AppState;

const EXPORT_TITLE: &str = "Observation log";

const EXPORT_COLUMNS: [&str; 9] = [
    "Session",
    "Object",
    "Camera",
    "Telescope",
    "Filter",
    "Images",
    "Exposure (s)",
    "Total Exposure (s)",
    "Comments",
];

fn format_seconds(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// The observation list as an export table, columns matching the on-screen
/// view.
pub fn observation_export_table(details: &[ObservationDetail]) -> ExportTable {
    let mut table = ExportTable::new(
        EXPORT_TITLE,
        EXPORT_COLUMNS.iter().map(|c| c.to_string()).collect(),
    );
    for detail in details {
        table.push_row(vec![
            detail.session_name.clone(),
            detail.object_name.clone(),
            detail.camera_name.clone(),
            detail.telescope_name.clone(),
            detail.filter_name.clone(),
            detail.image_count.to_string(),
            format_seconds(detail.exposure_length),
            format_seconds(detail.total_exposure),
            detail.comments.clone().unwrap_or_default(),
        ]);
    }
    table
}

/// Export all observations as a CSV spreadsheet.
pub fn export_observations_csv(state: &AppState, path: &Path) -> Result<()> {
    let details = list_observation_details(state)?;
    write_csv(&observation_export_table(&details), path)
}

/// Export all observations as an HTML document.
pub fn export_observations_html(state: &AppState, path: &Path) -> Result<()> {
    let details = list_observation_details(state)?;
    write_html(&observation_export_table(&details), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::observations::create_observation;
    use crate::commands::observations::tests::{observation_input, seed_references};
    use crate::commands::testing::test_state;

    #[test]
    fn export_table_mirrors_the_observation_list() {
        let (_dir, state) = test_state();
        let fixture = seed_references(&state);
        let mut input = observation_input(&fixture, 10, 300.0);
        input.comments = Some("good seeing".to_string());
        create_observation(&state, input).unwrap();

        let details = list_observation_details(&state).unwrap();
        let table = observation_export_table(&details);
        assert_eq!(table.columns.len(), 9);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(
            table.rows[0],
            vec![
                "Session 1",
                "M31",
                "ASI2600MM",
                "Newt 200",
                "Ha 7nm",
                "10",
                "300",
                "3000",
                "good seeing",
            ]
        );
    }

    #[test]
    fn csv_export_writes_the_file() {
        let (dir, state) = test_state();
        let fixture = seed_references(&state);
        create_observation(&state, observation_input(&fixture, 10, 300.0)).unwrap();

        let path = dir.path().join("observations.csv");
        export_observations_csv(&state, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Session,Object,Camera,Telescope,Filter"));
        assert!(content.contains("M31"));
    }

    #[test]
    fn html_export_writes_the_file() {
        let (dir, state) = test_state();
        let fixture = seed_references(&state);
        create_observation(&state, observation_input(&fixture, 10, 300.0)).unwrap();

        let path = dir.path().join("observations.html");
        export_observations_html(&state, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<title>Observation log</title>"));
        assert!(content.contains("<td>M31</td>"));
    }

    #[test]
    fn fractional_seconds_keep_their_fraction() {
        assert_eq!(format_seconds(300.0), "300");
        assert_eq!(format_seconds(2.5), "2.5");
    }
}

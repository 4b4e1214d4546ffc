//! Weekly database backups
//!
//! Compressed copies of the database file are written to an `ObsLogBackup`
//! folder next to the database, named by backup date, with no automatic
//! pruning. The check runs once at startup and backs up when the newest
//! copy is at least a week old.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const BACKUP_FOLDER_NAME: &str = "ObsLogBackup";
pub const BACKUP_INTERVAL_DAYS: i64 = 7;

const BACKUP_PREFIX: &str = "observations_backup_";
const BACKUP_SUFFIX: &str = ".db.gz";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub backup_date: NaiveDate,
}

/// The backup folder for a given database file.
pub fn backup_folder(db_path: &Path) -> PathBuf {
    let db_dir = db_path.parent().unwrap_or_else(|| Path::new("."));
    db_dir.join(BACKUP_FOLDER_NAME)
}

/// Backup filename for a given date.
pub fn backup_filename(date: NaiveDate) -> String {
    format!("{}{}{}", BACKUP_PREFIX, date.format("%Y-%m-%d"), BACKUP_SUFFIX)
}

/// Parse the backup date out of a backup filename, if it is one of ours.
pub fn parse_backup_date(filename: &str) -> Option<NaiveDate> {
    let date_str = filename
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(BACKUP_SUFFIX)?;
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}

/// The newest backup on disk, if any.
pub fn latest_backup(db_path: &Path) -> Result<Option<(PathBuf, NaiveDate)>> {
    let folder = backup_folder(db_path);
    if !folder.exists() {
        return Ok(None);
    }

    let mut newest: Option<(PathBuf, NaiveDate)> = None;
    for entry in fs::read_dir(&folder)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(date) = name.to_str().and_then(parse_backup_date) else {
            continue;
        };
        if newest.as_ref().map_or(true, |(_, d)| date > *d) {
            newest = Some((entry.path(), date));
        }
    }
    Ok(newest)
}

/// Whether a backup is due on `today`: none exists, or the newest one is at
/// least [`BACKUP_INTERVAL_DAYS`] old.
pub fn is_backup_needed_on(db_path: &Path, today: NaiveDate) -> Result<bool> {
    match latest_backup(db_path)? {
        None => Ok(true),
        Some((_, date)) => Ok((today - date).num_days() >= BACKUP_INTERVAL_DAYS),
    }
}

pub fn is_backup_needed(db_path: &Path) -> Result<bool> {
    is_backup_needed_on(db_path, Local::now().date_naive())
}

/// Write a gzip-compressed copy of the database into the backup folder,
/// named for today.
pub fn create_backup(db_path: &Path) -> Result<BackupInfo> {
    if !db_path.exists() {
        return Err(Error::Validation(format!(
            "database file not found: {}",
            db_path.display()
        )));
    }

    let folder = backup_folder(db_path);
    fs::create_dir_all(&folder)?;

    let backup_date = Local::now().date_naive();
    let filename = backup_filename(backup_date);
    let backup_path = folder.join(&filename);

    let mut source = File::open(db_path)?;
    let target = File::create(&backup_path)?;
    let mut encoder = GzEncoder::new(target, Compression::default());
    io::copy(&mut source, &mut encoder)?;
    encoder.finish()?;

    let size_bytes = fs::metadata(&backup_path)?.len();
    log::info!("created backup {}", backup_path.display());

    Ok(BackupInfo {
        filename,
        path: backup_path,
        size_bytes,
        backup_date,
    })
}

/// Startup entry point: back up the database if the weekly check says one
/// is due. Returns the new backup's info, or `None` when nothing was done.
pub fn check_and_create_backup(db_path: &Path) -> Result<Option<BackupInfo>> {
    if !is_backup_needed(db_path)? {
        log::debug!("backup not needed for {}", db_path.display());
        return Ok(None);
    }
    create_backup(db_path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::io::Write;

    fn fake_db(dir: &Path) -> PathBuf {
        let db_path = dir.join("observations.db");
        let mut f = File::create(&db_path).unwrap();
        f.write_all(b"not really sqlite").unwrap();
        db_path
    }

    #[test]
    fn filename_round_trips_through_the_parser() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 28).unwrap();
        let name = backup_filename(date);
        assert_eq!(name, "observations_backup_2025-10-28.db.gz");
        assert_eq!(parse_backup_date(&name), Some(date));
    }

    #[test]
    fn foreign_filenames_are_ignored() {
        assert_eq!(parse_backup_date("observations.db"), None);
        assert_eq!(parse_backup_date("observations_backup_oops.db.gz"), None);
        assert_eq!(parse_backup_date("other_backup_2025-10-28.db.gz"), None);
    }

    #[test]
    fn backup_needed_when_none_exists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = fake_db(dir.path());
        assert!(is_backup_needed(&db_path).unwrap());
    }

    #[test]
    fn backup_not_needed_right_after_one_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = fake_db(dir.path());

        let info = create_backup(&db_path).unwrap();
        assert!(info.path.exists());
        assert!(info.size_bytes > 0);
        assert!(!is_backup_needed(&db_path).unwrap());
    }

    #[test]
    fn backup_needed_again_a_week_later() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = fake_db(dir.path());
        create_backup(&db_path).unwrap();

        let today = Local::now().date_naive();
        assert!(!is_backup_needed_on(&db_path, today + Duration::days(6)).unwrap());
        assert!(is_backup_needed_on(&db_path, today + Duration::days(7)).unwrap());
    }

    #[test]
    fn latest_backup_picks_the_newest_date() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = fake_db(dir.path());
        let folder = backup_folder(&db_path);
        fs::create_dir_all(&folder).unwrap();
        for name in [
            "observations_backup_2025-01-01.db.gz",
            "observations_backup_2025-03-15.db.gz",
            "observations_backup_2025-02-01.db.gz",
            "unrelated.txt",
        ] {
            File::create(folder.join(name)).unwrap();
        }

        let (_, date) = latest_backup(&db_path).unwrap().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
    }

    #[test]
    fn missing_database_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nope.db");
        assert!(create_backup(&db_path).is_err());
    }

    #[test]
    fn check_and_create_skips_when_current() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = fake_db(dir.path());

        assert!(check_and_create_backup(&db_path).unwrap().is_some());
        assert!(check_and_create_backup(&db_path).unwrap().is_none());
    }
}

//! Console entry point for the observation log
//!
//! The interactive views live elsewhere; this binary covers the batch
//! operations: statistics, export, backup and moon recalculation.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use obslog::commands;
use obslog::db;
use obslog::settings::Settings;
use obslog::AppState;

/// Observation session catalogue for astrophotography
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file. Defaults to the path stored in the
    /// settings file.
    #[arg(short, long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print total exposure per object and filter type
    Stats,
    /// Print total exposure per calendar month
    Monthly,
    /// Export all observations to a CSV or HTML file (chosen by extension)
    Export {
        /// Output file; .html exports HTML, anything else CSV
        output: PathBuf,
    },
    /// Create a compressed backup if the newest one is a week old
    Backup,
    /// Recompute the stored moon context of every session
    RecalcMoon,
    /// Look up an object's coordinates by name
    Lookup { name: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings_path = Settings::default_path()?;
    let settings = Settings::load(&settings_path)?;

    if let Command::Lookup { name } = &args.command {
        // The only command that needs no database
        let coords = obslog::lookup::lookup_object_coordinates(name)?;
        println!(
            "{name}: RA {:.4} h, Dec {:+.4} deg",
            coords.ra_hours, coords.dec_degrees
        );
        return Ok(());
    }

    let db_path = match args.database.or_else(|| settings.database_path.clone()) {
        Some(path) => path,
        None => bail!("no database configured; pass --database or set one in the settings file"),
    };
    let pool = db::init_database(&db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;
    let state = AppState::new(pool, db_path, settings);

    match args.command {
        Command::Stats => {
            let matrix = commands::object_filter_stats(&state)?;
            if matrix.is_empty() {
                println!("no observations recorded");
                return Ok(());
            }
            print!("{:<24}", "Object");
            for filter_type in &matrix.filter_types {
                print!("{filter_type:>14}");
            }
            println!("{:>14}", "Total");
            for row in &matrix.rows {
                print!("{:<24}", row.object_name);
                for value in &row.by_filter_type {
                    print!("{value:>14.0}");
                }
                println!("{:>14.0}", row.total);
            }
            println!("Grand total: {:.0} s", matrix.grand_total());
        }
        Command::Monthly => {
            for total in commands::monthly_stats(&state)? {
                println!("{}  {:>12.0} s", total.label(), total.total_exposure);
            }
        }
        Command::Export { output } => {
            let is_html = output
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
            if is_html {
                commands::export_observations_html(&state, &output)?;
            } else {
                commands::export_observations_csv(&state, &output)?;
            }
        }
        Command::Backup => match commands::run_backup_check(&state)? {
            Some(backup) => info!("backup written to {}", backup.path.display()),
            None => info!("latest backup is recent enough, nothing to do"),
        },
        Command::RecalcMoon => {
            let summary = commands::recalculate_moon_for_all_sessions(&state)?;
            println!(
                "updated {}/{} session(s)",
                summary.updated_sessions, summary.total_sessions
            );
            for error in &summary.errors {
                eprintln!("failed: {error}");
            }
        }
        Command::Lookup { .. } => unreachable!("handled before the database opens"),
    }

    Ok(())
}

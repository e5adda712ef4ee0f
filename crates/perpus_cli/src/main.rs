//! CLI smoke entry point.
//!
//! Opens the configured store and prints per-entity record counts, which is
//! enough to verify configuration, migrations and facade wiring end to end.

use log::error;
use perpus_core::db::open_db;
use perpus_core::{core_version, init_logging_from_config, CoreConfig, Library};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CoreConfig::from_env();

    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("perpus: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(&config.db_path)?;
    let library = Library::try_new(&conn)?;
    let summary = library.summary()?;

    println!("perpus_core version={}", core_version());
    println!("store path={}", config.db_path.display());
    println!(
        "members={} books={} returns={}",
        summary.members, summary.books, summary.returns
    );
    Ok(())
}

//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `notekeep_core` linkage, configuration and store bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use notekeep_core::db::migrations::latest_version;
use notekeep_core::{bootstrap, CoreConfig, SqliteStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("notekeep_core ping={}", notekeep_core::ping());
    println!("notekeep_core version={}", notekeep_core::core_version());

    let config = match CoreConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("notekeep config error={err}");
            return ExitCode::FAILURE;
        }
    };

    let conn = match bootstrap(&config) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("notekeep bootstrap error={err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = SqliteStore::try_new(&conn) {
        eprintln!("notekeep store error={err}");
        return ExitCode::FAILURE;
    }

    log::info!("event=cli_probe module=cli status=ok");
    let database = config
        .database
        .path
        .as_deref()
        .map_or_else(|| ":memory:".to_string(), |path| path.display().to_string());
    println!("notekeep_core schema_version={}", latest_version());
    println!("notekeep_core database={database}");
    ExitCode::SUCCESS
}

//! Subcommand implementations

pub mod load_test;
pub mod persistence;
pub mod probes;
pub mod status;
pub mod steps;

use anyhow::Result;
use dashboard_lib::FetchError;

/// Turn a `success: false` envelope into an error
fn accepted(success: bool, error: Option<String>) -> Result<()> {
    if success {
        Ok(())
    } else {
        Err(FetchError::Rejected(error.unwrap_or_else(|| "Unknown error".to_string())).into())
    }
}

pub mod click;
pub mod config_cmd;
pub mod parcel;
pub mod replay;
pub mod search;

use crate::error::{CliError, CliResult};
use crate::output::{self, Summary};
use parcelview_router::NavigationOutcome;

/// Print one summary and turn a miss into a `NotFound` error.
fn finish(summary: &Summary, json: bool, what: &str) -> CliResult<()> {
    println!("{}", output::render(summary, json)?);
    if summary.outcome == output::outcome_label(&NavigationOutcome::Rejected) {
        return Err(CliError::Input(format!("navigation to {what} was rejected")));
    }
    if summary.is_miss() {
        return Err(CliError::NotFound(format!("no property found for {what}")));
    }
    Ok(())
}

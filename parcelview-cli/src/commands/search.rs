use crate::commands::finish;
use crate::config::FileConfig;
use crate::context;
use crate::error::{CliError, CliResult};
use crate::output::Summary;
use parcelview_core::RouteLocation;

pub async fn run(words: &[String], config: &FileConfig, json: bool) -> CliResult<()> {
    let address = words.join(" ");
    if address.trim().is_empty() {
        return Err(CliError::Usage("search needs a non-empty address".into()));
    }

    let mut navigator = context::build_navigator(config)?;
    let outcome = navigator
        .navigate(RouteLocation::search_address(address.trim()))
        .await?;
    let summary = Summary::capture(&navigator, &outcome);
    finish(&summary, json, &format!("'{}'", address.trim()))
}

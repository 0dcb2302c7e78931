use crate::commands::finish;
use crate::config::FileConfig;
use crate::context;
use crate::error::{CliError, CliResult};
use crate::output::Summary;
use parcelview_core::RouteLocation;

pub async fn run(
    parcel_id: &str,
    address: Option<&str>,
    topic: Option<&str>,
    config: &FileConfig,
    json: bool,
) -> CliResult<()> {
    let parcel_id = parcel_id.trim();
    if parcel_id.is_empty() {
        return Err(CliError::Usage("parcel needs a non-empty identifier".into()));
    }

    let address = address.map(str::trim).filter(|a| !a.is_empty()).unwrap_or(parcel_id);
    let topic = topic.unwrap_or(config.navigator.default_topic.as_str());
    let route = RouteLocation::address(address, topic).with_parcel_id(parcel_id);

    let mut navigator = context::build_navigator(config)?;
    let outcome = navigator.navigate(route).await?;
    let summary = Summary::capture(&navigator, &outcome);
    finish(&summary, json, &format!("parcel {parcel_id}"))
}

use crate::commands::finish;
use crate::config::FileConfig;
use crate::context;
use crate::error::{CliError, CliResult};
use crate::output::Summary;
use parcelview_core::RouteLocation;

pub async fn run(lng: f64, lat: f64, config: &FileConfig, json: bool) -> CliResult<()> {
    if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
        return Err(CliError::Usage(format!(
            "coordinates out of range: lng {lng}, lat {lat}"
        )));
    }

    let mut navigator = context::build_navigator(config)?;
    let outcome = navigator
        .navigate(RouteLocation::search_point(lng, lat))
        .await?;
    let summary = Summary::capture(&navigator, &outcome);
    finish(&summary, json, &format!("point ({lng}, {lat})"))
}

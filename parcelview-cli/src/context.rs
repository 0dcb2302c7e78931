use crate::config::FileConfig;
use crate::error::CliResult;
use parcelview_router::{Navigator, Orchestrator};
use std::sync::Arc;

/// Build a navigator backed by the HTTP resolvers.
pub fn build_navigator(config: &FileConfig) -> CliResult<Navigator> {
    let orchestrator = Orchestrator::http(&config.endpoints, config.navigator.clone())?;
    Ok(Navigator::new(Arc::new(orchestrator)))
}

use crate::error::{CliError, CliResult};
use parcelview_resolve::EndpointConfig;
use parcelview_router::NavigatorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "parcelview.toml";

/// Contents of `parcelview.toml`; every table and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub endpoints: EndpointConfig,
    pub navigator: NavigatorConfig,
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub geocoder_url: Option<String>,
    pub parcels_url: Option<String>,
}

impl FileConfig {
    pub fn parse(text: &str, origin: &Path) -> CliResult<Self> {
        toml::from_str(text)
            .map_err(|e| CliError::Config(format!("invalid config {}: {e}", origin.display())))
    }

    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("failed to render config: {e}")))
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.geocoder_url {
            self.endpoints.geocoder_url = url.clone();
        }
        if let Some(url) = &overrides.parcels_url {
            self.endpoints.parcels_url = url.clone();
        }
    }
}

/// Pick the config file: `--config` if given (must exist), otherwise
/// `parcelview.toml` in `cwd` when present.
fn config_path(explicit: Option<&Path>, cwd: &Path) -> CliResult<Option<PathBuf>> {
    if let Some(p) = explicit {
        let resolved = if p.is_absolute() {
            p.to_path_buf()
        } else {
            cwd.join(p)
        };
        if !resolved.is_file() {
            return Err(CliError::Config(format!(
                "config file not found: {}",
                resolved.display()
            )));
        }
        return Ok(Some(resolved));
    }
    let candidate = cwd.join(CONFIG_FILE);
    Ok(candidate.is_file().then_some(candidate))
}

fn load_from(explicit: Option<&Path>, cwd: &Path, overrides: &Overrides) -> CliResult<FileConfig> {
    let mut config = match config_path(explicit, cwd)? {
        Some(path) => {
            let text = fs::read_to_string(&path)?;
            FileConfig::parse(&text, &path)?
        }
        None => FileConfig::default(),
    };
    config.apply(overrides);
    config.endpoints.validate()?;
    Ok(config)
}

/// Load, override and validate the effective configuration.
pub fn load(explicit: Option<&Path>, overrides: &Overrides) -> CliResult<FileConfig> {
    let cwd = std::env::current_dir()?;
    load_from(explicit, &cwd, overrides)
}

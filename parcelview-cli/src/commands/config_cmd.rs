use crate::config::FileConfig;
use crate::error::CliResult;

pub fn run(config: &FileConfig) -> CliResult<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

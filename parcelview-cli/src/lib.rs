//! parcelview CLI library.
//!
//! Holds the argument types, command handlers and output formatting behind
//! the `parcelview` binary, so tests and other front ends can drive the same
//! navigation flows.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod output;

use cli::{Cli, Commands};

/// Dispatch a parsed [`Cli`] to the appropriate command handler.
pub async fn run(cli: Cli) -> error::CliResult<()> {
    let overrides = config::Overrides {
        geocoder_url: cli.geocoder_url.clone(),
        parcels_url: cli.parcels_url.clone(),
    };
    let config = config::load(cli.config.as_deref(), &overrides)?;
    let json = cli.json;

    match cli.command {
        Commands::Search { address } => commands::search::run(&address, &config, json).await,

        Commands::Click { lng, lat } => commands::click::run(lng, lat, &config, json).await,

        Commands::Parcel {
            parcel_id,
            address,
            topic,
        } => {
            commands::parcel::run(
                &parcel_id,
                address.as_deref(),
                topic.as_deref(),
                &config,
                json,
            )
            .await
        }

        Commands::Replay { file } => commands::replay::run(&file, &config, json).await,

        Commands::Config => commands::config_cmd::run(&config),
    }
}

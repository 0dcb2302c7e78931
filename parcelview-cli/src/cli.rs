use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "parcelview",
    about = "Look up property parcels by address, map point or parcel number",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to config file (defaults to ./parcelview.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Geocoder base URL
    #[arg(long, global = true, env = "PARCELVIEW_GEOCODER_URL")]
    pub geocoder_url: Option<String>,

    /// Feature-service base URL
    #[arg(long, global = true, env = "PARCELVIEW_PARCELS_URL")]
    pub parcels_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search by street address or account number
    Search {
        /// Address words; joined with spaces
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
    },

    /// Find the parcel containing a map point
    #[command(allow_negative_numbers = true)]
    Click {
        /// Longitude (WGS84)
        lng: f64,

        /// Latitude (WGS84)
        lat: f64,
    },

    /// Open an address route by parcel identifier
    Parcel {
        /// Parcel or account number
        parcel_id: String,

        /// Address segment of the route (defaults to the identifier)
        #[arg(long)]
        address: Option<String>,

        /// Topic segment of the route
        #[arg(long)]
        topic: Option<String>,
    },

    /// Navigate a sequence of route paths read from a file
    Replay {
        /// One path per line; `back` and `forward` step through history
        file: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config,
}

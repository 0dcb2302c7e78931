use colored::Colorize;
use std::fmt;
use std::process;

/// Exit codes for the CLI.
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Configuration file or override problems.
    Config(String),
    /// Unreadable or malformed input.
    Input(String),
    /// Nothing matched the search.
    NotFound(String),
    /// Argument / usage errors.
    Usage(String),
    /// Resolver construction error.
    Resolve(parcelview_resolve::ResolveError),
    /// Orchestration error.
    Route(parcelview_router::RouteError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Input(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::NotFound(msg) => write!(
                f,
                "{} {msg}\n  {} check the spelling, or try an account number",
                "error:".red().bold(),
                "help:".cyan().bold(),
            ),
            CliError::Usage(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Resolve(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Route(e) => write!(f, "{} {e}", "error:".red().bold()),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<parcelview_resolve::ResolveError> for CliError {
    fn from(e: parcelview_resolve::ResolveError) -> Self {
        CliError::Resolve(e)
    }
}

impl From<parcelview_router::RouteError> for CliError {
    fn from(e: parcelview_router::RouteError) -> Self {
        CliError::Route(e)
    }
}

impl From<parcelview_core::CoreError> for CliError {
    fn from(e: parcelview_core::CoreError) -> Self {
        CliError::Input(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Input(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Input(format!("JSON encode error: {e}"))
    }
}

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    let code = match &err {
        CliError::Usage(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    };
    process::exit(code)
}

pub type CliResult<T> = std::result::Result<T, CliError>;

use clap::Parser;
use parcelview_cli::cli::Cli;
use parcelview_cli::error::exit_with_error;

fn init_tracing(cli: &Cli) {
    // --quiet → off; --verbose → RUST_LOG or "info"; default → off so logs
    // never interleave with the printed summary.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = parcelview_cli::run(cli).await {
        exit_with_error(e);
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use timeparse::{cli::Cli, report};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let timing = timeparse::parse_report(&args.log)
        .with_context(|| format!("Failed to parse timings from {}", args.log.display()))?;

    let options = report::RenderOptions {
        phases: args.phases,
        top: args.top,
        include_trailing: args.include_trailing,
    };

    let output =
        report::render(&timing, args.format, &options).context("Failed to render report")?;
    print!("{}", output);

    Ok(())
}

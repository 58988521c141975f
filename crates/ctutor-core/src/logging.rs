//! Subscriber setup shared by the binaries.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Unknown names fall back to `default`.
pub fn parse_level(name: &str, default: Level) -> Level {
    match name.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => default,
    }
}

/// Install a plain stderr subscriber: no timestamps, no targets.
///
/// Stdout stays reserved for the tool's own output.
pub fn init(level: Level) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

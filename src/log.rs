// Logging initialization for the CLI binary.
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

pub fn init_logging(verbose: bool) {
    // RUST_LOG wins; --verbose otherwise enables this crate's debug
    // output without dragging in dependency noise.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("kurs=debug")
        } else {
            EnvFilter::new("off")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().compact().without_time())
        .with(filter)
        .init();
}

use color_eyre::Result;
use tracing_subscriber::{layer::Layered, EnvFilter, Registry};
use tracing_subscriber::{prelude::*, util::SubscriberInitExt};

pub type CompactRegistry = Layered<
    EnvFilter,
    Layered<
        tracing_subscriber::fmt::Layer<
            Registry,
            tracing_subscriber::fmt::format::DefaultFields,
            tracing_subscriber::fmt::format::Format<tracing_subscriber::fmt::format::Compact>,
        >,
        Registry,
    >,
>;

fn registry(filter: EnvFilter) -> CompactRegistry {
    Registry::default()
        .with(tracing_subscriber::fmt::layer().compact())
        .with(filter)
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` when debugging.
fn filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { "debug" } else { "info" })
    })
}

pub fn init(debug: bool) -> Result<()> {
    registry(filter(debug)).try_init()?;

    Ok(())
}

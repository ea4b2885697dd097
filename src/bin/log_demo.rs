use anyhow::{Context, Result};
use dangan::demo::{demo_subscriber, emit_samples};
use std::path::Path;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    demo_subscriber(Path::new("."))?
        .try_init()
        .context("Failed to install tracing subscriber")?;

    emit_samples();

    Ok(())
}

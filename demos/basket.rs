//! Basket Example
//!
//! Prices a fixture basket and prints its receipt.
//!
//! Use `-f` to load a fixture set by name (`beans`, `mixed` or `shampoo`)
//! Use `-l` or `RUST_LOG` to set the log filter, and `--log-format` to choose compact or JSON logs

use std::{io, time::Instant};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use pricer::{
    fixtures::Fixture,
    utils::{ExampleBasketArgs, LogFormat},
};

fn init_logging(args: &ExampleBasketArgs) {
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_err| EnvFilter::new("warn"));

    match args.log_format {
        LogFormat::Compact => fmt()
            .compact()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .init(),
    }
}

/// Basket Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ExampleBasketArgs::parse();

    init_logging(&args);

    let fixture = Fixture::from_set(&args.fixture)?;
    let engine = fixture.engine()?;

    let start = Instant::now();
    let receipt = engine.compute(fixture.basket())?;
    let elapsed = start.elapsed().as_secs_f32();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    receipt.write_to(&mut handle, fixture.catalogue()?, fixture.offers())?;

    println!("\nPriced in {elapsed}s");

    Ok(())
}

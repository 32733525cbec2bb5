// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tracing setup for harness runs
//!
//! Honors `RUST_LOG`; INFO is always enabled. Safe to call from every test:
//! only the first call installs a subscriber.

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber if none is installed yet
pub fn init_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::info!("tracing initialized twice without panicking");
    }
}

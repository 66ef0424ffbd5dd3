//! Tracing subscriber setup for hosts and tests.
//!
//! The evaluator only emits `tracing` events: `debug` for program start, end
//! and every user function call, `trace` for every node. Nothing is printed
//! unless the host installs a subscriber.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, or when another global subscriber
/// is already installed. Safe to call more than once.
///
/// ```bash
/// RUST_LOG=mgn_eval=debug magnolia script.mg
/// RUST_LOG=mgn_eval::interpreter=trace magnolia script.mg
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

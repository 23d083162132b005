//! Opt-in tracing setup for binaries and tests that use `axis-ticks`.
//!
//! The library only emits `tracing` events (time step selection, log tick
//! thinning, axis render summaries). Installing a subscriber is left to the
//! host unless it calls one of the helpers below.

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_default_filter("info")
}

/// Like [`init_default_tracing`] but with a caller-chosen fallback directive,
/// e.g. `"axis_ticks=trace"`.
#[must_use]
pub fn init_tracing_with_default_filter(directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directive;
        false
    }
}

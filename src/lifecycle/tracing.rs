//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber: compact output, no module
//! path prefix, level taken from `RUST_LOG` and `info` when it is unset.
//!
//! ```bash
//! # Lookup flow: correlation ids, stale and malformed replies
//! RUST_LOG=order_enrichment::bridge=debug cargo run
//!
//! # Full payloads for every actor request
//! RUST_LOG=debug cargo run
//! ```
//!
//! Every bridge call runs inside a `request_details` span carrying its `correlation_id`,
//! so a timed-out lookup can be matched to the reply that arrived too late:
//!
//! ```text
//! WARN request_details{subject_id="7" correlation_id=4b0e...}: Lookup timed out elapsed_ms=10000
//! DEBUG Stale reply discarded correlation_id=4b0e...
//! ```
use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .compact()
        .init();
}

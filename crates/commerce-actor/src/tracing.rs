//! # Observability & Tracing
//!
//! Structured logging for every actor and client in the engine.
//!
//! Actors log with an `entity_type` field instead of a module path, so the
//! subscriber hides targets. Levels come from `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run     # lifecycle and committed mutations
//! RUST_LOG=debug cargo run    # request payloads at entry points
//! ```
//!
//! With `RUST_LOG=info` a checkout reads roughly like:
//!
//! ```text
//! INFO checkout: Submitting order reference=order_1 total=82980 items=3
//! INFO Action ok entity_type="Product" id=product_1 fresh=false
//! INFO Replaced entity_type="CartLine" previous=2 size=0
//! INFO checkout: Checkout succeeded reference=order_1 remote_id="ord-1" payable=82980
//! ```

/// Installs the global compact subscriber. Call once, from `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

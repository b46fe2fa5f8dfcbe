//! Tracing subscriber setup.
//!
//! The host application usually installs its own subscriber; this is the
//! standalone setup used by examples and tests. Safe to call more than
//! once.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Install an env-filtered stderr subscriber. Filter with `RUST_LOG`, e.g.
/// `RUST_LOG=pagemark=trace`.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pagemark=info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

//! HRR CLI - `hrr` binary support
//!
//! Drives the rename engine against a real project:
//! - [`manifest`]: JSON project manifest implementing the analyzer contract
//! - [`store`]: root-confined file store on `tokio::fs`
//! - [`cli`] and [`commands`]: argument definitions and subcommand handlers
//!
//! ```text
//! hrr --manifest project.json --root ./project apply proj/script/scr_move scr_walk --dry-run
//! ```

#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod manifest;
pub mod store;

pub use cli::build_cli;
pub use commands::{parse_rename_pair, run};
pub use manifest::{ManifestAnalyzer, ManifestError, ProjectManifest, ScopeBinding};
pub use store::DiskStore;

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // a second init (tests) leaves the first subscriber in place
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

//! Development server with watch-driven rebuilds.
//!
//! Serves the build output over HTTP while a background watcher re-runs
//! the build pipeline whenever a relevant source file changes.

pub mod server;
pub mod watcher;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{Debouncer, RebuildWatcher, DEBOUNCE_WINDOW, RELEVANT_EXTENSIONS};

//! Command dispatch
//!
//! `App` owns the resources shared by every generator (configuration, output
//! writer, HTTP client) and hands each subcommand to its generator.
//!
//! ```text
//! main (parse flags, load config, init logging)
//!     ↓
//! App::run (one subcommand)
//!     ↓
//! generators::* (load → render → write)
//!     ↓
//! services (OutputWriter, UrlChecker)
//! ```

pub mod runner;

pub use runner::{App, Outcome};

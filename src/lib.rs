//! # cv-gen
//!
//! Generates the fragments an academic CV is assembled from: LaTeX tables and
//! lists, an HTML page fragment, and Canadian Common CV (generic-cv) XML.
//!
//! ## Layout
//!
//! - `cli` - subcommands and flags
//! - `config` - defaults, TOML file and environment overrides
//! - `models` - CSV records, BibTeX entries, students and people
//! - `ccv` - generic-cv XML writer and list-of-values tables
//! - `generators` - one module per subcommand
//! - `services` - output files and URL checks
//! - `orchestrator` - `App`, which runs one subcommand
//! - `utils` - text escaping, dates, logging

pub mod ccv;
pub mod cli;
pub mod config;
pub mod error;
pub mod generators;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{CvError, Result};
pub use models::{BibEntry, CsvTable, Record};
pub use orchestrator::{App, Outcome};

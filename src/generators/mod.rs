//! Generators, one per subcommand
//!
//! Every generator follows the same shape:
//! - load its input files (`models::loaders`)
//! - render each output with pure `render_*` functions
//! - hand the text to `OutputWriter`
//!
//! `run` returns how many records went into the outputs and how many were left out.

pub mod cases;
pub mod collaborators;
pub mod funding;
pub mod publications;
pub mod students;
pub mod talks;
pub mod teaching;
pub mod tpcs;

/// Per-run record counts for the final summary
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub processed: usize,
    pub skipped: usize,
}

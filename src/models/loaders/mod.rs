pub mod bib_loader;
pub mod csv_loader;

pub use bib_loader::{load_bib, parse_bibtex};
pub use csv_loader::{load_csv, parse_csv, to_csv_string};

pub mod bib;
pub mod loaders;
pub mod person;
pub mod record;
pub mod student;

pub use bib::{BibEntry, BibName};
pub use loaders::{load_bib, load_csv};
pub use person::Person;
pub use record::{CsvTable, Record};
pub use student::Degree;

pub mod output_writer;
pub mod url_checker;

pub use output_writer::OutputWriter;
pub use url_checker::{LinkCheck, UrlChecker, UrlReport, UrlStatus};

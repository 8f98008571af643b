pub mod dates;
pub mod logging;
pub mod text;

pub use dates::{extract_month, extract_year, parse_date};
pub use text::{format_xml, latex2xml, latex_format, ordinal};

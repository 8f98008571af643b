//! Canadian Common CV (generic-cv) XML output
//!
//! `CcvWriter` produces the nested `section`/`field` documents the CCV web site
//! imports. Sections nest by call order; `finish` closes anything still open.

pub mod lov;

pub use lov::Lov;

use crate::utils::text::xml_escape;
use chrono::NaiveDateTime;

pub const CCV_NAMESPACE: &str = "http://www.cihr-irsc.gc.ca/generic-cv/1.0.0";

/// Well known section identifiers
pub mod sections {
    pub const ACTIVITIES: (&str, &str) = ("95c29504d0aa4b51b84659cafaf2b38d", "Activities");
    pub const ADMINISTRATIVE_ACTIVITIES: (&str, &str) =
        ("9fa2e1cd0274429f9fde16616bf3939f", "Administrative Activities");
    pub const SUPERVISORY_ACTIVITIES: (&str, &str) =
        ("90cc172e54904b45948d17cba24d3f25", "Supervisory Activities");
    pub const CONTRIBUTIONS: (&str, &str) = ("047ec63e32fe450e943cb678339e8102", "Contributions");
    pub const PUBLICATIONS: (&str, &str) = ("46e8f57e67db48b29d84dda77cf0ef51", "Publications");
    pub const PRESENTATIONS: (&str, &str) = ("c7ce6f054e0941ea8b27127dbd4a26d0", "Presentations");
    pub const EVENT_ADMINISTRATION: (&str, &str) =
        ("7564fc922478441c97c9857809028895", "Event Administration");
    pub const RESEARCH_FUNDING_HISTORY: (&str, &str) =
        ("aaedc5454412483d9131f7619d10279e", "Research Funding History");
    pub const FUNDING_SOURCES: (&str, &str) = ("376b8991609f46059a3d66028f005360", "Funding Sources");
    pub const OTHER_INVESTIGATORS: (&str, &str) =
        ("c7c473d1237b432fb7f2abd831130fb7", "Other Investigators");
    pub const STUDENT_SUPERVISION: (&str, &str) =
        ("4b36fa1eef2549f6ab3a3df7c1c81e0b", "Student/Postdoctoral Supervision");
    pub const CONFERENCE_PUBLICATIONS: (&str, &str) =
        ("4b9f909503cd4c8aa8d826c87d6d874d", "Conference Publications");
    pub const JOURNAL_ARTICLES: (&str, &str) = ("9a34d6b273914f18b2273e8de7c48fd6", "Journal Articles");
    pub const REPORTS: (&str, &str) = ("7e57525337d5498a9506fdadee098b10", "Reports");
}

/// Typed content of a `value` element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    String(&'a str),
    Number(&'a str),
    /// `format="yyyy"`
    Year(&'a str),
    /// `format="yyyy/MM"`
    YearMonth(&'a str),
    /// empty french/english pair
    Bilingual,
}

/// Streaming generic-cv document builder
#[derive(Debug)]
pub struct CcvWriter {
    buf: String,
    depth: usize,
}

impl CcvWriter {
    /// Starts a document stamped with `generated`
    pub fn new(generated: NaiveDateTime) -> Self {
        let mut buf = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        buf.push_str(&format!(
            "<generic-cv:generic-cv dateTimeGenerated=\"{}\" lang=\"en\" xmlns:generic-cv=\"{}\">\n",
            generated.format("%Y-%m-%d %H:%M:%S"),
            CCV_NAMESPACE
        ));
        Self { buf, depth: 1 }
    }

    /// Starts a document stamped with the local time
    pub fn now() -> Self {
        Self::new(chrono::Local::now().naive_local())
    }

    /// Opens a grouping section such as `Activities`
    pub fn open_section(&mut self, (id, label): (&str, &str)) {
        self.line(&format!(
            "<section id=\"{}\" label=\"{}\">",
            id,
            xml_escape(label)
        ));
        self.depth += 1;
    }

    /// Opens a record section with a fresh `recordId`
    pub fn open_record(&mut self, (id, label): (&str, &str)) {
        let record_id = uuid::Uuid::new_v4().simple().to_string();
        self.line(&format!(
            "<section id=\"{}\" label=\"{}\" recordId=\"{}\">",
            id,
            xml_escape(label),
            record_id
        ));
        self.depth += 1;
    }

    pub fn close_section(&mut self) {
        if self.depth > 1 {
            self.depth -= 1;
            self.line("</section>");
        }
    }

    /// Field holding a typed value; the text is XML-escaped here
    pub fn field(&mut self, id: &str, label: &str, value: Value<'_>) {
        self.open_field(id, label);
        match value {
            Value::String(text) => self.line(&format!("<value type=\"String\">{}</value>", xml_escape(text))),
            Value::Number(text) => self.line(&format!("<value type=\"Number\">{}</value>", xml_escape(text))),
            Value::Year(text) => self.line(&format!(
                "<value format=\"yyyy\" type=\"Year\">{}</value>",
                xml_escape(text)
            )),
            Value::YearMonth(text) => self.line(&format!(
                "<value format=\"yyyy/MM\" type=\"YearMonth\">{}</value>",
                xml_escape(text)
            )),
            Value::Bilingual => {
                self.line("<value type=\"Bilingual\"></value>");
                self.line("<bilingual>");
                self.depth += 1;
                self.line("<french></french>");
                self.line("<english></english>");
                self.depth -= 1;
                self.line("</bilingual>");
            }
        }
        self.close_field();
    }

    /// Field holding a list-of-values entry; `None` writes an empty field
    pub fn field_lov(&mut self, id: &str, label: &str, lov: Option<Lov>) {
        match lov {
            Some(lov) => {
                self.open_field(id, label);
                self.line(&format!(
                    "<lov id=\"{}\">{}</lov>",
                    lov.id,
                    xml_escape(lov.label)
                ));
                self.close_field();
            }
            None => self.field_empty(id, label),
        }
    }

    /// Self-closing field the schema requires but we have no data for
    pub fn field_empty(&mut self, id: &str, label: &str) {
        self.line(&format!("<field id=\"{}\" label=\"{}\"/>", id, xml_escape(label)));
    }

    /// Closes any open sections and the root element
    pub fn finish(mut self) -> String {
        while self.depth > 1 {
            self.close_section();
        }
        self.buf.push_str("</generic-cv:generic-cv>\n");
        self.buf
    }

    fn open_field(&mut self, id: &str, label: &str) {
        self.line(&format!("<field id=\"{}\" label=\"{}\">", id, xml_escape(label)));
        self.depth += 1;
    }

    fn close_field(&mut self) {
        self.depth -= 1;
        self.line("</field>");
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buf.push('\t');
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }
}

use crate::models::record::Record;
use serde::Serialize;
use std::fmt;

/// People database columns
pub const NAME: &str = "name";
pub const LAST_NAME: &str = "Last Name";
pub const FIRST_NAME: &str = "First Name";
pub const NICK_NAME: &str = "Nick Name";
pub const MIDDLE_NAME: &str = "Middle Name";
pub const AFFILIATION: &str = "Affiliation";

pub const PEOPLE_HEADERS: [&str; 6] = [NAME, LAST_NAME, FIRST_NAME, NICK_NAME, MIDDLE_NAME, AFFILIATION];

/// A collaborator or conflict of interest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Person {
    pub first_name: String,
    pub middle_name: String,
    pub nick_name: String,
    pub last_name: String,
    pub affiliation: String,
}

impl Person {
    pub fn from_record(row: &Record) -> Self {
        Self {
            first_name: row.get(FIRST_NAME).to_string(),
            middle_name: row.get(MIDDLE_NAME).to_string(),
            nick_name: row.get(NICK_NAME).to_string(),
            last_name: row.get(LAST_NAME).to_string(),
            affiliation: row.get(AFFILIATION).to_string(),
        }
    }

    /// Row for the people database under `name`
    pub fn to_record(&self, name: &str) -> Record {
        Record::from_pairs([
            (NAME, name),
            (LAST_NAME, self.last_name.as_str()),
            (FIRST_NAME, self.first_name.as_str()),
            (NICK_NAME, self.nick_name.as_str()),
            (MIDDLE_NAME, self.middle_name.as_str()),
            (AFFILIATION, self.affiliation.as_str()),
        ])
    }

    /// `First Middle Last`, used to spot a middle name we failed to parse
    pub fn with_middle_name(&self) -> String {
        format!("{} {} {}", self.first_name, self.middle_name, self.last_name)
    }

    /// `Nick Last`
    pub fn nick_key(&self) -> String {
        format!("{} {}", self.nick_name, self.last_name)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.middle_name)?;
        if !self.nick_name.is_empty() {
            write!(f, " ({})", self.nick_name)?;
        }
        write!(f, " {} ({})", self.last_name, self.affiliation)
    }
}

/// `Name (Affiliation)`, or just the name when the affiliation is unknown
pub fn name_with_affiliation(name: &str, person: Option<&Person>) -> String {
    match person.map(|p| p.affiliation.as_str()).filter(|a| !a.is_empty()) {
        Some(affiliation) => format!("{} ({})", name, affiliation),
        None => name.to_string(),
    }
}

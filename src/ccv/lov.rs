//! Canadian Common CV list-of-values entries
//!
//! Each CCV `lov` element carries a fixed 32 character identifier and the label the
//! schema expects. Lookup tables are keyed by the short names used in the spreadsheets.

use phf::phf_map;

/// One list-of-values entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lov {
    pub id: &'static str,
    pub label: &'static str,
}

const fn lov(id: &'static str, label: &'static str) -> Lov {
    Lov { id, label }
}

pub const YES: Lov = lov("00000000000000000000000000000400", "Yes");
pub const NO: Lov = lov("00000000000000000000000000000401", "No");

pub const FUNDING_STATUS_AWARDED: Lov = lov("00000000000000000000000100000800", "Awarded");
pub const PRINCIPAL_INVESTIGATOR: Lov =
    lov("00000000000000000000000100002800", "Principal Investigator");
pub const CO_INVESTIGATOR: Lov = lov("00000000000000000000000100002801", "Co-investigator");

pub const PRINCIPAL_SUPERVISOR: Lov =
    lov("00000000000000000000000100002900", "Principal Supervisor");
pub const CO_SUPERVISOR: Lov = lov("00000000000000000000000100002901", "Co-Supervisor");

pub const DEGREE_COMPLETED: Lov = lov("00000000000000000000000000000068", "Completed");
pub const DEGREE_IN_PROGRESS: Lov = lov("00000000000000000000000000000070", "In Progress");

pub const BACHELORS: Lov = lov("523470197e8942d89d951d922f4abb0d", "Bachelor's");
pub const MASTERS_THESIS: Lov = lov("6bb179b92d1d46059bae10f6d21ea096", "Master’s Thesis");
pub const MASTERS_NON_THESIS: Lov = lov("4f0939ef786e4c23b441f8fbbcaf4ac4", "Master’s non-Thesis");
pub const DOCTORATE: Lov = lov("971953ad86ca49f3b32ac5c7c2758a1b", "Doctorate");
pub const POST_DOCTORATE: Lov = lov("e0b26301c88d4be5a6f7143981c9b3bb", "Post-doctorate");

pub const PUBLISHED: Lov = lov("00000000000000000000000100001704", "Published");
pub const ACCEPTED: Lov = lov("00000000000000000000000100001702", "Accepted");

pub const FIRST_LISTED_AUTHOR: Lov = lov("00000000000000000000000100002100", "First Listed Author");
pub const CO_AUTHOR: Lov = lov("00000000000000000000000100002102", "Co-Author");

pub const CONFERENCE_PAPER: Lov = lov("00000000000000000000000100007000", "Paper");
pub const EVENT_CONFERENCE: Lov = lov("00000000000000000000000100000700", "Conference");

pub const ORGANIZATION_ACADEMIC: Lov = lov("00000000000000000000000000000406", "Academic");

/// Spreadsheet country names
static COUNTRIES: phf::Map<&'static str, Lov> = phf_map! {
    "Canada" => lov("00000000000000000000000000002124", "Canada"),
    "USA" => lov("00000000000000000000000000002840", "United States of America"),
    "China" => lov("00000000000000000000000000002156", "China"),
    "Singapore" => lov("00000000000000000000000000002702", "Singapore"),
    "Korea" => lov("00000000000000000000000000002410", "Korea, South"),
    "UK" => lov("00000000000000000000000000002826", "United Kingdom"),
};

static AUDIENCES: phf::Map<&'static str, Lov> = phf_map! {
    "Researcher" => lov("00000000000000000000000100005000", "Researcher"),
    "Knowledge User" => lov("00000000000000000000000100005001", "Knowledge User"),
    "Decision Maker" => lov("00000000000000000000000100005002", "Decision Maker"),
    "General Public" => lov("00000000000000000000000100005003", "General Public"),
};

/// Funding agency codes
static FUNDING_ORGANIZATIONS: phf::Map<&'static str, Lov> = phf_map! {
    "NSERC" => lov("00000000000000000000000014012321", "Natural Sciences and Engineering Research Council of Canada (NSERC)"),
    "ONR" => lov("00000000000000000000000014012937", "Office of Naval Research"),
    "Connaught" => lov("00000000000000000000000014005013", "Connaught Foundation (Ontario)"),
    "Google" => lov("00000000000000000000000014008089", "Google"),
    "Telus" => lov("00000000000000000000000014016502", "TELUS Mobility"),
    "OPC" => lov("00000000000000000000000014012941", "Office of the Privacy Commissioner of Canada"),
    "OCE" => lov("00000000000000000000000014013024", "Ontario Center of Excellence (OCE)"),
    "MRI" => lov("00000000000000000000000014011635", "Ministry of Research and Innovation (MRI) (Ontario)"),
    "CSE" => lov("00000000000000000000000014004901", "Communications Security Establishment (Canada)"),
    "DND" => lov("00000000000000000000000014012125", "National Defence (Canada)"),
};

static FUNDING_TYPES: phf::Map<&'static str, Lov> = phf_map! {
    "Grant" => lov("00000000000000000000000100000900", "Grant"),
    "Contract" => lov("00000000000000000000000100000904", "Contract"),
    "Research Chair" => lov("00000000000000000000000100000901", "Research Chair"),
};

pub fn country(name: &str) -> Option<Lov> {
    COUNTRIES.get(name).copied()
}

pub fn audience(name: &str) -> Option<Lov> {
    AUDIENCES.get(name).copied()
}

pub fn funding_organization(code: &str) -> Option<Lov> {
    FUNDING_ORGANIZATIONS.get(code).copied()
}

pub fn funding_type(name: &str) -> Option<Lov> {
    FUNDING_TYPES.get(name).copied()
}

/// `Yes` or `No`
pub fn yes_no(flag: bool) -> Lov {
    if flag {
        YES
    } else {
        NO
    }
}

//! Publication counts and CCV publications from a BibTeX file

use crate::ccv::{lov, sections, CcvWriter, Value};
use crate::cli::PublicationsArgs;
use crate::config::Config;
use crate::error::{CvError, Result};
use crate::generators::RunStats;
use crate::models::{load_bib, BibEntry, BibName};
use crate::services::OutputWriter;
use crate::utils::dates::month_number;
use crate::utils::logging::{log_input_loaded, log_record};
use crate::utils::text::latex2xml;
use chrono::Datelike;
use tracing::{debug, warn};

/// Entry counts by kind
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PubCounts {
    pub conference: usize,
    pub journal: usize,
    pub patent: usize,
    pub other: usize,
}

pub fn count_entries(entries: &[BibEntry]) -> PubCounts {
    let mut counts = PubCounts::default();
    for entry in entries {
        match entry.entry_type.as_str() {
            "inproceedings" => {
                debug!("Found conference paper: {}", entry.field("title"));
                counts.conference += 1;
            }
            "article" => {
                debug!("Found journal paper: {}", entry.field("title"));
                counts.journal += 1;
            }
            "patent" => {
                debug!("Found patent: {}", entry.field("title"));
                counts.patent += 1;
            }
            _ => counts.other += 1,
        }
    }
    counts
}

pub fn render_summary(counts: &PubCounts) -> String {
    format!(
        "\\newcommand{{\\numconfpubs}}{{{}}}\n\
         \\newcommand{{\\numjournalpubs}}{{{}}}\n\
         \\newcommand{{\\numpatentpubs}}{{{}}}\n\
         \\newcommand{{\\numotherpubs}}{{{}}}\n",
        counts.conference, counts.journal, counts.patent, counts.other
    )
}

/// Decoded field value, `""` when absent
fn text(entry: &BibEntry, name: &str) -> String {
    if entry.present(name) {
        latex2xml(entry.field(name))
    } else {
        String::new()
    }
}

fn year(entry: &BibEntry) -> Result<Option<i32>> {
    if !entry.present("year") {
        return Ok(None);
    }
    let value = latex2xml(entry.field("year"));
    value
        .parse()
        .map(Some)
        .map_err(|_| CvError::Number { value })
}

/// `yyyy/MM`; a missing month reads as January
fn conference_date(entry: &BibEntry, year: Option<i32>) -> Result<String> {
    let Some(year) = year else {
        return Ok(String::new());
    };
    let month = if entry.present("month") {
        let value = latex2xml(entry.field("month"));
        month_number(&value).ok_or_else(|| CvError::unknown("month", value))?
    } else {
        1
    };
    Ok(format!("{:04}/{:02}", year, month))
}

/// `A, B and C` from the author list
pub fn author_list(authors: &[BibName]) -> String {
    let names: Vec<String> = authors
        .iter()
        .map(|a| {
            let given = latex2xml(&a.given_names());
            let surname = latex2xml(&a.surname());
            if given.is_empty() {
                surname
            } else {
                format!("{} {}", given, surname)
            }
        })
        .collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

/// The first listed author is the CV owner
pub fn is_owner_first(entry: &BibEntry, config: &Config) -> bool {
    entry.authors.first().is_some_and(|a| {
        latex2xml(a.first()) == config.owner_first_name && latex2xml(&a.surname()) == config.owner_last_name
    })
}

/// Values shared by every CCV publication kind
struct Common {
    title: String,
    pages: String,
    year: String,
    publisher: String,
    url: String,
    doi: String,
    authors: String,
    num_authors: String,
    status: lov::Lov,
    role: lov::Lov,
}

impl Common {
    fn new(entry: &BibEntry, year: Option<i32>, config: &Config) -> Self {
        let accepted = entry.field("comment").contains("To appear");
        Self {
            title: text(entry, "title"),
            pages: text(entry, "pages"),
            year: year.map(|y| y.to_string()).unwrap_or_default(),
            publisher: text(entry, "publisher"),
            url: text(entry, "url"),
            doi: text(entry, "doi"),
            authors: author_list(&entry.authors),
            num_authors: entry.authors.len().to_string(),
            status: if accepted { lov::ACCEPTED } else { lov::PUBLISHED },
            role: if is_owner_first(entry, config) {
                lov::FIRST_LISTED_AUTHOR
            } else {
                lov::CO_AUTHOR
            },
        }
    }
}

fn write_conference(ccv: &mut CcvWriter, entry: &BibEntry, c: &Common, date: &str) {
    ccv.open_record(sections::CONFERENCE_PUBLICATIONS);
    ccv.field_lov(
        "81ef87c09ded47ae8880b8d79e83406f",
        "Conference Publication Type",
        Some(lov::CONFERENCE_PAPER),
    );
    ccv.field("8e6ee535c95e42ec866b777c7472bafb", "Publication Title", Value::String(&c.title));
    ccv.field(
        "b3c8a60c053a405597b92899d95765a3",
        "Conference Name",
        Value::String(&text(entry, "booktitle")),
    );
    ccv.field_empty("5813833859a64bb58ee55e4f55aff29b", "Conference Location");
    ccv.field("c2efd9725588489b8df73467c5597c32", "City", Value::String(""));
    ccv.field("99b57db653a841ccbd5f8e52079745c0", "Conference Date", Value::YearMonth(date));
    ccv.field("1a1b39e861054ee59d270e66271a4ead", "Published In", Value::String(""));
    ccv.field("684ccb1fcdd7421f89b304ff5c40579d", "Page Range", Value::String(&c.pages));
    ccv.field_lov("080301b1f1c0464bba7fcfa1fa8fe182", "Publishing Status", Some(c.status));
    ccv.field("0318d139f3e0479083188ff8319a97b2", "Year", Value::Year(&c.year));
    ccv.field("0c357193a93f4137a87394401ac81958", "Publisher", Value::String(&c.publisher));
    ccv.field_empty("2fc69f4076f149bda1f0bb3e0ef9d79f", "Publication Location");
    ccv.field("a6e901e5f0cf48a3a7d674bf1e6fcd7f", "Description / Contribution Value", Value::Bilingual);
    ccv.field("61690b466fb748d99ed29b340c0ee60b", "URL", Value::String(&c.url));
    ccv.field_lov("560a2ce08e14497ba575af760eb12ba9", "Refereed?", Some(lov::YES));
    ccv.field_lov("06295e65f66b4c6aa286d08bd9fac59b", "Invited?", Some(lov::NO));
    ccv.field_lov("b101f8f057db434ba4fdee3a86c387cc", "Contribution Role", Some(c.role));
    ccv.field("1a66ad40654a45c9a0119b19d7cf20a6", "Number of Contributors", Value::Number(&c.num_authors));
    ccv.field("3cc54d9bb92d421da46548979048396f", "Authors", Value::String(&c.authors));
    ccv.field("018e656a0f824b1f91a6a2cb33ac61dd", "Editors", Value::String(""));
    ccv.field("49e5507889954743b104959e62d9e496", "DOI", Value::String(&c.doi));
    ccv.field_empty("575eaa1383ac49ed9d78b5a970a76eb8", "Contribution Percentage");
    ccv.field("890336779db441d8a38e7709f6866d15", "Description of Contribution Role", Value::Bilingual);
    ccv.close_section();
}

fn write_article(ccv: &mut CcvWriter, entry: &BibEntry, c: &Common) {
    ccv.open_record(sections::JOURNAL_ARTICLES);
    ccv.field("f3fd4878d47c4e83aef6959620ba4870", "Article Title", Value::String(&c.title));
    ccv.field("5c04ea4dae464499807d0b40b4cad049", "Journal", Value::String(&text(entry, "journal")));
    ccv.field("0a826c656ff34e579dfcbfb373771260", "Volume", Value::String(&text(entry, "volume")));
    ccv.field("cc1d9e14945b4e8496641dbe22b3448a", "Issue", Value::String(&text(entry, "number")));
    ccv.field("00ba1799ece344dc8d0779a3f05a4df8", "Page Range", Value::String(&c.pages));
    ccv.field_lov("3b56e4362d6a495aa5d22a1de5914741", "Publishing Status", Some(c.status));
    ccv.field("6fafe258e19e49a7884428cb49d75424", "Year", Value::Year(&c.year));
    ccv.field("4ad593960aba4a21bf154fa8daf37f9f", "Publisher", Value::String(&c.publisher));
    ccv.field_empty("4c3bc805ceaa42259f014514fc4905f8", "Publication Location");
    ccv.field("1167905d079c4400ae7a4a76a203a445", "Description / Contribution Value", Value::Bilingual);
    ccv.field("478545acac5340c0a73b7e0d2a4bee06", "URL", Value::String(&c.url));
    ccv.field_lov("2089ff1a86844b6c9a10fc63469f9a9d", "Refereed?", Some(lov::YES));
    ccv.field_empty("51b7eaff05444990af823b9d80924f5b", "Open Access?");
    ccv.field_empty("b779cc6478bd4b09b516c6d55e938583", "Synthesis?");
    ccv.field_lov("289c8814fff141d89b12569d49aa2cb3", "Contribution Role", Some(c.role));
    ccv.field("dc7922dfa04348a3a83c9afb5bbaa24a", "Number of Contributors", Value::Number(&c.num_authors));
    ccv.field("bc3b428d99384b04bb749311bb804e1d", "Authors", Value::String(&c.authors));
    ccv.field("707a6e0ca58341a5a82fb923b2842530", "Editors", Value::String(""));
    ccv.field("375a0e2ea0914291b05b0529c4755aa7", "DOI", Value::String(&c.doi));
    ccv.field_empty("9afd9e28df47464faf3f9ee2c4809e25", "Contribution Percentage");
    ccv.field("9f2e163dfcbf4abdb73e9d5c4daf03c4", "Description of Contribution Role", Value::Bilingual);
    ccv.close_section();
}

fn write_report(ccv: &mut CcvWriter, entry: &BibEntry, c: &Common) {
    ccv.open_record(sections::REPORTS);
    ccv.field("dd692787647b495fbadb038b6937950d", "Report Title", Value::String(&c.title));
    ccv.field_empty("916975e25205410a81832725aef52824", "Organization");
    ccv.field_lov(
        "e36ad9761bc94ec48350d86b87489dc2",
        "Other Organization Type",
        Some(lov::ORGANIZATION_ACADEMIC),
    );
    ccv.field(
        "212fa7b750264e6496a9e4a4c4968810",
        "Other Organization",
        Value::String(&text(entry, "institution")),
    );
    ccv.field("c90158ebf7f648b1b2e4945fef6948c4", "Number of Pages", Value::Number(&c.pages));
    ccv.field("a1f619a230b5452b9f0c8337b23f43af", "Year Submitted", Value::Year(&c.year));
    ccv.field_empty("2c74544e67264402825fa6e52154b8c0", "Synthesis?");
    ccv.field("694c4c7bf6ad47309ab6f77f4fee1869", "Description / Contribution Value", Value::Bilingual);
    ccv.field("d570e2086e0e4e7d911cbb631a631af5", "URL", Value::String(&c.url));
    ccv.field_lov("3117e1b94d5b405d818abecf74dce59e", "Contribution Role", Some(c.role));
    ccv.field("67a5ad87e91e4f92bca8d1a988d8cbe2", "Number of Contributors", Value::Number(&c.num_authors));
    ccv.field("0cf4ffe90f0b496483a8937b96a0224c", "Authors", Value::String(&c.authors));
    ccv.field("e3264fc9e17442e492bc8d5dca60e165", "Editors", Value::String(""));
    ccv.field("5ec4fa552175415a9b45c4e20504007f", "DOI", Value::String(&c.doi));
    ccv.field_empty("0c53b4b8715d4ab9bdd595b6e539936e", "Contribution Percentage");
    ccv.field("939eaf56249248d896d3a27abc6338f0", "Description of Contribution Role", Value::Bilingual);
    ccv.close_section();
}

/// Contributions/Publications document
///
/// # Parameters
/// - `ccv_years`: entries older than this many years are left out; 0 keeps all
/// - `current_year`: reference year for `ccv_years`
///
/// # Returns
/// The XML and the number of entries written
pub fn render_ccv(
    entries: &[BibEntry],
    config: &Config,
    ccv_years: i32,
    current_year: i32,
    mut ccv: CcvWriter,
) -> Result<(String, usize)> {
    let mut written = 0;
    ccv.open_section(sections::CONTRIBUTIONS);
    ccv.open_section(sections::PUBLICATIONS);
    for entry in entries {
        let year = year(entry)?;
        if let Some(year) = year {
            if ccv_years > 0 && current_year - year > ccv_years {
                continue;
            }
        }
        let common = Common::new(entry, year, config);
        match entry.entry_type.as_str() {
            "inproceedings" => {
                let date = conference_date(entry, year)?;
                write_conference(&mut ccv, entry, &common, &date);
            }
            "article" => write_article(&mut ccv, entry, &common),
            "techreport" => write_report(&mut ccv, entry, &common),
            other => {
                debug!("No CCV section for {} entry {}", other, entry.key);
                continue;
            }
        }
        written += 1;
    }
    Ok((ccv.finish(), written))
}

pub async fn run(args: &PublicationsArgs, config: &Config, writer: &mut OutputWriter) -> Result<RunStats> {
    let entries = load_bib(&args.file).await?;
    log_input_loaded(&args.file, entries.len());
    for entry in &entries {
        log_record("bib entry", entry);
        if entry.authors.is_empty() {
            warn!("Entry {} has no authors", entry.key);
        }
    }

    let counts = count_entries(&entries);
    let ccv_years = args.ccv_years.unwrap_or(config.ccv_years);
    let current_year = chrono::Local::now().year();
    let (xml, written) = render_ccv(&entries, config, ccv_years, current_year, CcvWriter::now())?;

    let path = writer.resolve(&args.xml);
    writer.write(&path, &xml).await?;
    let path = writer.resolve(&args.summary_out);
    writer.write(&path, &render_summary(&counts)).await?;

    Ok(RunStats {
        processed: written,
        skipped: entries.len() - written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loaders::parse_bibtex;
    use chrono::NaiveDate;
    use std::path::Path;

    const BIB: &str = r#"
@string{osdi = "Symposium on Operating Systems Design and Implementation"}

@inproceedings{lie2020,
  author = {David Lie and Wei Huang and Ashvin Goel},
  title = {Fast {Kernel} Checks},
  booktitle = osdi,
  year = 2020,
  month = mar,
  pages = {1--14},
}

@article{huang2019,
  author = "Wei Huang and David Lie",
  title = {Smart Phones},
  journal = {IEEE Security \& Privacy},
  volume = {17},
  number = {2},
  year = {2019},
  comment = {To appear},
}

@techreport{tr2010,
  author = {David Lie},
  title = {Old Report},
  institution = {University of Toronto},
  year = {2010},
}

@patent{p1, author = {David Lie}, title = {Widget}, year = {2018}}
@misc{m1, title = {Talk slides}, year = {2021}}
"#;

    fn entries() -> Vec<BibEntry> {
        parse_bibtex(BIB, Path::new("test.bib")).unwrap()
    }

    fn stamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn counts_by_type() {
        let counts = count_entries(&entries());
        assert_eq!(
            counts,
            PubCounts {
                conference: 1,
                journal: 1,
                patent: 1,
                other: 2,
            }
        );
        assert_eq!(
            render_summary(&counts),
            "\\newcommand{\\numconfpubs}{1}\n\\newcommand{\\numjournalpubs}{1}\n\\newcommand{\\numpatentpubs}{1}\n\\newcommand{\\numotherpubs}{2}\n"
        );
    }

    #[test]
    fn author_lists() {
        let entries = entries();
        assert_eq!(author_list(&entries[0].authors), "David Lie, Wei Huang and Ashvin Goel");
        assert_eq!(author_list(&entries[1].authors), "Wei Huang and David Lie");
        assert_eq!(author_list(&entries[2].authors), "David Lie");
        assert_eq!(author_list(&[]), "");
    }

    #[test]
    fn owner_detection() {
        let config = Config::default();
        let entries = entries();
        assert!(is_owner_first(&entries[0], &config));
        assert!(!is_owner_first(&entries[1], &config));
        assert!(!is_owner_first(&entries[4], &config));
    }

    #[test]
    fn ccv_sections_and_age_limit() {
        let config = Config::default();
        let (xml, written) = render_ccv(&entries(), &config, 6, 2022, CcvWriter::new(stamp())).unwrap();
        // the 2010 report is too old; patents and misc have no section
        assert_eq!(written, 2);
        assert!(xml.contains("label=\"Conference Publications\""));
        assert!(xml.contains("label=\"Journal Articles\""));
        assert!(!xml.contains("Old Report"));
        assert!(xml.contains("<value type=\"String\">Fast Kernel Checks</value>"));
        assert!(xml.contains("<value type=\"String\">Symposium on Operating Systems Design and Implementation</value>"));
        assert!(xml.contains("<value format=\"yyyy/MM\" type=\"YearMonth\">2020/03</value>"));
        assert!(xml.contains("<value type=\"String\">IEEE Security &amp; Privacy</value>"));
        assert!(xml.contains("<lov id=\"00000000000000000000000100001702\">Accepted</lov>"));
        assert!(xml.contains("<lov id=\"00000000000000000000000100002100\">First Listed Author</lov>"));
        assert!(xml.contains("<lov id=\"00000000000000000000000100002102\">Co-Author</lov>"));
        assert!(xml.contains("<value type=\"Number\">3</value>"));
    }

    #[test]
    fn reports_when_all_years_kept() {
        let config = Config::default();
        let (xml, written) = render_ccv(&entries(), &config, 0, 2022, CcvWriter::new(stamp())).unwrap();
        assert_eq!(written, 3);
        assert!(xml.contains("label=\"Reports\""));
        assert!(xml.contains("<value type=\"String\">University of Toronto</value>"));
        assert!(xml.contains("<lov id=\"00000000000000000000000000000406\">Academic</lov>"));
    }

    #[test]
    fn conference_date_without_month() {
        let entry = BibEntry {
            entry_type: "inproceedings".into(),
            ..Default::default()
        };
        assert_eq!(conference_date(&entry, Some(2021)).unwrap(), "2021/01");
        assert_eq!(conference_date(&entry, None).unwrap(), "");
    }
}

//! Recent collaborators and conflicts of interest
//!
//! Collaborators come from recent co-authors and co-PIs, conflicts from students.
//! Both are reconciled with a people database CSV that keeps one canonical
//! spelling and affiliation per person.

use crate::cli::CollaboratorsArgs;
use crate::config::Config;
use crate::error::{CvError, Result};
use crate::generators::funding::{CO_PIS, YEAR};
use crate::generators::RunStats;
use crate::models::loaders::{parse_csv, to_csv_string};
use crate::models::person::{name_with_affiliation, NAME, PEOPLE_HEADERS};
use crate::models::student::{FIRST_NAME, LAST_NAME};
use crate::models::{load_bib, load_csv, BibEntry, CsvTable, Degree, Person, Record};
use crate::services::output_writer::replace_with_backup;
use crate::services::OutputWriter;
use crate::utils::dates::month_number;
use crate::utils::logging::{log_input_loaded, log_record};
use crate::utils::text::{latex2xml, latex_format};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use tokio::fs;
use tracing::{debug, info, warn};

/// People keyed by `First Last`
pub type People = BTreeMap<String, Person>;

/// Months from the entry's month to `now`, counting both ends
fn months_since(year: i32, month: u32, now: NaiveDate) -> i32 {
    (now.year() - year) * 12 + now.month() as i32 - month as i32 + 1
}

/// Adds every co-author of an entry within `years` of `now`, except the owner
pub fn add_bib_collaborators(
    entries: &[BibEntry],
    years: i32,
    now: NaiveDate,
    config: &Config,
    collaborators: &mut People,
) -> Result<()> {
    let owner = config.owner_name();
    for entry in entries {
        if !entry.present("year") {
            debug!("Entry {} has no year", entry.key);
            continue;
        }
        let value = latex2xml(entry.field("year"));
        let year: i32 = value.parse().map_err(|_| CvError::Number { value })?;
        let month = if entry.present("month") {
            let value = latex2xml(entry.field("month"));
            month_number(&value).ok_or_else(|| CvError::unknown("month", value))?
        } else {
            12
        };
        if months_since(year, month, now) > years * 12 {
            continue;
        }

        for author in &entry.authors {
            let first_name = latex2xml(author.first());
            let last_name = latex2xml(&author.surname());
            let name = format!("{} {}", first_name, last_name);
            if name == owner || collaborators.contains_key(&name) {
                continue;
            }
            let person = Person {
                middle_name: latex2xml(&author.middle()),
                first_name,
                last_name,
                ..Default::default()
            };
            collaborators.insert(name, person);
        }
    }
    Ok(())
}

static INITIAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s\w\.").expect("valid regex"));
static NICK_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" \((\w+)\)").expect("valid regex"));
static TITLES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Adjunct|Assist\.|Assoc\.|Prof\.|Professor|Instructor|Lecturer|Researcher|Research|Associate|Assistant|Postdoctoral|,",
    )
    .expect("valid regex")
});
static WITH_AFFILIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*) \((.+)\)").expect("valid regex"));

/// Drops single-letter initials such as ` J.`
pub fn remove_initials(name: &str) -> String {
    INITIAL.replace_all(name, "").into_owned()
}

/// Splits `Robert J. (Bob)` into `("Robert", "Bob")`
pub fn split_nick_name(first_name: &str) -> (String, String) {
    let short = remove_initials(first_name.trim());
    let nick_name = NICK_NAME
        .captures(&short)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let formal = NICK_NAME.replace_all(&short, "").trim().to_string();
    (formal, nick_name)
}

/// Strips academic titles, leaving the organization
pub fn simplify_position(position: &str) -> String {
    TITLES
        .replace_all(position, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Where a former student is now, `Toronto` when unknown
pub fn student_affiliation(student: &Record) -> String {
    let pdf = Degree::Pdf.keys();
    let phd = Degree::Phd.keys();
    let ms = Degree::Ms.keys();
    if let Some(position) = student.opt(&pdf.last_position) {
        simplify_position(position)
    } else if student.present(&phd.last_position) && !student.present(&pdf.start) {
        simplify_position(student.get(&phd.last_position))
    } else if student.present(&ms.last_position) && !student.present(&phd.start) && !student.present(&pdf.start) {
        student.trimmed(&ms.last_position).to_string()
    } else {
        "Toronto".to_string()
    }
}

/// Adds graduate students and postdocs as conflicts
pub fn add_student_conflicts(students: &[Record], conflicts: &mut People) -> Result<()> {
    for student in students {
        let graduate = [Degree::Ms, Degree::Phd, Degree::Pdf]
            .iter()
            .any(|d| student.present(&d.keys().start));
        if !graduate {
            continue;
        }
        let (formal, nick) = split_nick_name(student.get(FIRST_NAME));
        let last_name = student.trimmed(LAST_NAME);
        let formal_key = format!("{} {}", formal, last_name);
        let nick_key = if nick.is_empty() {
            String::new()
        } else {
            format!("{} {}", nick, last_name)
        };
        debug!("formal_name: {}, nick_name: {}", formal_key, nick_key);
        if conflicts.contains_key(&formal_key) || conflicts.contains_key(&nick_key) {
            continue;
        }
        let person = Person {
            first_name: formal,
            nick_name: nick,
            last_name: last_name.to_string(),
            affiliation: student_affiliation(student).trim().to_string(),
            ..Default::default()
        };
        conflicts.insert(formal_key, person);
    }
    Ok(())
}

/// Parses `Name (Affiliation), ...; notes` into people; names without an affiliation are ignored
pub fn parse_co_pis(co_pis: &str) -> Vec<(String, Person)> {
    let names = co_pis.split(';').next().unwrap_or_default();
    let mut people = Vec::new();
    for entry in names.split(',') {
        let short = remove_initials(entry.trim());
        let Some(caps) = WITH_AFFILIATION.captures(&short) else {
            continue;
        };
        let words: Vec<&str> = caps[1].split_whitespace().collect();
        let Some((last, rest)) = words.split_last() else {
            continue;
        };
        let (first, middle) = match rest.split_first() {
            Some((first, middle)) => (first.to_string(), middle.join(" ")),
            None => (String::new(), String::new()),
        };
        let person = Person {
            first_name: first,
            middle_name: middle,
            last_name: last.to_string(),
            affiliation: caps[2].to_string(),
            ..Default::default()
        };
        people.push((format!("{} {}", person.first_name, person.last_name), person));
    }
    people
}

/// Adds co-PIs of grants awarded within `years` of `current_year`
pub fn add_funding_collaborators(
    grants: &[Record],
    years: i32,
    current_year: i32,
    collaborators: &mut People,
) -> Result<()> {
    for grant in grants {
        let year = grant.trimmed(YEAR);
        let skip = year.chars().count().saturating_sub(4);
        let tail: String = year.chars().skip(skip).collect();
        let grant_year: i32 = tail.parse().map_err(|_| CvError::Number {
            value: year.to_string(),
        })?;
        if current_year - grant_year > years {
            continue;
        }
        for (name, person) in parse_co_pis(grant.get(CO_PIS)) {
            collaborators.entry(name).or_insert(person);
        }
    }
    Ok(())
}

/// People database rows; the header order is kept for writing back
pub fn people_from_table(table: &CsvTable) -> People {
    table
        .iter()
        .map(|row| (row.get(NAME).to_string(), Person::from_record(row)))
        .collect()
}

pub fn people_to_table(db: &People, headers: &[String]) -> CsvTable {
    CsvTable {
        headers: headers.to_vec(),
        records: db.iter().map(|(name, person)| person.to_record(name)).collect(),
    }
}

/// Reconciles collaborators and conflicts with the people database
///
/// Collaborators and conflicts may be renamed to the key the database already uses.
/// Returns whether the database changed.
pub fn merge_people(db: &mut People, conflicts: &mut People, collaborators: &mut People) -> bool {
    let mut updated = false;

    let mut renames = Vec::new();
    for (name, person) in collaborators.iter() {
        if db.contains_key(name) {
            continue;
        }
        let with_middle = person.with_middle_name();
        if db.contains_key(&with_middle) {
            debug!("Collaborators: Replacing: {} with {}", name, with_middle);
            renames.push((name.clone(), with_middle));
        } else {
            info!("Adding DB: {} as {}", name, person);
            db.insert(name.clone(), person.clone());
            updated = true;
        }
    }
    for (old, new) in renames {
        collaborators.remove(&old);
        if let Some(person) = db.get(&new) {
            collaborators.insert(new, person.clone());
        }
    }

    let mut renames = Vec::new();
    for (name, person) in conflicts.iter() {
        let alt_name = person.nick_key();
        if let Some(existing) = db.get(name) {
            if existing != person {
                info!("Updating DB: {} from {} to {}", name, existing, person);
                db.insert(name.clone(), person.clone());
                updated = true;
            }
        } else if let Some(existing) = db.get(&alt_name) {
            // the student goes by their nickname
            if existing != person {
                info!("Updating DB: {} from {} to {}", alt_name, existing, person);
                db.insert(alt_name.clone(), person.clone());
                updated = true;
            }
            debug!("Conflicts replacing: {} with {}", name, alt_name);
            renames.push((name.clone(), alt_name));
        } else {
            info!("Adding DB: {} as {}", name, person);
            db.insert(name.clone(), person.clone());
            updated = true;
        }

        // a middle name parsed as part of the first name
        let first_words: Vec<&str> = person.first_name.split(' ').collect();
        let short_name = format!("{} {}", first_words[0], person.last_name);
        if first_words.len() > 1 && db.contains_key(&short_name) {
            info!("Replacing DB: {} with {}", short_name, name);
            db.remove(&short_name);
            db.insert(name.clone(), person.clone());
            updated = true;
        }
    }
    for (old, new) in renames {
        conflicts.remove(&old);
        if let Some(person) = db.get(&new) {
            conflicts.insert(new, person.clone());
        }
    }

    updated
}

/// Affiliation as recorded in the database, falling back to what we parsed
fn display_name(name: &str, person: &Person, db: &People) -> String {
    name_with_affiliation(name, Some(db.get(name).unwrap_or(person)))
}

/// `Name (Affiliation), ...` sorted by name
pub fn render_collabs(collaborators: &People, db: &People) -> String {
    collaborators
        .iter()
        .map(|(name, person)| latex_format(&display_name(name, person, db)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One `Name (Affiliation)` per line, conflicts and collaborators together
pub fn render_conflicts(conflicts: &People, collaborators: &People, db: &People) -> String {
    let mut all = conflicts.clone();
    all.extend(collaborators.iter().map(|(k, v)| (k.clone(), v.clone())));
    all.iter()
        .map(|(name, person)| format!("{}\n", display_name(name, person, db)))
        .collect()
}

/// Loads the people database; a missing file is an empty database
async fn load_people(path: &Path) -> Result<CsvTable> {
    match fs::read_to_string(path).await {
        Ok(content) => parse_csv(&content, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("{} not found, starting an empty people database", path.display());
            Ok(CsvTable {
                headers: PEOPLE_HEADERS.iter().map(|h| h.to_string()).collect(),
                records: Vec::new(),
            })
        }
        Err(e) => Err(CvError::io(path, e)),
    }
}

pub async fn run(args: &CollaboratorsArgs, config: &Config, writer: &mut OutputWriter) -> Result<RunStats> {
    let years = args.years.unwrap_or(config.collaborator_years);
    let now = chrono::Local::now().date_naive();

    let entries = load_bib(&args.bib_file).await?;
    log_input_loaded(&args.bib_file, entries.len());
    let students = load_csv(&args.student_csv).await?;
    log_input_loaded(&args.student_csv, students.len());
    let grants = load_csv(&args.funding_csv).await?;
    log_input_loaded(&args.funding_csv, grants.len());

    let mut collaborators = People::new();
    let mut conflicts = People::new();
    add_bib_collaborators(&entries, years, now, config, &mut collaborators)?;
    add_student_conflicts(&students.records, &mut conflicts)?;
    add_funding_collaborators(&grants.records, years, now.year(), &mut collaborators)?;
    for (name, person) in collaborators.iter().chain(conflicts.iter()) {
        log_record(name, person);
    }

    let people_table = load_people(&args.people_csv).await?;
    log_input_loaded(&args.people_csv, people_table.len());
    let existed = args.people_csv.exists();
    let mut db = people_from_table(&people_table);
    if merge_people(&mut db, &mut conflicts, &mut collaborators) {
        let content = to_csv_string(&people_to_table(&db, &people_table.headers), &args.people_csv)?;
        if existed {
            replace_with_backup(&args.people_csv, &content)?;
        } else {
            fs::write(&args.people_csv, content)
                .await
                .map_err(|e| CvError::io(&args.people_csv, e))?;
            info!("✓ Created {}", args.people_csv.display());
        }
    }

    let path = writer.resolve(&args.tex_out);
    writer.write(&path, &render_collabs(&collaborators, &db)).await?;
    let path = writer.resolve(&args.txt_out);
    writer
        .write(&path, &render_conflicts(&conflicts, &collaborators, &db))
        .await?;

    Ok(RunStats {
        processed: collaborators.len() + conflicts.len(),
        skipped: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loaders::parse_bibtex;

    fn person(first: &str, last: &str, affiliation: &str) -> Person {
        Person {
            first_name: first.into(),
            last_name: last.into(),
            affiliation: affiliation.into(),
            ..Default::default()
        }
    }

    #[test]
    fn initials_and_nick_names() {
        assert_eq!(remove_initials("Robert J. Smith"), "Robert Smith");
        assert_eq!(
            split_nick_name(" Robert J. (Bob) "),
            ("Robert".to_string(), "Bob".to_string())
        );
        assert_eq!(split_nick_name("Alice"), ("Alice".to_string(), String::new()));
    }

    #[test]
    fn positions_are_simplified() {
        assert_eq!(simplify_position("Assistant Professor, MIT"), "MIT");
        assert_eq!(simplify_position("Research Scientist, Google"), "Scientist Google");

        let phd = Record::from_pairs([("PhD Start Date", "2015-09-01"), ("PhD Last Position", "Professor, UBC")]);
        assert_eq!(student_affiliation(&phd), "UBC");
        let both = Record::from_pairs([
            ("PhD Start Date", "2015-09-01"),
            ("PhD Last Position", "Engineer, Intel"),
            ("PDF Start Date", "2020-09-01"),
        ]);
        assert_eq!(student_affiliation(&both), "Toronto");
    }

    #[test]
    fn co_pis_need_an_affiliation() {
        let people = parse_co_pis("Ashvin Goel (Toronto), Jane Q. Doe (MIT), Nobody; with notes (x)");
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].0, "Ashvin Goel");
        assert_eq!(people[1].0, "Jane Doe");
        assert_eq!(people[1].1.affiliation, "MIT");

        let people = parse_co_pis("Mary Ann Smith (Waterloo)");
        assert_eq!(people[0].1.middle_name, "Ann");
        assert_eq!(people[0].0, "Mary Smith");
    }

    #[test]
    fn bib_window_in_months() {
        let bib = r#"
@inproceedings{a, author = {David Lie and Wei Huang}, title = {A}, year = 2023, month = nov}
@inproceedings{b, author = {Ashvin Goel and David Lie}, title = {B}, year = 2021}
@inproceedings{c, author = {Old Friend}, title = {C}, year = 2019}
"#;
        let entries = parse_bibtex(bib, Path::new("t.bib")).unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let mut collaborators = People::new();
        add_bib_collaborators(&entries, 2, now, &Config::default(), &mut collaborators).unwrap();
        // December 2021 is 26 months back counting both ends
        let names: Vec<&String> = collaborators.keys().collect();
        assert_eq!(names, vec!["Wei Huang"]);

        let mut collaborators = People::new();
        add_bib_collaborators(&entries, 3, now, &Config::default(), &mut collaborators).unwrap();
        assert_eq!(collaborators.len(), 2);
        assert!(!collaborators.contains_key("David Lie"));
    }

    #[test]
    fn funding_window_uses_last_four_digits() {
        let grants = vec![
            Record::from_pairs([(YEAR, "2022-2023"), (CO_PIS, "Ashvin Goel (Toronto)")]),
            Record::from_pairs([(YEAR, "2015"), (CO_PIS, "Old Colleague (Waterloo)")]),
        ];
        let mut collaborators = People::new();
        add_funding_collaborators(&grants, 2, 2024, &mut collaborators).unwrap();
        assert_eq!(collaborators.len(), 1);
        assert_eq!(collaborators["Ashvin Goel"].affiliation, "Toronto");
    }

    #[test]
    fn student_conflicts_skip_undergrads() {
        let students = vec![
            Record::from_pairs([
                (FIRST_NAME, "Robert (Bob)"),
                (LAST_NAME, "Smith"),
                ("MS Start Date", "2018-09-01"),
                ("MS Last Position", "Google"),
            ]),
            Record::from_pairs([(FIRST_NAME, "Una"), (LAST_NAME, "Grad"), ("UG Start Date", "2022-05-01")]),
        ];
        let mut conflicts = People::new();
        add_student_conflicts(&students, &mut conflicts).unwrap();
        assert_eq!(conflicts.len(), 1);
        let bob = &conflicts["Robert Smith"];
        assert_eq!(bob.nick_name, "Bob");
        assert_eq!(bob.affiliation, "Google");
    }

    #[test]
    fn merge_prefers_database_spellings() {
        let mut db = People::new();
        db.insert("Bob Smith".into(), person("Robert", "Smith", "Old Co"));
        db.insert("Jane Ann Doe".into(), person("Jane", "Doe", "MIT"));

        let mut collaborators = People::new();
        let mut jane = person("Jane", "Doe", "");
        jane.middle_name = "Ann".into();
        collaborators.insert("Jane Doe".into(), jane);
        collaborators.insert("Wei Huang".into(), person("Wei", "Huang", ""));

        let mut conflicts = People::new();
        let mut bob = person("Robert", "Smith", "Google");
        bob.nick_name = "Bob".into();
        conflicts.insert("Robert Smith".into(), bob.clone());

        assert!(merge_people(&mut db, &mut conflicts, &mut collaborators));
        assert!(collaborators.contains_key("Jane Ann Doe"));
        assert!(!collaborators.contains_key("Jane Doe"));
        assert!(db.contains_key("Wei Huang"));
        assert_eq!(db["Bob Smith"], bob);
        assert!(conflicts.contains_key("Bob Smith"));
        assert!(!db.contains_key("Robert Smith"));

        // a second pass finds nothing new
        assert!(!merge_people(&mut db, &mut conflicts, &mut collaborators));
    }

    #[test]
    fn outputs_are_sorted_with_affiliations() {
        let mut db = People::new();
        db.insert("Wei Huang".into(), person("Wei", "Huang", "Tsinghua"));
        db.insert("Ann Lee".into(), person("Ann", "Lee", ""));
        let mut collaborators = People::new();
        collaborators.insert("Wei Huang".into(), person("Wei", "Huang", ""));
        collaborators.insert("Ann Lee".into(), person("Ann", "Lee", ""));
        let mut conflicts = People::new();
        conflicts.insert("Bob Smith".into(), person("Robert", "Smith", "AT&T"));

        assert_eq!(render_collabs(&collaborators, &db), "Ann Lee, Wei Huang (Tsinghua)");
        assert_eq!(
            render_conflicts(&conflicts, &collaborators, &db),
            "Ann Lee\nBob Smith (AT&T)\nWei Huang (Tsinghua)\n"
        );
    }

    #[tokio::test]
    async fn missing_people_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let table = load_people(&dir.path().join("people.csv")).await.unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers, PEOPLE_HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>());
    }
}

//! Technical program committee memberships
//!
//! Conference names come from a second CSV keyed by short name:
//! `The <ordinal> <full name>` where the ordinal counts editions since `start_year`.

use crate::ccv::{lov, sections, CcvWriter, Value};
use crate::cli::TpcsArgs;
use crate::error::{CvError, Result};
use crate::generators::RunStats;
use crate::models::loaders::to_csv_string;
use crate::models::{load_csv, CsvTable, Record};
use crate::services::output_writer::replace_with_backup;
use crate::services::{LinkCheck, OutputWriter, UrlChecker};
use crate::utils::dates::{add_years, year_month};
use crate::utils::logging::{log_input_loaded, log_record};
use crate::utils::text::{html_escape, latex_format, ordinal};
use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

pub const CONF: &str = "conf";
pub const URL: &str = "URL";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const ROLE: &str = "role";
pub const NOTES: &str = "notes";

pub const CONF_SHORT: &str = "conf_short";
pub const CONF_FULL: &str = "conf_full";
pub const START_YEAR: &str = "start_year";

/// Marks a URL that is known to be dead
pub const NO_URL: &str = "none";

const CURRENT_TAB: &str = r#"
<div class="tabs">
    <div class="tab">
      <input class="accordian" type="radio" id="rd1" name="rd" checked>
      <label class="tab-label" for="rd1">Current Program Committees</label>
      <div class="tab-content">
        <ul>
"#;

const PAST_TAB: &str = r#"</ul>
      </div>
    </div>
    <div class="tab">
      <input class="accordian" type="radio" id="rd2" name="rd">
      <label class="tab-label" for="rd2">Past Program Committees</label>
      <div class="tab-content">
        <ul>
"#;

fn parse_year(value: &str) -> Result<i32> {
    value.trim().parse().map_err(|_| CvError::Number {
        value: value.to_string(),
    })
}

/// Display name and link of one committee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfName {
    pub name: String,
    pub url: String,
}

impl ConfName {
    /// A usable link: not empty and not marked dead
    pub fn link(&self) -> Option<&str> {
        Some(self.url.as_str()).filter(|url| !url.is_empty() && *url != NO_URL)
    }
}

/// Names a TPC row using the conference table
pub fn conf_name(tpc: &Record, conferences: &[Record]) -> Result<ConfName> {
    let short = tpc.get(CONF);
    let Some(conference) = conferences.iter().find(|c| c.get(CONF_SHORT) == short) else {
        return Ok(ConfName {
            name: format!("The {}", short.trim()),
            url: tpc.get(URL).to_string(),
        });
    };

    let year = tpc.trimmed(YEAR);
    let edition = parse_year(year)? - parse_year(conference.get(START_YEAR))? + 1;
    let name = format!("The {} {}", ordinal(edition.into()), conference.trimmed(CONF_FULL));
    let url = if tpc.present(URL) {
        tpc.get(URL).to_string()
    } else {
        let year_short = year.get(year.len().saturating_sub(2)..).unwrap_or(year);
        conference
            .get(URL)
            .replace("<year>", year)
            .replace("<year-short>", year_short)
    };
    Ok(ConfName { name, url })
}

fn notes_suffix(tpc: &Record, encode: fn(&str) -> String) -> String {
    if tpc.present(NOTES) {
        format!(" ({})", encode(tpc.get(NOTES)))
    } else {
        String::new()
    }
}

fn html_notes(text: &str) -> String {
    html_escape(text.trim())
}

pub fn render_latex(tpcs: &[Record], conferences: &[Record]) -> Result<String> {
    let mut tex = String::from("\\begin{innerenum}\n");
    for tpc in tpcs {
        let conf = conf_name(tpc, conferences)?;
        let name = latex_format(&conf.name);
        let title = match conf.link() {
            Some(url) => format!("\\href{{{}}}{{{}}}", url, name),
            None => name,
        };
        tex.push_str(&format!(
            "\\item \\textit{{{}}}, {}{}.\n",
            title,
            tpc.trimmed(YEAR),
            notes_suffix(tpc, latex_format)
        ));
    }
    tex.push_str("\\end{innerenum}");
    Ok(tex)
}

/// Tabbed list; rows before `current_year` go to the past tab
pub fn render_html(tpcs: &[Record], conferences: &[Record], current_year: i32) -> Result<String> {
    let mut html = String::from(CURRENT_TAB);
    let mut current = true;
    for tpc in tpcs {
        let conf = conf_name(tpc, conferences)?;
        if current && parse_year(tpc.get(YEAR))? < current_year {
            html.push_str(PAST_TAB);
            current = false;
        }
        let notes = notes_suffix(tpc, html_notes);
        let year = tpc.trimmed(YEAR);
        let name = html_escape(&conf.name);
        match conf.link() {
            Some(url) => html.push_str(&format!(
                "<li><a href=\"{}\">{}</a>, {}{}.</li>\n",
                html_escape(url),
                name,
                year,
                notes
            )),
            None => html.push_str(&format!("<li>{}, {}{}</li>\n", name, year, notes)),
        }
    }
    html.push_str("</ul></div></div></div>");
    Ok(html)
}

fn role(tpc: &Record) -> Result<&'static str> {
    match tpc.get(ROLE) {
        "" => Ok("Technical Program Committee Member"),
        "TPC Chair" => Ok("Technical Program Committee Chair"),
        "General Chair" => Ok("General Chair"),
        other => Err(CvError::unknown("TPC role", other)),
    }
}

/// Conference date: (year, month or January, 1)
fn conf_date(tpc: &Record) -> Result<NaiveDate> {
    let year = parse_year(tpc.get(YEAR))?;
    let month = if tpc.present(MONTH) {
        tpc.trimmed(MONTH).parse().map_err(|_| CvError::Number {
            value: tpc.get(MONTH).to_string(),
        })?
    } else {
        1
    };
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| CvError::Date {
        value: format!("{}/{}", year, month),
    })
}

pub fn render_ccv(tpcs: &[Record], conferences: &[Record], mut ccv: CcvWriter) -> Result<String> {
    ccv.open_section(sections::ACTIVITIES);
    ccv.open_section(sections::ADMINISTRATIVE_ACTIVITIES);
    for tpc in tpcs {
        let role = role(tpc)?;
        let conf = conf_name(tpc, conferences)?;
        let date = conf_date(tpc)?;
        let event = year_month(date);
        let activity_start = year_month(add_years(date, -1));

        ccv.open_record(sections::EVENT_ADMINISTRATION);
        ccv.field("31cdeb30328e410cb6b78fa48435be08", "Role", Value::String(role));
        ccv.field_lov(
            "7878a016f370434a8364beca1a47ea20",
            "Event Type",
            Some(lov::EVENT_CONFERENCE),
        );
        ccv.field("f5389531adca4f54a4e9bee39532323c", "Event Name", Value::String(&conf.name));
        ccv.field(
            "9def30776da74a1597de4fd0d9a0e74b",
            "Activity Start Date",
            Value::YearMonth(&activity_start),
        );
        ccv.field("0dc7af4aa5ff4bb880bb6a5db48a9b55", "Activity End Date", Value::YearMonth(&event));
        ccv.field("7cf2f82472bd4d7086f58b43c488b39e", "Primary Event Organizer", Value::String(""));
        ccv.field("cf11be8d0fa94624b80a11ad83a911e8", "Event Start Date", Value::YearMonth(&event));
        ccv.field("aabcc98da2b348ea9502c35177096674", "Event End Date", Value::YearMonth(&event));
        ccv.field("32a0b4e43c8147cdae1ad306b4cb3353", "Activity Description", Value::Bilingual);
        ccv.close_section();
    }
    Ok(ccv.finish())
}

/// Checks every row's link and marks failing ones `none`
///
/// # Parameters
/// - `tpcs`: TPC table, updated in place
/// - `conferences`: conference table used to build default links
/// - `checker`: URL checker
///
/// Returns whether any row changed.
pub async fn fix_urls<C: LinkCheck>(tpcs: &mut CsvTable, conferences: &[Record], checker: &C) -> Result<bool> {
    let mut updated = false;
    for tpc in tpcs.records.iter_mut() {
        let conf = conf_name(tpc, conferences)?;
        let Some(url) = conf.link() else {
            continue;
        };
        debug!("Checking URL {}", url);
        let status = checker.check(url).await;
        if !status.is_ok() {
            info!("Removing {} for {} {} ({})", url, tpc.get(CONF), tpc.get(YEAR), status);
            tpc.set(URL, NO_URL);
            updated = true;
        }
    }
    Ok(updated)
}

pub async fn run(args: &TpcsArgs, writer: &mut OutputWriter, checker: &UrlChecker) -> Result<RunStats> {
    let mut tpcs = load_csv(&args.file).await?;
    log_input_loaded(&args.file, tpcs.len());
    let conferences = load_csv(&args.conferences).await?;
    log_input_loaded(&args.conferences, conferences.len());

    if args.fix_urls {
        if fix_urls(&mut tpcs, &conferences.records, checker).await? {
            let content = to_csv_string(&tpcs, &args.file)?;
            replace_with_backup(&args.file, &content)?;
        } else {
            info!("All TPC links are live, {} unchanged", args.file.display());
        }
        return Ok(RunStats {
            processed: tpcs.len(),
            skipped: 0,
        });
    }

    for tpc in tpcs.iter() {
        log_record("tpc", tpc);
    }
    let current_year = chrono::Local::now().year();
    let tex = render_latex(&tpcs.records, &conferences.records)?;
    let html = render_html(&tpcs.records, &conferences.records, current_year)?;
    let xml = render_ccv(&tpcs.records, &conferences.records, CcvWriter::now())?;

    let path = writer.resolve(&args.tex_out);
    writer.write(&path, &tex).await?;
    let path = writer.resolve(&args.html_out);
    writer.write(&path, &html).await?;
    let path = writer.resolve(&args.xml);
    writer.write(&path, &xml).await?;

    Ok(RunStats {
        processed: tpcs.len(),
        skipped: 0,
    })
}

//! Conference and invited talks: LaTeX lists and CCV presentations

use crate::ccv::{lov, sections, CcvWriter, Value};
use crate::cli::TalksArgs;
use crate::error::Result;
use crate::generators::RunStats;
use crate::models::{load_csv, Record};
use crate::services::OutputWriter;
use crate::utils::logging::{log_input_loaded, log_record};
use crate::utils::text::{ccv_text, latex_format};
use tracing::error;

const TITLE: &str = "Title";
const VENUE: &str = "Venue";
const YEAR: &str = "Year";
const HEADER: &str = "Header";
const URL: &str = "URL";
const COUNTRY: &str = "Country";
const CITY: &str = "City";
const AUDIENCE: &str = "Audience";
const TYPE: &str = "Type";
const KEYNOTE: &str = "Keynote";
const CO_PRESENTERS: &str = "Co-Presenters";

pub const CONFERENCE: &str = "Conference";
pub const INVITED: &str = "Invited";

/// Talks of one type, most recent first
pub fn talks_of_type<'a>(talks: &'a [Record], talk_type: &str) -> Vec<&'a Record> {
    let mut selected: Vec<&Record> = talks
        .iter()
        .filter(|talk| talk.trimmed(TYPE) == talk_type)
        .collect();
    selected.sort_by(|a, b| b.get(YEAR).cmp(a.get(YEAR)));
    selected
}

pub fn render_talk_item(talk: &Record) -> String {
    let title = latex_format(talk.get(TITLE));
    let title = if talk.present(URL) {
        format!("\\href{{{}}}{{{}}}", talk.trimmed(URL), title)
    } else {
        title
    };
    let body = format!(
        "\\textit{{{}}}, {}, {}\n",
        title,
        latex_format(talk.get(VENUE)),
        talk.trimmed(YEAR)
    );
    if talk.present(HEADER) {
        format!("\\item \\textbf{{{}}}: {}", latex_format(talk.get(HEADER)), body)
    } else {
        format!("\\item {}", body)
    }
}

pub fn render_talk_list(talks: &[&Record]) -> String {
    let mut tex = String::from("\\begin{innerenum}\n");
    for talk in talks {
        tex.push_str(&render_talk_item(talk));
    }
    tex.push_str("\\end{innerenum}");
    tex
}

/// A talk can go to the CCV only with all of these
fn ccv_ready(talk: &Record) -> bool {
    [COUNTRY, AUDIENCE, TITLE, VENUE, YEAR, TYPE]
        .iter()
        .all(|field| talk.present(field))
}

/// Contributions/Presentations document; returns the XML and how many talks were left out
pub fn render_ccv(talks: &[Record], mut ccv: CcvWriter) -> (String, usize) {
    let mut skipped = 0;
    ccv.open_section(sections::CONTRIBUTIONS);
    for talk in talks {
        if !ccv_ready(talk) {
            skipped += 1;
            continue;
        }

        let country = lov::country(talk.get(COUNTRY));
        if country.is_none() {
            error!("Country {} not found in the CCV country list", talk.get(COUNTRY));
        }
        let audience = lov::audience(talk.get(AUDIENCE));
        if audience.is_none() {
            error!("Audience {} not found in the CCV audience list", talk.get(AUDIENCE));
        }

        ccv.open_record(sections::PRESENTATIONS);
        ccv.field(
            "3f6a7ac56ee64b7dbd84dba9d6e3302d",
            "Presentation Title",
            Value::String(&ccv_text(talk.get(TITLE))),
        );
        ccv.field(
            "8d882e55b0a54d0b8eec347f5502a19b",
            "Conference / Event Name",
            Value::String(&ccv_text(talk.get(VENUE))),
        );
        ccv.field_lov("f4b5f1a1d181404ca9c0fea81f9a7e79", "Location", country);
        ccv.field(
            "de6f8e0d7a714b07a4671af86405c6c9",
            "City",
            Value::String(&ccv_text(talk.get(CITY))),
        );
        ccv.field_lov("5f01d3af96d54a7ca3926b467dc946b7", "Main Audience", audience);
        ccv.field_lov(
            "720d2f02feaf4aacb06ce60be0c6f603",
            "Invited?",
            Some(lov::yes_no(talk.get(TYPE) == INVITED)),
        );
        ccv.field_lov(
            "9b6d317fd53e4b6a9e2e1d9e2001f3f5",
            "Keynote?",
            Some(lov::yes_no(talk.get(KEYNOTE) == "Yes")),
        );
        ccv.field_empty("9caf21634d984fc597f069f6e4a0a351", "Competitive?");
        ccv.field(
            "725e4c54320b474680feaf530567fdd3",
            "Presentation Year",
            Value::Year(&ccv_text(talk.get(YEAR))),
        );
        ccv.field(
            "cc257bd89e6341a6bd53cc1cf05935c9",
            "Description / Contribution Value",
            Value::Bilingual,
        );
        ccv.field(
            "8f612e2d2b23458fa114d8a790c38e13",
            "URL",
            Value::String(&ccv_text(talk.get(URL))),
        );
        ccv.field(
            "d1dde22650bf4c508cf997beee12ef50",
            "Co-Presenters",
            Value::String(&ccv_text(talk.get(CO_PRESENTERS))),
        );
        ccv.close_section();
    }
    (ccv.finish(), skipped)
}

pub async fn run(args: &TalksArgs, writer: &mut OutputWriter) -> Result<RunStats> {
    let table = load_csv(&args.file).await?;
    log_input_loaded(&args.file, table.len());
    for talk in table.iter() {
        log_record("talk", talk);
    }

    let conference = talks_of_type(&table.records, CONFERENCE);
    let path = writer.resolve(&args.conference_tex);
    writer.write(&path, &render_talk_list(&conference)).await?;

    let invited = talks_of_type(&table.records, INVITED);
    let path = writer.resolve(&args.invited_tex);
    writer.write(&path, &render_talk_list(&invited)).await?;

    let (xml, skipped) = render_ccv(&table.records, CcvWriter::now());
    let path = writer.resolve(&args.xml);
    writer.write(&path, &xml).await?;

    Ok(RunStats {
        processed: table.len() - skipped,
        skipped,
    })
}

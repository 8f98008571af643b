//! Supervised students and postdocs
//!
//! Outputs:
//! - one `longtable` per degree plus a `new_` minipage variant
//! - co-supervisor footnotes for the PhD and MS tables
//! - `\newcommand` counters
//! - the group web page fragment
//! - CCV supervision records

use crate::ccv::{lov, sections, CcvWriter, Lov, Value};
use crate::cli::StudentsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::generators::RunStats;
use crate::models::student::{
    by_last_name, current_degree, end_date, sort_students, start_date, table_order, Status,
    EXTERNAL_EXAMINER, FIRST_NAME, HOME_PAGE, INSTITUTION, LAST_NAME,
};
use crate::models::{load_csv, Degree, Record};
use crate::services::output_writer::prefix_new;
use crate::services::OutputWriter;
use crate::utils::dates::{add_years, month_year, year_month};
use crate::utils::logging::{log_input_loaded, log_record};
use crate::utils::text::{ccv_text, html_escape, latex_format};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Order the LaTeX tables are produced in; co-supervisor numbering follows it
const TABLE_ORDER: [Degree; 5] = [Degree::Phd, Degree::Ms, Degree::Pdf, Degree::Meng, Degree::Ug];

const PDF_HEADER: &str = "\\begin{longtable}[h]{|p{\\namelength}|p{\\datelength}|p{\\textwidth-\\datelength-\\datelength-30pt}|} \\hline
\\multicolumn{1}{|c|}{\\bf Name} &
\\multicolumn{1}{|c|}{\\bf Dates} &
\\multicolumn{1}{|c|}{\\bf Current Position} \\\\
\\hline
";

const THESIS_HEADER: &str = "\\begin{longtable}[h]{|p{\\namelength}|p{\\textwidth-\\namelength-\\datelength-30pt}|p{\\datelength}|}
\\hline
\\multicolumn{1}{|c|}{\\bf Name} &
\\multicolumn{1}{|c|}{\\bf Thesis Title} &
\\multicolumn{1}{|c|}{\\bf Dates \\& } \\\\
\\multicolumn{1}{|c|}{\\bf } &
\\multicolumn{1}{|c|}{\\bf } &
\\multicolumn{1}{|c|}{\\bf Last Pos.} \\\\ \\hline \\hline
";

const HTML_OPEN: &str = "<div class=\"elementor-element elementor-element-7cc73994 elementor-drop-cap-yes student elementor-drop-cap-view-default elementor-widget elementor-widget-text-editor\" data-id=\"7cc73994\" data-element_type=\"widget\" data-settings=\"{&quot;drop_cap&quot;:&quot;yes&quot;}\" data-widget_type=\"text-editor.default\"><div class=\"elementor-text-editor elementor-clearfix\">";

/// One degree's table in both layouts, with its counts
#[derive(Debug, Default, Clone)]
pub struct DegreeTable {
    pub table: String,
    pub new_table: String,
    pub completed: usize,
    pub current: usize,
}

/// Position of a co-supervisor in the shared footnote list, 1-based
fn footnote_index(cosups: &mut Vec<String>, name: &str) -> usize {
    match cosups.iter().position(|c| c == name) {
        Some(idx) => idx + 1,
        None => {
            cosups.push(name.to_string());
            cosups.len()
        }
    }
}

fn latex_name(student: &Record) -> String {
    let name = format!(
        "{} {}",
        latex_format(student.get(FIRST_NAME)),
        latex_format(student.get(LAST_NAME))
    );
    match student.opt(HOME_PAGE) {
        Some(home) => format!("\\href{{{}}}{{{}}}", home.trim(), name),
        None => name,
    }
}

/// `MM/YYYY--MM/YYYY`, end left blank while the degree is in progress
fn date_range(student: &Record, degree: Degree) -> Result<String> {
    let start = month_year(start_date(student, degree)?);
    let end = end_date(student, degree)?.map(month_year).unwrap_or_default();
    Ok(format!("{}--{}", start, end))
}

/// Renders the table of every student with a start date for `degree`
///
/// # Parameters
/// - `students`: full roster
/// - `degree`: table to build
/// - `cosups`: co-supervisor list shared by all tables, extended in place
pub fn render_table(students: &[Record], degree: Degree, cosups: &mut Vec<String>) -> Result<DegreeTable> {
    let keys = degree.keys();
    let mut rows: Vec<Record> = students
        .iter()
        .filter(|s| s.present(&keys.start))
        .cloned()
        .collect();
    sort_students(&mut rows, |a, b| table_order(a, b, degree))?;

    let mut out = DegreeTable {
        table: String::from(if degree == Degree::Pdf { PDF_HEADER } else { THESIS_HEADER }),
        new_table: String::from("\\vspace{2pt}"),
        ..Default::default()
    };

    for student in &rows {
        if student.present(&keys.end) {
            out.completed += 1;
        } else {
            out.current += 1;
        }

        let name = latex_name(student);
        let program = latex_format(student.get(&keys.program));
        let title = match (student.opt(&keys.thesis), student.opt(&keys.thesis_url)) {
            (Some(thesis), Some(url)) => format!("\\href{{{}}}{{{}}}", url.trim(), latex_format(thesis)),
            (Some(thesis), None) => latex_format(thesis),
            _ => String::new(),
        };
        let position = student.opt(&keys.last_position).map(latex_format);
        let dates = date_range(student, degree)?;
        let cosup = match student.opt(&keys.co_supervisor) {
            Some(name) => format!("\\footnotemark[{}]", footnote_index(cosups, name.trim())),
            None => String::new(),
        };

        let mut minipage = String::from("\\begin{minipage}{\\linewidth}\n");
        match degree {
            Degree::Pdf => match &position {
                Some(pos) => {
                    out.table.push_str(&format!("{}{} & {} & {}\\\\ \\hline\n", name, cosup, dates, pos));
                    minipage.push_str(&format!(
                        "{{\\bfseries{{{}{} \\hfill {}}}}}\\\\\nCurrent Position: {}\n",
                        name, cosup, dates, pos
                    ));
                }
                None => {
                    out.table.push_str(&format!("{}{} & {} & \\\\ \\hline\n", name, cosup, dates));
                    minipage.push_str(&format!("\\bfseries{{{}{} \\hfill {}}}\n", name, cosup, dates));
                }
            },
            Degree::Ug | Degree::Meng => {
                out.table.push_str(&format!("{}{} & {} & {} \\\\ \\hline\n", name, cosup, title, dates));
                // MEng rows carry no program column
                let program = if program.is_empty() { "ECE".to_string() } else { program };
                minipage.push_str(&format!(
                    "{{\\bfseries{{{}{}, {} \\hfill {}}}}}",
                    name, cosup, program, dates
                ));
                if title.is_empty() {
                    minipage.push('\n');
                } else {
                    minipage.push_str(&format!("\\\\\n{{Project: {}}}\n", title));
                }
            }
            Degree::Phd | Degree::Ms => {
                match &position {
                    Some(pos) => out.table.push_str(&format!(
                        "{}{} & {} & \\makecell[l]{{{} \\\\ {}}}\\\\ \\hline\n",
                        name, cosup, title, dates, pos
                    )),
                    None => out
                        .table
                        .push_str(&format!("{}{} & {} & {} \\\\ \\hline\n", name, cosup, title, dates)),
                }
                let program = if program.is_empty() {
                    String::new()
                } else {
                    format!(", {}", program)
                };
                minipage.push_str(&format!("{{\\bfseries{{{}{}{} \\hfill {}}}}}", name, cosup, program, dates));
                if title.is_empty() {
                    minipage.push('\n');
                } else {
                    minipage.push_str(&format!("\\\\\n{{Thesis: {}}}\n", title));
                    if degree == Degree::Phd {
                        match (student.opt(EXTERNAL_EXAMINER), &position) {
                            (Some(examiner), Some(pos)) => minipage.push_str(&format!(
                                "\\\\\nExternal Examiner: {}, Current Position: {}\n",
                                latex_format(examiner),
                                pos
                            )),
                            (Some(examiner), None) => minipage
                                .push_str(&format!("\\\\\nExternal Examiner: {}\n", latex_format(examiner))),
                            (None, Some(pos)) => {
                                minipage.push_str(&format!("\\\\\nCurrent Position: {}\n", pos))
                            }
                            (None, None) => {}
                        }
                    } else {
                        let later = student
                            .opt(&Degree::Phd.keys().last_position)
                            .map(latex_format)
                            .or_else(|| position.clone());
                        if let Some(pos) = later {
                            minipage.push_str(&format!("\\\\\nCurrent Position: {}\n", pos));
                        }
                    }
                }
            }
        }
        let gap = if !title.is_empty() || position.is_some() { "6pt" } else { "4pt" };
        minipage.push_str(&format!("\\vspace{{{}}}\n\\end{{minipage}}\n", gap));
        out.new_table.push_str(&minipage);
    }
    out.table.push_str("\\end{longtable}");
    Ok(out)
}

/// `\footnotetext` lines for co-supervisors, each followed by a counter step
pub fn render_phd_footnotes(cosups: &[String]) -> String {
    cosups
        .iter()
        .map(|c| format!("\\footnotetext{{Co-supervised with {}.}}\n\\stepcounter{{footnote}}\n", latex_format(c)))
        .collect()
}

/// Footnotes for co-supervisors first seen in the MS table, counter steps between them
pub fn render_ms_footnotes(new_cosups: &[String]) -> String {
    new_cosups
        .iter()
        .map(|c| format!("\\footnotetext{{Co-supervised with {}.}}\n", latex_format(c)))
        .collect::<Vec<_>>()
        .join("\\stepcounter{footnote}\n")
}

/// Every LaTeX output of the students command
#[derive(Debug, Default)]
pub struct LatexOutputs {
    pub tables: HashMap<Degree, DegreeTable>,
    pub phd_footnotes: String,
    pub ms_footnotes: String,
    pub stats: String,
}

pub fn render_latex(students: &[Record]) -> Result<LatexOutputs> {
    let mut cosups = Vec::new();
    let mut out = LatexOutputs::default();
    for degree in TABLE_ORDER {
        let before = cosups.len();
        let table = render_table(students, degree, &mut cosups)?;
        debug!(
            "{} table: {} completed, {} current",
            degree.prefix(),
            table.completed,
            table.current
        );
        match degree {
            Degree::Phd => out.phd_footnotes = render_phd_footnotes(&cosups),
            Degree::Ms => out.ms_footnotes = render_ms_footnotes(&cosups[before..]),
            _ => {}
        }
        out.tables.insert(degree, table);
    }

    let count = |degree: Degree| out.tables.get(&degree).map(|t| (t.completed, t.current)).unwrap_or_default();
    let mut stats = String::new();
    for (degree, name) in [
        (Degree::Phd, "phd"),
        (Degree::Ms, "ms"),
        (Degree::Pdf, "pdf"),
        (Degree::Meng, "meng"),
    ] {
        let (completed, current) = count(degree);
        stats.push_str(&format!("\\newcommand{{\\numcompleted{}}}{{{}}}\n", name, completed));
        stats.push_str(&format!("\\newcommand{{\\numcurrent{}}}{{{}}}\n", name, current));
    }
    let (past_ug, current_ug) = count(Degree::Ug);
    stats.push_str(&format!("\\newcommand{{\\numpastug}}{{{}}}\n", past_ug));
    stats.push_str(&format!("\\newcommand{{\\numcurrentug}}{{{}}}\n", current_ug));
    out.stats = stats;
    Ok(out)
}

/// Students filed by degree: one current bucket per student, a past bucket per finished degree
#[derive(Debug, Default, Clone)]
pub struct Buckets {
    current: HashMap<Degree, Vec<Record>>,
    past: HashMap<Degree, Vec<Record>>,
}

impl Buckets {
    pub fn new(students: &[Record]) -> Self {
        let mut buckets = Self::default();
        for student in students {
            if let Some(degree) = current_degree(student) {
                buckets.current.entry(degree).or_default().push(student.clone());
            }
            for degree in Degree::PRECEDENCE {
                if student.present(&degree.keys().end) {
                    buckets.past.entry(degree).or_default().push(student.clone());
                }
            }
        }
        buckets
    }

    pub fn get(&self, status: Status, degree: Degree) -> &[Record] {
        let map = match status {
            Status::Current => &self.current,
            Status::Completed => &self.past,
        };
        map.get(&degree).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Oldest start first, ties by last name
    fn current_sorted(&self, degree: Degree) -> Result<Vec<Record>> {
        let mut rows = self.get(Status::Current, degree).to_vec();
        sort_students(&mut rows, |a, b| {
            Ok(start_date(a, degree)?
                .cmp(&start_date(b, degree)?)
                .then_with(|| by_last_name(a, b)))
        })?;
        Ok(rows)
    }

    /// Latest end first, ties by last name
    fn past_sorted(&self, degree: Degree) -> Result<Vec<Record>> {
        let mut rows = self.get(Status::Completed, degree).to_vec();
        sort_students(&mut rows, |a, b| {
            Ok(end_date(b, degree)?
                .cmp(&end_date(a, degree)?)
                .then_with(|| by_last_name(a, b)))
        })?;
        Ok(rows)
    }
}

fn html_name(student: &Record) -> String {
    let name = html_escape(&format!(
        "{} {}",
        student.trimmed(FIRST_NAME),
        student.trimmed(LAST_NAME)
    ));
    match student.opt(HOME_PAGE) {
        Some(home) => format!("<a href=\"{}\">{}</a>", html_escape(home.trim()), name),
        None => name,
    }
}

/// ` (a, b)` from the non-empty parts, or nothing
fn details(parts: &[String]) -> String {
    let parts: Vec<&str> = parts.iter().map(String::as_str).filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn html_cosup(student: &Record, degree: Degree) -> String {
    student
        .opt(&degree.keys().co_supervisor)
        .map(|c| format!("Co-supervised with {}", html_escape(c.trim())))
        .unwrap_or_default()
}

fn html_program(student: &Record, degree: Degree) -> String {
    html_escape(student.trimmed(&degree.keys().program))
}

fn html_thesis(student: &Record, degree: Degree) -> String {
    let keys = degree.keys();
    match (student.opt(&keys.thesis), student.opt(&keys.thesis_url)) {
        (Some(thesis), Some(url)) => format!(
            "<a href=\"{}\">{}</a>",
            html_escape(url.trim()),
            html_escape(thesis.trim())
        ),
        (Some(thesis), None) => html_escape(thesis.trim()),
        _ => String::new(),
    }
}

fn html_end(student: &Record, degree: Degree) -> Result<String> {
    let end = end_date(student, degree)?
        .map(|d| d.year().to_string())
        .unwrap_or_default();
    let position = student
        .opt(&degree.keys().last_position)
        .map(|p| format!(". Last known position: {}", html_escape(p.trim())))
        .unwrap_or_default();
    Ok(format!("{}{}.", end, position))
}

pub fn render_html(buckets: &Buckets) -> Result<String> {
    let mut html = String::from(HTML_OPEN);

    let current = [
        (Degree::Pdf, "Post-Doctoral Fellows"),
        (Degree::Phd, "PhD Students"),
        (Degree::Ms, "Master's Students"),
        (Degree::Ug, "Undergraduate Students and Research Interns"),
    ];
    for (degree, heading) in current {
        let rows = buckets.current_sorted(degree)?;
        if rows.is_empty() {
            continue;
        }
        html.push_str(&format!("<h3>{}</h3>\n<ul>\n", html_escape(heading)));
        for student in &rows {
            let parts = match degree {
                Degree::Pdf => vec![html_cosup(student, degree)],
                Degree::Ug => vec![html_program(student, degree)],
                _ => vec![html_program(student, degree), html_cosup(student, degree)],
            };
            html.push_str(&format!("<li>{}{}</li>\n", html_name(student), details(&parts)));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<h3>Alumni</h3>\n");
    let past = [
        (Degree::Pdf, "Post-Doctoral Fellows"),
        (Degree::Phd, "PhD Students"),
        (Degree::Ms, "Master's Students"),
    ];
    for (degree, heading) in past {
        let rows = buckets.past_sorted(degree)?;
        if rows.is_empty() {
            continue;
        }
        html.push_str(&format!("<h4>{}</h4>\n<ul>\n", html_escape(heading)));
        for student in &rows {
            let end = html_end(student, degree)?;
            let line = if degree == Degree::Pdf {
                format!("<li>{}, {}</li>\n", html_name(student), end)
            } else {
                format!(
                    "<li>{}{}: {}, {}</li>\n",
                    html_name(student),
                    details(&[html_program(student, degree)]),
                    html_thesis(student, degree),
                    end
                )
            };
            html.push_str(&line);
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</div></div>");
    Ok(html)
}

/// Settings for the CCV supervision records
#[derive(Debug, Clone)]
pub struct CcvOptions {
    /// Completed supervisions older than this many years are left out; 0 keeps all
    pub ccv_years: i32,
    pub default_institution: String,
    pub today: NaiveDate,
}

fn degree_type(degree: Degree) -> Lov {
    match degree {
        Degree::Ug => lov::BACHELORS,
        Degree::Ms => lov::MASTERS_THESIS,
        Degree::Meng => lov::MASTERS_NON_THESIS,
        Degree::Phd => lov::DOCTORATE,
        Degree::Pdf => lov::POST_DOCTORATE,
    }
}

/// The later of start plus the usual degree length and a year from today
pub fn anticipated_completion(start: NaiveDate, degree: Degree, today: NaiveDate) -> NaiveDate {
    add_years(start, degree.length_years()).max(add_years(today, 1))
}

fn present_position(student: &Record, degree: Degree, status: Status) -> String {
    if let Some(position) = student.opt(&degree.keys().last_position) {
        return ccv_text(position);
    }
    match (degree, status) {
        (Degree::Phd, _) => "Doctoral candidate in my group",
        (Degree::Ms, _) => "Masters candidate in my group",
        (_, Status::Current) => "Student in my group",
        (_, Status::Completed) => "Unknown",
    }
    .to_string()
}

fn write_supervision(
    ccv: &mut CcvWriter,
    student: &Record,
    degree: Degree,
    status: Status,
    options: &CcvOptions,
) -> Result<()> {
    let keys = degree.keys();
    let start = if student.present(&keys.start) {
        Some(start_date(student, degree)?)
    } else {
        warn!(
            "{} {} has no {} start date",
            student.get(FIRST_NAME),
            student.get(LAST_NAME),
            degree.prefix()
        );
        None
    };
    let end = match (end_date(student, degree)?, start) {
        (Some(end), _) => Some(end),
        (None, Some(start)) => Some(anticipated_completion(start, degree, options.today)),
        (None, None) => None,
    };
    let role = if student.present(&keys.co_supervisor) {
        lov::CO_SUPERVISOR
    } else {
        lov::PRINCIPAL_SUPERVISOR
    };
    let name = format!("{} {}", ccv_text(student.get(FIRST_NAME)), ccv_text(student.get(LAST_NAME)));
    let institution = match student.opt(INSTITUTION) {
        Some(institution) => ccv_text(institution),
        None => options.default_institution.clone(),
    };
    let degree_status = match status {
        Status::Current => lov::DEGREE_IN_PROGRESS,
        Status::Completed => lov::DEGREE_COMPLETED,
    };
    let thesis = match student.opt(&keys.thesis) {
        Some(thesis) => ccv_text(thesis),
        None if degree == Degree::Pdf => "None".to_string(),
        None => "TBD".to_string(),
    };

    ccv.open_record(sections::STUDENT_SUPERVISION);
    ccv.field_lov("78a3e68f1ab74f31b9284c2acdb70739", "Supervision Role", Some(role));
    ccv.field(
        "19964df0a8524f2bb44d5eb53729f9cc",
        "Supervision Start Date",
        Value::YearMonth(&start.map(year_month).unwrap_or_default()),
    );
    ccv.field(
        "bd3619f7970441dc83ada1d2fdbf0780",
        "Supervision End Date",
        Value::YearMonth(&end.map(year_month).unwrap_or_default()),
    );
    ccv.field("3c504aafda28418ea439d8f92c28aef0", "Student Name", Value::String(&name));
    ccv.field("e36ccf9a00a241dc942e608df32c8c84", "Student Institution", Value::String(&institution));
    ccv.field_empty("bb322e0195b540779bf4bdb4f1a04210", "Student Canadian Residency Status");
    ccv.field_lov(
        "5b8638e8646448dcb8edef2c21e01c87",
        "Degree Type or Postdoctoral Status",
        Some(degree_type(degree)),
    );
    ccv.field_lov("e5d331dca0fc4000992e43b695b2db21", "Student Degree Status", Some(degree_status));
    ccv.field("3cf3d0de12f44222b941fdbf57ad51a6", "Student Degree Start Date", Value::YearMonth(""));
    ccv.field("8284dbdd03aa4277b7fca7662bd1758c", "Student Degree Received Date", Value::YearMonth(""));
    ccv.field("ab1293e2fee8472481457d4f8493c7f1", "Student Degree Expected Date", Value::YearMonth(""));
    ccv.field("420e5bbd57104c3c9823b5e6850ee6f8", "Thesis/Project Title", Value::String(&thesis));
    ccv.field("804797ed2fe54da88f326743e38e270e", "Project Description", Value::Bilingual);
    ccv.field(
        "0f2f1601c24144308e0966d75b781db9",
        "Present Position",
        Value::String(&present_position(student, degree, status)),
    );
    ccv.field("8789e49ef39b4249aa53d414045ebfd2", "Degree Name", Value::Bilingual);
    ccv.field("17957ada91964db18a3b0526f5b4e341", "Specialization", Value::Bilingual);
    ccv.field("c20e3ae276a2429d888ae8e16216182f", "Present Organization", Value::String(""));
    ccv.close_section();
    Ok(())
}

/// Supervisory Activities document; returns the XML and the number of records left out
pub fn render_ccv(buckets: &Buckets, options: &CcvOptions, mut ccv: CcvWriter) -> Result<(String, usize)> {
    let mut skipped = 0;
    ccv.open_section(sections::ACTIVITIES);
    ccv.open_section(sections::SUPERVISORY_ACTIVITIES);
    for status in [Status::Current, Status::Completed] {
        for degree in Degree::PRECEDENCE {
            for student in buckets.get(status, degree) {
                if status == Status::Completed && options.ccv_years > 0 {
                    if let Some(end) = end_date(student, degree)? {
                        if options.today.year() - end.year() > options.ccv_years {
                            skipped += 1;
                            continue;
                        }
                    }
                }
                write_supervision(&mut ccv, student, degree, status, options)?;
            }
        }
    }
    Ok((ccv.finish(), skipped))
}

pub async fn run(args: &StudentsArgs, config: &Config, writer: &mut OutputWriter) -> Result<RunStats> {
    let table = load_csv(&args.file).await?;
    log_input_loaded(&args.file, table.len());
    for student in table.iter() {
        log_record("student", student);
    }

    let latex = render_latex(&table.records)?;
    let buckets = Buckets::new(&table.records);
    let html = render_html(&buckets)?;
    let options = CcvOptions {
        ccv_years: args.ccv_years.unwrap_or(config.ccv_years),
        default_institution: config.default_institution.clone(),
        today: chrono::Local::now().date_naive(),
    };
    let (xml, skipped) = render_ccv(&buckets, &options, CcvWriter::now())?;

    let table_paths = [
        (Degree::Phd, &args.phd_tex),
        (Degree::Ms, &args.ms_tex),
        (Degree::Pdf, &args.pdf_tex),
        (Degree::Meng, &args.meng_tex),
        (Degree::Ug, &args.ug_tex),
    ];
    for (degree, name) in table_paths {
        let Some(tables) = latex.tables.get(&degree) else {
            continue;
        };
        let path = writer.resolve(name);
        writer.write(&path, &tables.table).await?;
        writer.write(&prefix_new(&path), &tables.new_table).await?;
    }
    let path = writer.resolve(&args.phd_footnote_tex);
    writer.write(&path, &latex.phd_footnotes).await?;
    let path = writer.resolve(&args.ms_footnote_tex);
    writer.write(&path, &latex.ms_footnotes).await?;
    let path = writer.resolve(&args.stats_tex);
    writer.write(&path, &latex.stats).await?;
    let path = writer.resolve(&args.html);
    writer.write(&path, &html).await?;
    let path = writer.resolve(&args.xml);
    writer.write(&path, &xml).await?;

    let unfiled = table
        .iter()
        .filter(|s| Degree::PRECEDENCE.iter().all(|d| !s.present(&d.keys().start)))
        .count();
    Ok(RunStats {
        processed: table.len() - unfiled,
        skipped: unfiled + skipped,
    })
}

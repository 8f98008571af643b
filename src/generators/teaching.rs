//! Courses taught, split into graduate and undergraduate tables

use crate::cli::TeachingArgs;
use crate::error::Result;
use crate::generators::RunStats;
use crate::models::{load_csv, Record};
use crate::services::OutputWriter;
use crate::utils::logging::log_input_loaded;
use crate::utils::text::latex_format;

const YEAR: &str = "Year";
const CODE: &str = "Code";
const TITLE: &str = "Title";
const ENROLLMENT: &str = "Enrollment";
const TYPE: &str = "Type";

/// Rows of one course type, most recent year first
pub fn courses_of_type<'a>(courses: &'a [Record], course_type: &str) -> Vec<&'a Record> {
    let mut selected: Vec<&Record> = courses
        .iter()
        .filter(|course| course.trimmed(TYPE) == course_type)
        .collect();
    // stable: same-year courses keep file order
    selected.sort_by(|a, b| b.get(YEAR).cmp(a.get(YEAR)));
    selected
}

/// `classtab` environment for a list of courses
pub fn render_classtab(courses: &[&Record]) -> String {
    let mut tex = String::from("\\begin{classtab}\n");
    for course in courses {
        tex.push_str(&format!(
            "{} & {} & {} & {} \\\\ \n",
            course.trimmed(YEAR),
            latex_format(course.get(CODE)),
            latex_format(course.get(TITLE)),
            course.trimmed(ENROLLMENT)
        ));
    }
    tex.push_str("\\end{classtab}\n");
    tex
}

pub async fn run(args: &TeachingArgs, writer: &mut OutputWriter) -> Result<RunStats> {
    let table = load_csv(&args.file).await?;
    log_input_loaded(&args.file, table.len());

    let grad = courses_of_type(&table.records, "Grad");
    let ug = courses_of_type(&table.records, "UG");

    let grad_path = writer.resolve(&args.grad_tex);
    writer.write(&grad_path, &render_classtab(&grad)).await?;
    let ug_path = writer.resolve(&args.ug_tex);
    writer.write(&ug_path, &render_classtab(&ug)).await?;

    let processed = grad.len() + ug.len();
    Ok(RunStats {
        processed,
        skipped: table.len() - processed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(year: &str, code: &str, kind: &str) -> Record {
        Record::from_pairs([
            (YEAR, year),
            (CODE, code),
            (TITLE, "Computer Security"),
            (ENROLLMENT, "120"),
            (TYPE, kind),
        ])
    }

    #[test]
    fn filters_and_sorts_descending() {
        let rows = vec![
            course("2018", "ECE568", "UG"),
            course("2020", "ECE1776", " Grad "),
            course("2021", "ECE353", "UG"),
            course("2018", "ECE344", "UG"),
            course("2019", "ECE1724", "Seminar"),
        ];
        let ug = courses_of_type(&rows, "UG");
        let codes: Vec<&str> = ug.iter().map(|c| c.get(CODE)).collect();
        assert_eq!(codes, vec!["ECE353", "ECE568", "ECE344"]);
        assert_eq!(courses_of_type(&rows, "Grad").len(), 1);
    }

    #[test]
    fn classtab_rows() {
        let rows = vec![course("2020", "ECE_568", "UG")];
        let tex = render_classtab(&courses_of_type(&rows, "UG"));
        assert_eq!(
            tex,
            "\\begin{classtab}\n2020 & ECE\\_568 & Computer Security & 120 \\\\ \n\\end{classtab}\n"
        );
        assert_eq!(render_classtab(&[]), "\\begin{classtab}\n\\end{classtab}\n");
    }
}

//! Expert witness cases

use crate::cli::CasesArgs;
use crate::error::Result;
use crate::generators::RunStats;
use crate::models::{load_csv, Record};
use crate::services::OutputWriter;
use crate::utils::logging::{log_input_loaded, log_record};
use crate::utils::text::latex_format;

const TITLE: &str = "title";
const PLAINTIFF: &str = "plaintiff";
const DEFENDANT: &str = "defendant";
const ROLE: &str = "role";
const JURISDICTION: &str = "jurisdiction";
const CASE: &str = "case";
const YEAR: &str = "year";

/// One case as a LaTeX minipage
pub fn render_case(case: &Record) -> String {
    let mut parties = String::new();
    if case.present(PLAINTIFF) && case.present(DEFENDANT) {
        parties = format!(
            "{} v. {}",
            latex_format(case.get(PLAINTIFF)),
            latex_format(case.get(DEFENDANT))
        );
    }

    let mut line = format!(
        "\\textit{{{}{}}}, Expert {}",
        latex_format(case.get(TITLE)),
        parties,
        latex_format(case.get(ROLE))
    );
    if case.present(JURISDICTION) {
        line.push_str(&format!(", {}", latex_format(case.get(JURISDICTION))));
    }
    if case.present(CASE) {
        line.push_str(&format!(", Case no. {}", latex_format(case.get(CASE))));
    }
    if case.present(YEAR) {
        line.push_str(&format!(", {}", case.trimmed(YEAR)));
    }

    format!("\\begin{{minipage}}{{\\linewidth}}\n{}.\n\\vspace{{6pt}}\n\\end{{minipage}}\n", line)
}

pub async fn run(args: &CasesArgs, writer: &mut OutputWriter) -> Result<RunStats> {
    let cases = load_csv(&args.file).await?;
    log_input_loaded(&args.file, cases.len());

    let mut tex = String::new();
    for case in cases.iter() {
        log_record("case", case);
        tex.push_str(&render_case(case));
    }

    let path = writer.resolve(&args.tex_out);
    writer.write(&path, &tex).await?;

    Ok(RunStats {
        processed: cases.len(),
        skipped: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_case() {
        let case = Record::from_pairs([
            (TITLE, ""),
            (PLAINTIFF, "Acme Corp."),
            (DEFENDANT, "Widgets & Co."),
            (ROLE, "Witness"),
            (JURISDICTION, "Ontario Superior Court"),
            (CASE, "CV-12-345"),
            (YEAR, "2019"),
        ]);
        assert_eq!(
            render_case(&case),
            "\\begin{minipage}{\\linewidth}\n\
             \\textit{Acme Corp. v. Widgets \\& Co.}, Expert Witness, Ontario Superior Court, Case no. CV-12-345, 2019.\n\
             \\vspace{6pt}\n\\end{minipage}\n"
        );
    }

    #[test]
    fn one_party_and_no_optional_fields() {
        let case = Record::from_pairs([
            (TITLE, "In re Patent"),
            (PLAINTIFF, "Acme"),
            (DEFENDANT, ""),
            (ROLE, "Consultant"),
        ]);
        let tex = render_case(&case);
        assert!(tex.contains("\\textit{In re Patent}, Expert Consultant.\n"));
        assert!(!tex.contains(" v. "));
    }
}

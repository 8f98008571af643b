//! Research funding: LaTeX list, totals and CCV funding history

use crate::ccv::{lov, sections, CcvWriter, Lov, Value};
use crate::cli::FundingArgs;
use crate::error::{CvError, Result};
use crate::generators::RunStats;
use crate::models::{load_csv, Record};
use crate::services::OutputWriter;
use crate::utils::dates::{parse_date, year_month};
use crate::utils::logging::{log_input_loaded, log_record};
use crate::utils::text::{ccv_text, latex_format, thousands};
use regex::Regex;
use std::sync::LazyLock;

pub const YEAR: &str = "year";
pub const STATUS: &str = "status";
pub const TITLE: &str = "title";
pub const SPONSOR: &str = "sponsor";
pub const TOTAL_AMOUNT: &str = "total_amount";
pub const CURRENCY: &str = "currency";
pub const CO_PIS: &str = "co_pis";
pub const SHARE: &str = "share";
pub const TYPE: &str = "type";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const ORGANIZATION: &str = "organization";
pub const PROGRAM: &str = "program";
pub const REF_NUMBER: &str = "ref_number";
pub const PI: &str = "pi";
pub const COMPETITIVE: &str = "competitive";

static YEAR_RANGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)-(\d+)").expect("valid regex"));
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\(\[].*?[\)\]]").expect("valid regex"));

/// One fund as a LaTeX minipage
pub fn render_fund(fund: &Record) -> String {
    let mut line = format!(
        "\\textbf{{{}}}, \\textit{{{}}}, {}, \\textit{{\\${}}}",
        latex_format(fund.get(STATUS)),
        latex_format(fund.get(TITLE)),
        latex_format(fund.get(SPONSOR)),
        latex_format(fund.get(TOTAL_AMOUNT))
    );
    if fund.present(CURRENCY) {
        line.push_str(&format!(" \\textit{{({})}}", latex_format(fund.get(CURRENCY))));
    }
    let year = latex_format(fund.get(YEAR));
    line.push_str(&format!(", {}", YEAR_RANGE.replace_all(&year, "$1--$2")));
    if fund.present(CO_PIS) {
        line.push_str(&format!(". Collaborators: {}", latex_format(fund.get(CO_PIS))));
    }
    format!(
        "\\begin{{minipage}}{{\\linewidth}}\n{}.\n\\vspace{{6pt}}\n\\end{{minipage}}\n",
        line
    )
}

/// `total_amount` as an integer; thousands separators are allowed
pub fn parse_amount(value: &str) -> Result<i64> {
    value
        .trim()
        .replace(',', "")
        .parse()
        .map_err(|_| CvError::Number {
            value: value.to_string(),
        })
}

/// `\numoffunds` and `\totalfunds` definitions
pub fn render_totals(funds: &[Record]) -> Result<String> {
    let mut total = 0i64;
    for fund in funds {
        let amount = fund.get(TOTAL_AMOUNT);
        total = total
            .checked_add(parse_amount(amount)?)
            .ok_or_else(|| CvError::Number {
                value: amount.to_string(),
            })?;
    }
    Ok(format!(
        "\\newcommand{{\\numoffunds}}{{{}}}\n\\newcommand{{\\totalfunds}}{{\\${}}}\n",
        funds.len(),
        thousands(total)
    ))
}

/// Co-PI names: up to the first `;`, bracketed notes removed, split on `,`
pub fn co_pi_names(fund: &Record) -> Vec<String> {
    if !fund.present(CO_PIS) {
        return Vec::new();
    }
    let names = fund.get(CO_PIS).split(';').next().unwrap_or_default();
    BRACKETED
        .replace_all(names, "")
        .split(',')
        .map(ccv_text)
        .filter(|name| !name.is_empty())
        .collect()
}

fn funding_type(fund: &Record) -> Result<Lov> {
    lov::funding_type(fund.get(TYPE)).ok_or_else(|| CvError::unknown("funding type", fund.get(TYPE)))
}

fn funding_role(fund: &Record) -> Result<Lov> {
    let status = fund.get(STATUS);
    if status.starts_with("PI") {
        Ok(lov::PRINCIPAL_INVESTIGATOR)
    } else if status.starts_with("Co-PI") {
        Ok(lov::CO_INVESTIGATOR)
    } else {
        Err(CvError::unknown("funding role", status))
    }
}

/// `yyyy/MM` when the column parses as a date, the trimmed text otherwise
fn funding_date(value: &str) -> String {
    match parse_date(value) {
        Ok(date) => year_month(date),
        Err(_) => ccv_text(value),
    }
}

/// Funding organisation LOV and the free-text fallback
fn organization(fund: &Record) -> (Option<Lov>, String) {
    if fund.present(ORGANIZATION) {
        match lov::funding_organization(fund.get(ORGANIZATION)) {
            Some(known) => (Some(known), String::new()),
            None => (None, ccv_text(fund.get(ORGANIZATION))),
        }
    } else {
        (None, ccv_text(fund.get(SPONSOR)))
    }
}

fn write_fund(ccv: &mut CcvWriter, fund: &Record) -> Result<()> {
    let fund_type = funding_type(fund)?;
    let role = funding_role(fund)?;
    let start = funding_date(fund.get(START_DATE));
    let end = funding_date(fund.get(END_DATE));
    let total = ccv_text(fund.get(TOTAL_AMOUNT));
    let share = if fund.present(SHARE) {
        ccv_text(fund.get(SHARE))
    } else {
        total.clone()
    };
    let pi = ccv_text(fund.get(PI));

    ccv.open_record(sections::RESEARCH_FUNDING_HISTORY);
    ccv.field_lov("931b92a5ffed4e5aa9c7b3a0afd5f8ba", "Funding Type", Some(fund_type));
    ccv.field("9c1db4674334436ca891b7b8a9e114bd", "Funding Start Date", Value::YearMonth(&start));
    ccv.field("b63179ab0f0e4c9eaa7e9a8130d60ee3", "Funding End Date", Value::YearMonth(&end));
    ccv.field(
        "735545eb499e4cc6a949b4b375a804e8",
        "Funding Title",
        Value::String(&ccv_text(fund.get(TITLE))),
    );
    ccv.field_empty("c8e3451d1e3a405bb1e8aa0ebeb66c8d", "Grant Type");
    ccv.field("0674312de78f4647aba3bf202a41d58e", "Project Description", Value::Bilingual);
    ccv.field_empty("f7bfa6e647fd48cf8d404263df5843b1", "Clinical Research Project?");
    ccv.field_lov(
        "0991ead151e3445ca7537aa15acbec57",
        "Funding Status",
        Some(lov::FUNDING_STATUS_AWARDED),
    );
    ccv.field_lov("7496de092dc84038a1881e8f9d77e713", "Funding Role", Some(role));
    ccv.field("32ce1c0c194447c19c6847b1915d35f1", "Research Uptake", Value::Bilingual);

    ccv.open_record(sections::FUNDING_SOURCES);
    let (org, other_org) = organization(fund);
    ccv.field_lov("67e083b070954e91bcbb1cc70131145a", "Funding Organization", org);
    ccv.field(
        "1bdead14642545f3971a59997d82da67",
        "Other Funding Organization",
        Value::String(&other_org),
    );
    ccv.field(
        "97231512141a452a82151cc162e9a59c",
        "Program Name",
        Value::String(&ccv_text(fund.get(PROGRAM))),
    );
    ccv.field(
        "3fb9015d879f435d937ae9aa7ccd2973",
        "Funding Reference Number",
        Value::String(&ccv_text(fund.get(REF_NUMBER))),
    );
    ccv.field("dfe6a0b34347486aaa677f07306a141e", "Total Funding", Value::Number(&total));
    ccv.field_empty("4775aa8f2a3f4f5083dd1c816462f260", "Currency of Total Funding");
    ccv.field(
        "882a94c7548744ca992e2647346d2e14",
        "Portion of Funding Received",
        Value::Number(&share),
    );
    ccv.field_empty("a445f692a0d54760bcf2ed9c8a829eff", "Funding Renewable?");
    ccv.field_lov(
        "00efdc7e790a48ac8675696c66afc3ad",
        "Funding Competitive?",
        Some(lov::yes_no(fund.get(COMPETITIVE) != "No")),
    );
    ccv.field("d62313c1cdb9419caf79014f07e1cfe0", "Funding Start Date", Value::YearMonth(&start));
    ccv.field("efc68e7d74f849eebb59f9a3bb85e5db", "Funding End Date", Value::YearMonth(&end));
    ccv.close_section();

    for name in co_pi_names(fund) {
        ccv.open_record(sections::OTHER_INVESTIGATORS);
        ccv.field("ddd551dfb26344fbb17f07afcffc94ed", "Investigator Name", Value::String(&name));
        let role = if name == pi {
            lov::PRINCIPAL_INVESTIGATOR
        } else {
            lov::CO_INVESTIGATOR
        };
        ccv.field_lov("13806a6772d248158619261afaab2fe0", "Role", Some(role));
        ccv.close_section();
    }

    ccv.close_section();
    Ok(())
}

/// Research Funding History document; returns the XML and the number of funds left out
pub fn render_ccv(funds: &[Record], mut ccv: CcvWriter) -> Result<(String, usize)> {
    let mut skipped = 0;
    for fund in funds {
        if !(fund.present(START_DATE) && fund.present(END_DATE) && fund.present(TITLE)) {
            skipped += 1;
            continue;
        }
        write_fund(&mut ccv, fund)?;
    }
    Ok((ccv.finish(), skipped))
}

pub async fn run(args: &FundingArgs, writer: &mut OutputWriter) -> Result<RunStats> {
    let table = load_csv(&args.file).await?;
    log_input_loaded(&args.file, table.len());

    let mut tex = String::new();
    for fund in table.iter() {
        log_record("fund", fund);
        tex.push_str(&render_fund(fund));
    }
    let totals = render_totals(&table.records)?;
    let (xml, skipped) = render_ccv(&table.records, CcvWriter::now())?;

    let path = writer.resolve(&args.tex_out);
    writer.write(&path, &tex).await?;
    let path = writer.resolve(&args.total_tex_out);
    writer.write(&path, &totals).await?;
    let path = writer.resolve(&args.xml);
    writer.write(&path, &xml).await?;

    Ok(RunStats {
        processed: table.len() - skipped,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fund() -> Record {
        Record::from_pairs([
            (YEAR, "2018-2023"),
            (STATUS, "PI"),
            (TITLE, "Secure Systems"),
            (SPONSOR, "NSERC Discovery"),
            (TOTAL_AMOUNT, "150,000"),
            (CURRENCY, ""),
            (CO_PIS, ""),
            (SHARE, ""),
            (TYPE, "Grant"),
            (START_DATE, "2018-04-01"),
            (END_DATE, "2023-03-31"),
            (ORGANIZATION, "NSERC"),
            (PROGRAM, "Discovery"),
            (REF_NUMBER, "RGPIN-1234"),
            (PI, "David Lie"),
            (COMPETITIVE, ""),
        ])
    }

    fn writer() -> CcvWriter {
        CcvWriter::new(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn latex_entry() {
        let mut f = fund();
        f.set(CURRENCY, "USD");
        f.set(CO_PIS, "A. Smith (MIT)");
        assert_eq!(
            render_fund(&f),
            "\\begin{minipage}{\\linewidth}\n\
             \\textbf{PI}, \\textit{Secure Systems}, NSERC Discovery, \\textit{\\$150,000} \\textit{(USD)}, 2018--2023. Collaborators: A. Smith (MIT).\n\
             \\vspace{6pt}\n\\end{minipage}\n"
        );
    }

    #[test]
    fn totals_sum_amounts() {
        let mut second = fund();
        second.set(TOTAL_AMOUNT, "2,350,000");
        let tex = render_totals(&[fund(), second]).unwrap();
        assert_eq!(
            tex,
            "\\newcommand{\\numoffunds}{2}\n\\newcommand{\\totalfunds}{\\$2,500,000}\n"
        );
    }

    #[test]
    fn bad_amount_is_an_error() {
        let mut f = fund();
        f.set(TOTAL_AMOUNT, "about 5k");
        assert!(matches!(render_totals(&[f]), Err(CvError::Number { .. })));
    }

    #[test]
    fn total_overflow_is_an_error() {
        let mut big = fund();
        big.set(TOTAL_AMOUNT, i64::MAX.to_string());
        assert!(matches!(render_totals(&[big, fund()]), Err(CvError::Number { .. })));
    }

    #[test]
    fn co_pis_are_cleaned() {
        let mut f = fund();
        f.set(CO_PIS, "Jane Doe (UofT), John Roe [Waterloo]; others (various)");
        assert_eq!(co_pi_names(&f), vec!["Jane Doe", "John Roe"]);
        assert!(co_pi_names(&fund()).is_empty());
    }

    #[test]
    fn ccv_known_organization_and_investigators() {
        let mut f = fund();
        f.set(CO_PIS, "David Lie, Jane Doe (UofT)");
        let (xml, skipped) = render_ccv(&[f], writer()).unwrap();
        assert_eq!(skipped, 0);
        assert!(xml.contains("<lov id=\"00000000000000000000000014012321\">"));
        assert!(xml.contains("<value format=\"yyyy/MM\" type=\"YearMonth\">2018/04</value>"));
        assert!(xml.contains("<value type=\"Number\">150000</value>"));
        assert_eq!(xml.matches("label=\"Other Investigators\"").count(), 2);
        assert_eq!(xml.matches("Principal Investigator</lov>").count(), 2);
        assert!(xml.contains("<lov id=\"00000000000000000000000000000400\">Yes</lov>"));
        assert_eq!(xml.matches("<section").count(), xml.matches("</section>").count());
    }

    #[test]
    fn ccv_unknown_organization_falls_back_to_text() {
        let mut f = fund();
        f.set(ORGANIZATION, "");
        f.set(SPONSOR, "Acme Foundation");
        f.set(COMPETITIVE, "No");
        let (xml, _) = render_ccv(&[f], writer()).unwrap();
        assert!(xml.contains("<field id=\"67e083b070954e91bcbb1cc70131145a\" label=\"Funding Organization\"/>"));
        assert!(xml.contains("<value type=\"String\">Acme Foundation</value>"));
        assert!(xml.contains("<lov id=\"00000000000000000000000000000401\">No</lov>"));
    }

    #[test]
    fn ccv_skips_undated_and_rejects_unknown_values() {
        let mut undated = fund();
        undated.set(START_DATE, "");
        let (xml, skipped) = render_ccv(&[undated], writer()).unwrap();
        assert_eq!(skipped, 1);
        assert!(!xml.contains("Research Funding History"));

        let mut gift = fund();
        gift.set(TYPE, "Gift");
        assert!(matches!(render_ccv(&[gift], writer()), Err(CvError::UnknownValue { .. })));

        let mut advisor = fund();
        advisor.set(STATUS, "Advisor");
        assert!(render_ccv(&[advisor], writer()).is_err());
    }
}

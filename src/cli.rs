//! Command line definitions
//!
//! Long options accept the historical underscore spellings (`--tex_out`) as aliases.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cv-gen")]
#[command(about = "Generate LaTeX, HTML and CCV XML fragments for an academic CV")]
#[command(version)]
pub struct Cli {
    /// Config file (default: $CV_GEN_CONFIG, then ./cv-gen.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory that receives every output file
    #[arg(long, visible_alias = "out_dir", global = true)]
    pub out_dir: Option<PathBuf>,
    /// Log level; RUST_LOG takes precedence
    #[arg(short = 'd', long = "debug", value_enum, global = true)]
    pub debug: Option<LogLevel>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    /// Same as `warn`
    Critical,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn | LogLevel::Critical => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Publication counts and CCV publications from a BibTeX file
    Publications(PublicationsArgs),
    /// Expert witness cases
    Cases(CasesArgs),
    /// Recent collaborators and conflicts of interest
    Collaborators(CollaboratorsArgs),
    /// Research funding
    Funding(FundingArgs),
    /// Supervised students and postdocs
    Students(StudentsArgs),
    /// Conference and invited talks
    Talks(TalksArgs),
    /// Courses taught
    Teaching(TeachingArgs),
    /// Technical program committees
    Tpcs(TpcsArgs),
    /// Check every URL in a LaTeX, BibTeX or HTML file
    CheckUrls(CheckUrlsArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Publications(_) => "publications",
            Command::Cases(_) => "cases",
            Command::Collaborators(_) => "collaborators",
            Command::Funding(_) => "funding",
            Command::Students(_) => "students",
            Command::Talks(_) => "talks",
            Command::Teaching(_) => "teaching",
            Command::Tpcs(_) => "tpcs",
            Command::CheckUrls(_) => "check-urls",
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PublicationsArgs {
    /// Input BibTeX file
    pub file: PathBuf,
    #[arg(long, visible_alias = "summary_out", default_value = "bib_summary.tex")]
    pub summary_out: PathBuf,
    /// CCV XML output file
    #[arg(long, default_value = "publications.xml")]
    pub xml: PathBuf,
    /// Years back included in CCV output, 0 for all (default from config)
    #[arg(long, visible_alias = "ccv_years")]
    pub ccv_years: Option<i32>,
}

#[derive(Debug, Clone, Args)]
pub struct CasesArgs {
    /// Input CSV file
    pub file: PathBuf,
    #[arg(long, visible_alias = "tex_out", default_value = "cases.tex")]
    pub tex_out: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct CollaboratorsArgs {
    /// Input BibTeX file
    pub bib_file: PathBuf,
    /// Student roster CSV
    pub student_csv: PathBuf,
    /// Funding CSV
    pub funding_csv: PathBuf,
    /// People database CSV, rewritten when it changes
    pub people_csv: PathBuf,
    /// Number of years to include (default from config)
    #[arg(long)]
    pub years: Option<i32>,
    #[arg(long, visible_alias = "txt_out", default_value = "conflicts.txt")]
    pub txt_out: PathBuf,
    #[arg(long, visible_alias = "tex_out", default_value = "collabs.tex")]
    pub tex_out: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct FundingArgs {
    /// Input funding CSV file
    pub file: PathBuf,
    #[arg(long, visible_alias = "tex_out", default_value = "funding.tex")]
    pub tex_out: PathBuf,
    #[arg(long, visible_alias = "total_tex_out", default_value = "funding_total.tex")]
    pub total_tex_out: PathBuf,
    #[arg(long, default_value = "funding.xml")]
    pub xml: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct StudentsArgs {
    /// Student roster CSV
    pub file: PathBuf,
    #[arg(long, visible_alias = "phd_tex", default_value = "phd_students.tex")]
    pub phd_tex: PathBuf,
    #[arg(long, visible_alias = "phd_footnote_tex", default_value = "phd_footnotes.tex")]
    pub phd_footnote_tex: PathBuf,
    #[arg(long, visible_alias = "ms_tex", default_value = "ms_students.tex")]
    pub ms_tex: PathBuf,
    #[arg(long, visible_alias = "ms_footnote_tex", default_value = "ms_footnotes.tex")]
    pub ms_footnote_tex: PathBuf,
    #[arg(long, visible_alias = "pdf_tex", default_value = "pdfs.tex")]
    pub pdf_tex: PathBuf,
    #[arg(long, visible_alias = "ug_tex", default_value = "ug_students.tex")]
    pub ug_tex: PathBuf,
    #[arg(long, visible_alias = "meng_tex", default_value = "meng_students.tex")]
    pub meng_tex: PathBuf,
    #[arg(long, visible_alias = "stats_tex", default_value = "student_stats.tex")]
    pub stats_tex: PathBuf,
    #[arg(long, default_value = "students.html")]
    pub html: PathBuf,
    #[arg(long, default_value = "students.xml")]
    pub xml: PathBuf,
    /// Years back included in CCV output, 0 for all (default from config)
    #[arg(long, visible_alias = "ccv_years")]
    pub ccv_years: Option<i32>,
}

#[derive(Debug, Clone, Args)]
pub struct TalksArgs {
    /// Input CSV file
    pub file: PathBuf,
    #[arg(long, visible_alias = "conference_tex", default_value = "conference_talks.tex")]
    pub conference_tex: PathBuf,
    #[arg(long, visible_alias = "invited_tex", default_value = "invited_talks.tex")]
    pub invited_tex: PathBuf,
    #[arg(long, default_value = "talks.xml")]
    pub xml: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct TeachingArgs {
    /// Input CSV file
    pub file: PathBuf,
    #[arg(long, visible_alias = "grad_tex", default_value = "grad_teaching.tex")]
    pub grad_tex: PathBuf,
    #[arg(long, visible_alias = "ug_tex", default_value = "ug_teaching.tex")]
    pub ug_tex: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct TpcsArgs {
    /// TPC memberships CSV
    pub file: PathBuf,
    /// Conference names CSV
    pub conferences: PathBuf,
    #[arg(long, visible_alias = "tex_out", default_value = "TPCs.tex")]
    pub tex_out: PathBuf,
    #[arg(long, visible_alias = "html_out", default_value = "tpcs.html")]
    pub html_out: PathBuf,
    #[arg(long, default_value = "tpcs.xml")]
    pub xml: PathBuf,
    /// Check URLs and mark dead ones `none` in the TPC file instead of generating output
    #[arg(long, visible_alias = "fix_urls", action = ArgAction::SetTrue)]
    pub fix_urls: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CheckUrlsArgs {
    /// File to scan
    pub file: PathBuf,
    /// Also report passing URLs
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,
    /// Skip the summary lines
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_and_aliases() {
        let cli = Cli::parse_from(["cv-gen", "teaching", "teaching.csv", "--ug_tex", "ug.tex"]);
        match cli.command {
            Command::Teaching(args) => {
                assert_eq!(args.grad_tex, PathBuf::from("grad_teaching.tex"));
                assert_eq!(args.ug_tex, PathBuf::from("ug.tex"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "cv-gen", "tpcs", "tpcs.csv", "confs.csv", "--fix-urls", "--out-dir", "gen", "-d",
            "critical",
        ]);
        assert_eq!(cli.out_dir, Some(PathBuf::from("gen")));
        assert_eq!(cli.debug.map(LogLevel::as_filter), Some("warn"));
        assert!(matches!(cli.command, Command::Tpcs(ref args) if args.fix_urls));
        assert_eq!(cli.command.name(), "tpcs");
    }
}

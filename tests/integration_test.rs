use clap::Parser;
use cv_gen::cli::Cli;
use cv_gen::{App, Config, Outcome};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn arg(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

/// Parses a command line and runs it with the default config
async fn run_cli(args: &[String]) -> Outcome {
    let mut argv = vec!["cv-gen".to_string()];
    argv.extend(args.iter().cloned());
    let cli = Cli::parse_from(argv);
    let mut app = App::initialize(Config::default(), cli.out_dir.clone(), &cli.command)
        .await
        .unwrap();
    app.run(&cli.command).await.unwrap()
}

const STUDENTS: &str = "\u{feff}First Name,Last Name,Home Page,PhD Start Date,PhD End Date,PhD Thesis,PhD Thesis URL,PhD Program,PhD Co-Supervisor,PhD Last Position,PhD External Examiner,MS Start Date,MS End Date,MS Thesis,MS Program,MS Last Position,PDF Start Date,PDF End Date,PDF Last Position,UG Start Date,UG End Date,UG Program
Alice,Zhang,,2015-09-01,2020-06-30,Secure Kernels,,ECE,Prof. Smith,\"Assistant Professor, MIT\",Prof. Jones,,,,,,,,,,,
Robert (Bob),Young,https://bob.example.org,2021-09-01,,,,CS,,,,2019-09-01,2021-08-31,Fuzzing,CS,,,,,,,
Carol,Xu,,,,,,,,,,,,,,,2022-01-01,,,,,
Dan,Wu,,,,,,,,,,,,,,,,,,2023-05-01,,EngSci
";

const BIB: &str = r#"
@inproceedings{lie2020,
  author = {David Lie and Wei Huang and Ashvin Goel},
  title = {Fast Kernel Checks},
  booktitle = {OSDI},
  year = 2099,
  month = mar,
}

@article{huang2019,
  author = {Wei Huang and David Lie},
  title = {Smart Phones},
  journal = {TOPS},
  year = {2019},
}

@misc{m1, author = {David Lie}, title = {Slides}, year = {2021}}
"#;

#[tokio::test]
async fn teaching_writes_into_out_dir() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "teaching.csv",
        "Year,Code,Title,Enrollment,Type\n2019,ECE1724,Advanced Security,30,Grad\n2021,ECE568,Computer Security,120,UG\n2020,ECE1776,Systems & Tools,25,Grad\n",
    );
    let out = dir.path().join("gen");

    let outcome = run_cli(&[
        "teaching".into(),
        arg(&input),
        "--out-dir".into(),
        arg(&out),
        "--ug_tex".into(),
        "some/other/place/ug.tex".into(),
    ])
    .await;
    assert_eq!(outcome, Outcome::Success);

    let grad = fs::read_to_string(out.join("grad_teaching.tex")).unwrap();
    assert!(grad.starts_with("\\begin{classtab}\n"));
    assert!(grad.find("2020 & ECE1776").unwrap() < grad.find("2019 & ECE1724").unwrap());
    assert!(grad.contains("Systems \\& Tools"));
    let ug = fs::read_to_string(out.join("ug.tex")).unwrap();
    assert!(ug.contains("2021 & ECE568 & Computer Security & 120 \\\\"));
}

#[tokio::test]
async fn students_write_every_output() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "students.csv", STUDENTS);
    let out = dir.path().join("out");

    run_cli(&["students".into(), arg(&input), "--out-dir".into(), arg(&out), "--ccv-years".into(), "0".into()]).await;

    for name in [
        "phd_students.tex",
        "new_phd_students.tex",
        "ms_students.tex",
        "new_ms_students.tex",
        "pdfs.tex",
        "new_pdfs.tex",
        "ug_students.tex",
        "new_ug_students.tex",
        "meng_students.tex",
        "new_meng_students.tex",
        "phd_footnotes.tex",
        "ms_footnotes.tex",
        "student_stats.tex",
        "students.html",
        "students.xml",
    ] {
        assert!(out.join(name).exists(), "missing {}", name);
    }

    let stats = fs::read_to_string(out.join("student_stats.tex")).unwrap();
    assert!(stats.contains("\\newcommand{\\numcompletedphd}{1}"));
    assert!(stats.contains("\\newcommand{\\numcurrentpdf}{1}"));
    let footnotes = fs::read_to_string(out.join("phd_footnotes.tex")).unwrap();
    assert_eq!(footnotes, "\\footnotetext{Co-supervised with Prof. Smith.}\n\\stepcounter{footnote}\n");

    let html = fs::read_to_string(out.join("students.html")).unwrap();
    assert!(html.contains("<h3>Alumni</h3>"));
    assert!(html.contains("Last known position: Assistant Professor, MIT."));

    let xml = fs::read_to_string(out.join("students.xml")).unwrap();
    assert_eq!(xml.matches("label=\"Student/Postdoctoral Supervision\"").count(), 5);
    assert!(xml.ends_with("</generic-cv:generic-cv>\n"));
}

#[tokio::test]
async fn publications_summary_and_ccv() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "pubs.bib", BIB);
    let summary = dir.path().join("summary.tex");
    let xml = dir.path().join("pubs.xml");

    run_cli(&[
        "publications".into(),
        arg(&input),
        "--summary_out".into(),
        arg(&summary),
        "--xml".into(),
        arg(&xml),
    ])
    .await;

    let summary = fs::read_to_string(summary).unwrap();
    assert!(summary.contains("\\newcommand{\\numconfpubs}{1}"));
    assert!(summary.contains("\\newcommand{\\numotherpubs}{1}"));
    let xml = fs::read_to_string(xml).unwrap();
    assert!(xml.contains("David Lie, Wei Huang and Ashvin Goel"));
    assert!(xml.contains("label=\"Publications\""));
}

#[tokio::test]
async fn collaborators_create_then_update_people_db() {
    let dir = TempDir::new().unwrap();
    let bib = write(dir.path(), "pubs.bib", BIB);
    let students = write(dir.path(), "students.csv", STUDENTS);
    let funding = write(
        dir.path(),
        "funding.csv",
        "year,co_pis\n2098-2099,\"Jane Doe (Waterloo), Nobody\"\n",
    );
    let people = dir.path().join("people.csv");
    let out = dir.path().join("out");
    let args = vec![
        "collaborators".to_string(),
        arg(&bib),
        arg(&students),
        arg(&funding),
        arg(&people),
        "--out-dir".into(),
        arg(&out),
    ];

    run_cli(&args).await;
    let db = fs::read_to_string(&people).unwrap();
    assert!(db.starts_with("name,Last Name,First Name,Nick Name,Middle Name,Affiliation\n"));
    assert!(db.contains("Jane Doe,Doe,Jane,,,Waterloo"));
    assert!(db.contains("Robert Young,Young,Robert,Bob,,Toronto"));
    assert!(!dir.path().join("people-bak.csv").exists());

    let collabs = fs::read_to_string(out.join("collabs.tex")).unwrap();
    assert_eq!(collabs, "Ashvin Goel, Jane Doe (Waterloo), Wei Huang");
    let conflicts = fs::read_to_string(out.join("conflicts.txt")).unwrap();
    assert!(conflicts.contains("Alice Zhang (MIT)\n"));
    assert!(conflicts.contains("Carol Xu (Toronto)\n"));
    assert!(!conflicts.contains("Dan Wu"));

    // a corrected affiliation in the database is kept and reported
    let edited = db.replace("Wei Huang,Huang,Wei,,,", "Wei Huang,Huang,Wei,,,Tsinghua");
    fs::write(&people, &edited).unwrap();
    run_cli(&args).await;
    let collabs = fs::read_to_string(out.join("collabs.tex")).unwrap();
    assert!(collabs.contains("Wei Huang (Tsinghua)"));
    assert!(!dir.path().join("people-bak.csv").exists());
}

#[tokio::test]
async fn tpcs_without_fixing_urls() {
    let dir = TempDir::new().unwrap();
    let tpcs = write(
        dir.path(),
        "tpcs.csv",
        "conf,URL,year,month,role,notes\nSOSP,,2021,10,TPC Chair,\nHotSec,none,2010,,,Co-Chair\n",
    );
    let confs = write(
        dir.path(),
        "confs.csv",
        "conf_short,conf_full,URL,start_year\nSOSP,ACM Symposium on Operating Systems Principles,https://sosp<year-short>.example.org/,1967\n",
    );
    let out = dir.path().join("out");

    run_cli(&["tpcs".into(), arg(&tpcs), arg(&confs), "--out-dir".into(), arg(&out)]).await;

    let tex = fs::read_to_string(out.join("TPCs.tex")).unwrap();
    assert!(tex.contains("\\href{https://sosp21.example.org/}{The 55th ACM Symposium on Operating Systems Principles}"));
    assert!(tex.contains("\\item \\textit{The HotSec}, 2010 (Co-Chair).\n"));
    assert!(out.join("tpcs.html").exists());
    let xml = fs::read_to_string(out.join("tpcs.xml")).unwrap();
    assert!(xml.contains("Technical Program Committee Chair"));
}

#[tokio::test]
async fn check_urls_with_only_skipped_links() {
    let dir = TempDir::new().unwrap();
    let tex = write(
        dir.path(),
        "cv.tex",
        "\\href{mailto:someone@example.org}{mail} \\href{https://www.linkedin.com/in/someone}{profile}\n",
    );
    let outcome = run_cli(&["check-urls".into(), arg(&tex), "-q".into()]).await;
    assert_eq!(outcome, Outcome::Success);
}

#[tokio::test]
async fn missing_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    let cli = Cli::parse_from(["cv-gen", "cases", dir.path().join("nope.csv").to_str().unwrap()]);
    let mut app = App::initialize(Config::default(), None, &cli.command).await.unwrap();
    let err = app.run(&cli.command).await.unwrap_err();
    assert!(format!("{:#}", err).contains("nope.csv"));
}

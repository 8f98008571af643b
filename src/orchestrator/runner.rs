//! Application lifecycle: initialize once, run one subcommand, report totals

use crate::cli::{CheckUrlsArgs, Command};
use crate::config::Config;
use crate::error::CvError;
use crate::generators::{
    cases, collaborators, funding, publications, students, talks, teaching, tpcs, RunStats,
};
use crate::services::{OutputWriter, UrlChecker};
use crate::utils::logging::{log_startup, print_final_stats};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

/// How a run ended when no error was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// `check-urls` found dead links
    UrlFailures,
}

/// Main application state
pub struct App {
    config: Config,
    writer: OutputWriter,
    checker: Option<UrlChecker>,
}

impl App {
    /// Prepares the output directory and, when the command needs one, the HTTP client
    pub async fn initialize(config: Config, out_dir: Option<PathBuf>, command: &Command) -> Result<Self> {
        if let Some(dir) = &out_dir {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating output directory {}", dir.display()))?;
        }

        let checker = match command {
            Command::Tpcs(_) | Command::CheckUrls(_) => Some(UrlChecker::new(&config)?),
            _ => None,
        };

        Ok(Self {
            config,
            writer: OutputWriter::new(out_dir),
            checker,
        })
    }

    /// Runs one subcommand and prints the summary
    pub async fn run(&mut self, command: &Command) -> Result<Outcome> {
        log_startup(command.name());

        if let Command::CheckUrls(args) = command {
            return self.check_urls(args).await;
        }

        let stats = self
            .dispatch(command)
            .await
            .with_context(|| format!("{} failed", command.name()))?;
        print_final_stats(self.writer.written(), stats.processed, stats.skipped);
        Ok(Outcome::Success)
    }

    async fn dispatch(&mut self, command: &Command) -> crate::error::Result<RunStats> {
        let writer = &mut self.writer;
        let config = &self.config;
        match command {
            Command::Publications(args) => publications::run(args, config, writer).await,
            Command::Cases(args) => cases::run(args, writer).await,
            Command::Collaborators(args) => collaborators::run(args, config, writer).await,
            Command::Funding(args) => funding::run(args, writer).await,
            Command::Students(args) => students::run(args, config, writer).await,
            Command::Talks(args) => talks::run(args, writer).await,
            Command::Teaching(args) => teaching::run(args, writer).await,
            Command::Tpcs(args) => {
                let checker = self
                    .checker
                    .as_ref()
                    .ok_or_else(|| CvError::Config("HTTP client was not initialized".to_string()))?;
                tpcs::run(args, writer, checker).await
            }
            Command::CheckUrls(_) => Ok(RunStats::default()),
        }
    }

    async fn check_urls(&self, args: &CheckUrlsArgs) -> Result<Outcome> {
        let checker = match &self.checker {
            Some(checker) => checker,
            None => anyhow::bail!("HTTP client was not initialized"),
        };
        let report = checker.check_file(&args.file, args.verbose).await?;
        info!("{} of {} urls failed", report.failures.len(), report.checked);
        if !args.quiet {
            println!("Checked {} urls.", report.checked);
            if report.has_failures() {
                println!("Failures were detected.");
            }
        }
        Ok(if report.has_failures() {
            Outcome::UrlFailures
        } else {
            Outcome::Success
        })
    }
}

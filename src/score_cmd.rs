//! `ranker score`: score a batch of resumes from disk in one invocation.
//!
//! Paths may be files or directories. Directories are walked recursively
//! for `.docx` files in name order; files named explicitly are always
//! attempted, so an unsupported file shows up in the skipped list instead
//! of being silently ignored.

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::analyze::Pipeline;
use crate::chart::{Charts, DEFAULT_TEXT_WIDTH};
use crate::config::Config;
use crate::extract;
use crate::models::{Candidate, SkippedUpload};
use crate::session::{JobForm, Session};

/// Output format for `ranker score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Everything the user supplied on the command line.
#[derive(Debug, Clone)]
pub struct ScoreArgs {
    pub form: JobForm,
    pub paths: Vec<PathBuf>,
    pub format: OutputFormat,
    pub charts: bool,
}

#[derive(Serialize)]
struct ScoreReport<'a> {
    candidates: &'a [Candidate],
    skipped: Vec<SkippedUpload>,
    suitable: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    charts: Option<Charts>,
}

pub fn run_score(config: &Config, args: &ScoreArgs) -> Result<()> {
    let pipeline = Pipeline::from_config(config);
    let files = collect_resume_paths(&args.paths);
    tracing::debug!(count = files.len(), "collected resume paths");

    let batch: Vec<_> = files
        .iter()
        .map(|path| extract::read_upload(path, pipeline.limits()))
        .collect();

    for skill in &args.form.skills {
        if !config.skills.contains(skill.trim()) {
            tracing::debug!(skill = %skill, "skill is not in the catalog");
        }
    }

    let mut session = Session::new();
    session.submit_batch(&args.form, &batch, &pipeline)?;

    let skipped = session.skipped()?.to_vec();
    let table = session.scores()?;
    let suitable: Vec<&str> = session
        .suitable()?
        .into_iter()
        .map(|c| c.name.as_str())
        .collect();
    let charts = if args.charts {
        Some(session.charts()?)
    } else {
        None
    };

    match args.format {
        OutputFormat::Json => {
            let report = ScoreReport {
                candidates: &table.candidates,
                skipped,
                suitable,
                charts,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print_table(&table.candidates);
            if !skipped.is_empty() {
                println!();
                println!("Skipped files:");
                for s in &skipped {
                    println!("  {}: {}", s.file_name, s.reason);
                }
            }
            println!();
            let job = session.job()?;
            println!(
                "Suitable resumes (experience >= {}, top {}):",
                job.required_experience, job.pick
            );
            if suitable.is_empty() {
                println!("  (none)");
            } else {
                for (i, name) in suitable.iter().enumerate() {
                    println!("  {}. {}", i + 1, name);
                }
            }
            if let Some(charts) = charts {
                println!();
                print!("{}", charts.score.render_text(DEFAULT_TEXT_WIDTH));
                println!();
                print!("{}", charts.experience.render_text(DEFAULT_TEXT_WIDTH));
            }
        }
    }

    Ok(())
}

fn print_table(candidates: &[Candidate]) {
    let name_width = candidates
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Candidate".len());

    println!("Scaled Scores:");
    println!(
        "  {:<nw$}  {:>6}  {:>10}  {:>10}",
        "Candidate",
        "Score",
        "Experience",
        "Similarity",
        nw = name_width
    );
    for c in candidates {
        println!(
            "  {:<nw$}  {:>6.2}  {:>10}  {:>10.4}",
            c.name,
            c.score,
            c.experience,
            c.similarity,
            nw = name_width
        );
    }
}

/// Expands directories into their `.docx` files; keeps explicit files as given.
pub fn collect_resume_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            out.extend(walk_docx(path));
        } else {
            out.push(path.clone());
        }
    }
    out
}

fn walk_docx(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| extract::is_supported(&e.file_name().to_string_lossy()))
        .map(|e| e.into_path())
        .collect()
}

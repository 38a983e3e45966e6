//! # Resume Ranker CLI (`ranker`)
//!
//! Scores `.docx` resumes against a job description and shortlists the best
//! candidates that meet an experience threshold.
//!
//! ## Usage
//!
//! ```bash
//! ranker --config ./config/ranker.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ranker score` | Score resume files or directories against a job description |
//! | `ranker extract <path>` | Print the text extracted from one resume |
//! | `ranker skills` | List the skill catalog |
//! | `ranker serve` | Start the single-user HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Shortlist two candidates with at least 3 years of experience
//! ranker score --company Acme --role "Data Engineer" \
//!     --skill Python --skill SQL --experience 3 --pick 2 ./resumes
//!
//! # Same, as JSON with chart data
//! ranker score --company Acme --role "Data Engineer" --skill Python \
//!     --format json --charts ./resumes
//!
//! # Serve the JSON API
//! ranker serve --config ./config/ranker.toml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_ranker::config;
use resume_ranker::extract;
use resume_ranker::score_cmd::{self, OutputFormat, ScoreArgs};
use resume_ranker::server;
use resume_ranker::session::JobForm;

/// Resume Ranker: score resumes against a job description by lexical
/// similarity and shortlist candidates by experience.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file means built-in defaults.
#[derive(Parser)]
#[command(
    name = "ranker",
    about = "Resume Ranker: score and shortlist .docx resumes against a job description",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/ranker.toml`. Scoring range, extraction limits,
    /// skill catalog and server settings are read from this file.
    #[arg(long, global = true, default_value = "./config/ranker.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Score resumes against a job description.
    ///
    /// Every resume is scored by cosine similarity to the job description
    /// (company, role and skills), rescaled to 1-10 across the batch.
    /// Candidates meeting the experience threshold are shortlisted by score.
    Score {
        /// Hiring company.
        #[arg(long)]
        company: String,

        /// Role being hired for.
        #[arg(long)]
        role: String,

        /// Required skill; repeat for several (`--skill Python --skill SQL`).
        #[arg(long = "skill")]
        skills: Vec<String>,

        /// Minimum years of experience.
        #[arg(long, default_value_t = 0.0)]
        experience: f64,

        /// Number of resumes to shortlist.
        #[arg(long, default_value_t = 1)]
        pick: usize,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Include score and experience charts.
        #[arg(long)]
        charts: bool,

        /// Resume files or directories containing `.docx` resumes.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print the text extracted from a resume.
    Extract {
        /// Path to a `.docx` file.
        path: PathBuf,
    },

    /// List the skill catalog.
    Skills,

    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` and serves one session: submit a job
    /// description with resumes, then read scores, shortlist and charts.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config_or_default(&cli.config)?;

    match cli.command {
        Commands::Score {
            company,
            role,
            skills,
            experience,
            pick,
            format,
            charts,
            paths,
        } => {
            let args = ScoreArgs {
                form: JobForm {
                    company,
                    role,
                    skills,
                    required_experience: experience,
                    pick,
                },
                paths,
                format,
                charts,
            };
            score_cmd::run_score(&cfg, &args)?;
        }
        Commands::Extract { path } => {
            let text = extract::extract_path(&path, &cfg.extraction.limits())?;
            println!("{}", text);
        }
        Commands::Skills => {
            for skill in &cfg.skills.catalog {
                println!("{}", skill);
            }
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

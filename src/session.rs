//! Explicit session context.
//!
//! A [`Session`] holds everything one user has submitted: the job
//! description and the analysis of their uploads. It is created when a
//! session starts, replaced on every successful submission, and cleared by
//! [`Session::reset`] or when the process exits. Nothing is persisted.
//!
//! Results can only be read after a successful [`Session::submit`]; earlier
//! reads return [`SessionError::NotSubmitted`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::analyze::{Analysis, AnalysisError, Pipeline};
use crate::chart::{self, Charts};
use crate::extract::ExtractionError;
use crate::models::{Candidate, JobDescription, ScoreTable, SkippedUpload, Upload};
use crate::rank;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("please fill in all fields and upload resumes (missing or invalid: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("please upload resumes and a job description first")]
    NotSubmitted,
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Job-description form as entered by the user, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobForm {
    pub company: String,
    pub role: String,
    pub skills: Vec<String>,
    pub required_experience: f64,
    pub pick: usize,
}

impl Default for JobForm {
    fn default() -> Self {
        Self {
            company: String::new(),
            role: String::new(),
            skills: Vec::new(),
            required_experience: 0.0,
            pick: 1,
        }
    }
}

impl JobForm {
    /// Checks every field and turns the form into a [`JobDescription`].
    ///
    /// All problems are reported at once, by field name. `upload_count` is
    /// the number of files submitted with the form; zero is reported as
    /// `"resumes"`.
    pub fn validate(&self, upload_count: usize) -> Result<JobDescription, SessionError> {
        let mut invalid = Vec::new();

        let company = self.company.trim();
        if company.is_empty() {
            invalid.push("company");
        }
        let role = self.role.trim();
        if role.is_empty() {
            invalid.push("role");
        }

        let mut skills: Vec<String> = Vec::new();
        for skill in self.skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            if !skills.iter().any(|s| s == skill) {
                skills.push(skill.to_string());
            }
        }
        if skills.is_empty() {
            invalid.push("skills");
        }

        if !self.required_experience.is_finite() || self.required_experience < 0.0 {
            invalid.push("required_experience");
        }
        if self.pick == 0 {
            invalid.push("pick");
        }
        if upload_count == 0 {
            invalid.push("resumes");
        }

        if !invalid.is_empty() {
            return Err(SessionError::MissingFields(invalid));
        }

        Ok(JobDescription {
            company: company.to_string(),
            role: role.to_string(),
            skills,
            required_experience: self.required_experience,
            pick: self.pick,
        })
    }
}

#[derive(Debug, Clone)]
struct Submission {
    job: JobDescription,
    analysis: Analysis,
    submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Session {
    submission: Option<Submission>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self { submission: None }
    }

    /// When the current results were produced, if any.
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submission.as_ref().map(|s| s.submitted_at)
    }

    pub fn is_submitted(&self) -> bool {
        self.submission.is_some()
    }

    /// Validates the form, runs the pipeline and stores the results.
    ///
    /// On any error nothing is computed or stored and earlier results stay
    /// readable.
    pub fn submit(
        &mut self,
        form: &JobForm,
        uploads: &[Upload],
        pipeline: &Pipeline,
    ) -> Result<&Analysis, SessionError> {
        let job = form.validate(uploads.len())?;
        let analysis = pipeline.analyze(&job, uploads)?;
        Ok(self.store(job, analysis))
    }

    /// Like [`Session::submit`], for a batch in which some files could not
    /// be loaded. Those files are reported as skipped in batch order.
    pub fn submit_batch(
        &mut self,
        form: &JobForm,
        batch: &[Result<Upload, ExtractionError>],
        pipeline: &Pipeline,
    ) -> Result<&Analysis, SessionError> {
        let job = form.validate(batch.len())?;
        let analysis = pipeline.analyze_batch(&job, batch.iter().map(Result::as_ref))?;
        Ok(self.store(job, analysis))
    }

    fn store(&mut self, job: JobDescription, analysis: Analysis) -> &Analysis {
        tracing::info!(
            company = %job.company,
            role = %job.role,
            candidates = analysis.table.len(),
            "submission accepted"
        );

        let submission = self.submission.insert(Submission {
            job,
            analysis,
            submitted_at: Utc::now(),
        });
        &submission.analysis
    }

    fn current(&self) -> Result<&Submission, SessionError> {
        self.submission.as_ref().ok_or(SessionError::NotSubmitted)
    }

    pub fn job(&self) -> Result<&JobDescription, SessionError> {
        Ok(&self.current()?.job)
    }

    /// The full score table, in upload order.
    pub fn scores(&self) -> Result<&ScoreTable, SessionError> {
        Ok(&self.current()?.analysis.table)
    }

    /// Uploads left out of the last submission.
    pub fn skipped(&self) -> Result<&[SkippedUpload], SessionError> {
        Ok(&self.current()?.analysis.skipped)
    }

    /// Candidates meeting the required experience, best first, at most `pick`.
    pub fn suitable(&self) -> Result<Vec<&Candidate>, SessionError> {
        let current = self.current()?;
        Ok(rank::filter_and_rank(
            &current.analysis.table,
            current.job.required_experience,
            current.job.pick,
        ))
    }

    pub fn charts(&self) -> Result<Charts, SessionError> {
        let current = self.current()?;
        Ok(chart::charts(
            &current.analysis.table,
            current.job.required_experience,
        ))
    }

    /// Ends the session's submission; results become unavailable.
    pub fn reset(&mut self) {
        self.submission = None;
    }
}

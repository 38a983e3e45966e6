//! The scoring pipeline: extract, score, parse experience, tabulate.
//!
//! Files that fail extraction are skipped and reported in
//! [`Analysis::skipped`], in batch order; the rest of the batch is still
//! scored.

use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::experience::{ExperienceParser, RegexExperienceParser};
use crate::extract::{self, ExtractLimits, ExtractionError};
use crate::models::{Candidate, JobDescription, ScoreTable, SkippedUpload, Upload};
use crate::scoring::Scorer;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("none of the {0} uploaded file(s) could be read as a .docx resume")]
    NoReadableResumes(usize),
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub table: ScoreTable,
    pub skipped: Vec<SkippedUpload>,
}

pub struct Pipeline {
    scorer: Scorer,
    limits: ExtractLimits,
    parser: Box<dyn ExperienceParser>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            scorer: Scorer::default(),
            limits: ExtractLimits::default(),
            parser: Box::new(RegexExperienceParser),
        }
    }
}

impl Pipeline {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scorer: Scorer::new(config.scoring.range()),
            limits: config.extraction.limits(),
            parser: Box::new(RegexExperienceParser),
        }
    }

    /// Replaces the experience heuristic.
    pub fn with_parser(mut self, parser: Box<dyn ExperienceParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn limits(&self) -> &ExtractLimits {
        &self.limits
    }

    /// Runs the full pipeline over `uploads`.
    pub fn analyze(
        &self,
        job: &JobDescription,
        uploads: &[Upload],
    ) -> Result<Analysis, AnalysisError> {
        self.analyze_batch(job, uploads.iter().map(Ok))
    }

    /// Runs the pipeline over a batch where some files already failed to
    /// load. Failures are reported alongside extraction failures, in batch
    /// order.
    pub fn analyze_batch<'a>(
        &self,
        job: &JobDescription,
        batch: impl IntoIterator<Item = Result<&'a Upload, &'a ExtractionError>>,
    ) -> Result<Analysis, AnalysisError> {
        let mut readable: Vec<(&Upload, String)> = Vec::new();
        let mut skipped = Vec::new();
        let mut total = 0;

        for item in batch {
            total += 1;
            let result = match item {
                Ok(upload) => {
                    extract::extract_upload(upload, &self.limits).map(|text| (upload, text))
                }
                Err(e) => Err(e.clone()),
            };
            match result {
                Ok(pair) => readable.push(pair),
                Err(e) => {
                    tracing::warn!(file = %e.file, error = %e.kind, "skipping resume");
                    skipped.push(SkippedUpload {
                        file_name: e.file,
                        reason: e.kind.to_string(),
                    });
                }
            }
        }

        if readable.is_empty() {
            return Err(AnalysisError::NoReadableResumes(total));
        }

        let texts: Vec<&str> = readable.iter().map(|(_, text)| text.as_str()).collect();
        let scores = self.scorer.score_detailed(&job.query_text(), &texts);

        let candidates = readable
            .iter()
            .zip(scores)
            .map(|((upload, text), score)| Candidate {
                name: Candidate::name_from_file(&upload.file_name),
                experience: self.parser.years(text),
                score: score.scaled,
                similarity: score.similarity,
                text: text.clone(),
            })
            .collect::<Vec<_>>();

        tracing::info!(
            scored = candidates.len(),
            skipped = skipped.len(),
            parser = self.parser.name(),
            "scored resumes"
        );

        Ok(Analysis {
            table: ScoreTable::new(candidates),
            skipped,
        })
    }
}

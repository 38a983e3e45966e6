//! Similarity scoring of resumes against a job description.
//!
//! # Algorithm
//!
//! 1. Vectorize the job description and every resume over one shared
//!    vocabulary ([`TermMatrix`]).
//! 2. Cosine similarity of the job-description row against each resume row.
//! 3. Min-max rescale the similarities onto [`ScoreRange`] (`[1, 10]` by
//!    default): the most similar resume maps to the top of the range, the
//!    least similar to the bottom.
//!
//! When every similarity is equal (always the case for a single resume) the
//! range collapses; every resume then gets the midpoint of the target range
//! (`5.5` by default).
//!
//! Scoring is a pure function of its inputs.

use serde::Serialize;

use crate::vectorize::TermMatrix;

pub const DEFAULT_MIN_SCORE: f64 = 1.0;
pub const DEFAULT_MAX_SCORE: f64 = 10.0;

/// Target range of scaled scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_SCORE,
            max: DEFAULT_MAX_SCORE,
        }
    }
}

impl ScoreRange {
    /// Score given to every resume when the similarities do not spread.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Linearly maps `values` so their minimum lands on `self.min` and their
    /// maximum on `self.max`. A collapsed input range maps to [`Self::midpoint`].
    pub fn rescale(&self, values: &[f64]) -> Vec<f64> {
        let Some(lo) = values.iter().copied().reduce(f64::min) else {
            return Vec::new();
        };
        let hi = values.iter().copied().fold(lo, f64::max);

        let spread = hi - lo;
        if spread <= f64::EPSILON {
            return vec![self.midpoint(); values.len()];
        }

        values
            .iter()
            .map(|v| self.min + (self.max - self.min) * ((v - lo) / spread))
            .collect()
    }
}

/// Cosine similarity between two term-frequency vectors.
///
/// Returns a value in `[0.0, 1.0]` for count vectors. Returns `0.0` for empty
/// or all-zero vectors and for vectors of different lengths.
pub fn cosine_similarity(a: &[u32], b: &[u32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f64::EPSILON {
        return 0.0;
    }

    dot / denom
}

/// Raw and scaled score of one resume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResumeScore {
    pub similarity: f64,
    pub scaled: f64,
}

/// Scores resumes against a job description.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    range: ScoreRange,
}

impl Scorer {
    pub fn new(range: ScoreRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> ScoreRange {
        self.range
    }

    /// One scaled score per resume, in input order.
    pub fn score(&self, job_text: &str, resumes: &[&str]) -> Vec<f64> {
        self.score_detailed(job_text, resumes)
            .into_iter()
            .map(|s| s.scaled)
            .collect()
    }

    /// Like [`Scorer::score`] but also keeps the cosine similarity.
    pub fn score_detailed(&self, job_text: &str, resumes: &[&str]) -> Vec<ResumeScore> {
        if resumes.is_empty() {
            return Vec::new();
        }

        let mut documents = Vec::with_capacity(resumes.len() + 1);
        documents.push(job_text);
        documents.extend_from_slice(resumes);
        let matrix = TermMatrix::fit_transform(&documents);

        let job_row = &matrix.rows[0];
        let similarities: Vec<f64> = matrix.rows[1..]
            .iter()
            .map(|row| cosine_similarity(job_row, row))
            .collect();
        let scaled = self.range.rescale(&similarities);

        similarities
            .into_iter()
            .zip(scaled)
            .map(|(similarity, scaled)| ResumeScore { similarity, scaled })
            .collect()
    }
}

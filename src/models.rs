//! Core data models used throughout the ranker.
//!
//! These types flow through the pipeline: [`Upload`]s are extracted into
//! resume text, scored against a [`JobDescription`], and collected into a
//! [`ScoreTable`] of [`Candidate`]s.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A resume file as received from the user, before extraction.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// An upload that was left out of the score table, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedUpload {
    pub file_name: String,
    pub reason: String,
}

/// The role being hired for. Built from a validated
/// [`JobForm`](crate::session::JobForm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub company: String,
    pub role: String,
    /// Required skills, in the order given, without duplicates.
    pub skills: Vec<String>,
    /// Minimum years of experience; fractional values compare against whole years.
    pub required_experience: f64,
    /// How many candidates to shortlist.
    pub pick: usize,
}

impl JobDescription {
    /// The text the job description is scored as: company, role and skills
    /// joined by single spaces.
    pub fn query_text(&self) -> String {
        let mut parts = vec![self.company.as_str(), self.role.as_str()];
        parts.extend(self.skills.iter().map(String::as_str));
        parts.join(" ")
    }
}

/// One scored resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Display name derived from the file name.
    pub name: String,
    /// Extracted resume text. Not part of the serialized table.
    #[serde(skip)]
    pub text: String,
    /// Parsed years of experience (0 when none was found).
    pub experience: u32,
    /// Scaled similarity score.
    pub score: f64,
    /// Cosine similarity before rescaling.
    pub similarity: f64,
}

impl Candidate {
    /// Candidate name for an uploaded file: the base name up to its first `.`.
    ///
    /// `"jane.doe.docx"` becomes `"jane"`, `"cv/alex.docx"` becomes `"alex"`.
    pub fn name_from_file(file_name: &str) -> String {
        let base = Path::new(file_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());
        base.split('.').next().unwrap_or_default().to_string()
    }
}

/// Candidates in upload order. Lives for one session only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub candidates: Vec<Candidate>,
}

impl ScoreTable {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_text_joins_fields() {
        let job = JobDescription {
            company: "Acme".to_string(),
            role: "Data Engineer".to_string(),
            skills: vec!["Python".to_string(), "SQL".to_string()],
            required_experience: 2.0,
            pick: 1,
        };
        assert_eq!(job.query_text(), "Acme Data Engineer Python SQL");
    }

    #[test]
    fn name_from_file_strips_everything_after_first_dot() {
        assert_eq!(Candidate::name_from_file("jane.docx"), "jane");
        assert_eq!(Candidate::name_from_file("jane.doe.docx"), "jane");
        assert_eq!(Candidate::name_from_file("resumes/alex.docx"), "alex");
        assert_eq!(Candidate::name_from_file("noext"), "noext");
    }

    #[test]
    fn resume_text_is_not_serialized() {
        let c = Candidate {
            name: "a".to_string(),
            text: "secret body".to_string(),
            experience: 3,
            score: 10.0,
            similarity: 0.5,
        };
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("text").is_none());
        assert_eq!(json["experience"], 3);
    }
}

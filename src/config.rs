use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::extract::{ExtractLimits, DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_XML_ENTRY_BYTES};
use crate::scoring::{ScoreRange, DEFAULT_MAX_SCORE, DEFAULT_MIN_SCORE};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub skills: SkillsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default = "default_max_score")]
    pub max_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            max_score: DEFAULT_MAX_SCORE,
        }
    }
}

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}
fn default_max_score() -> f64 {
    DEFAULT_MAX_SCORE
}

impl ScoringConfig {
    pub fn range(&self) -> ScoreRange {
        ScoreRange {
            min: self.min_score,
            max: self.max_score,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    #[serde(default = "default_max_xml_entry_bytes")]
    pub max_xml_entry_bytes: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_xml_entry_bytes: DEFAULT_MAX_XML_ENTRY_BYTES,
        }
    }
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}
fn default_max_xml_entry_bytes() -> u64 {
    DEFAULT_MAX_XML_ENTRY_BYTES
}

impl ExtractionConfig {
    pub fn limits(&self) -> ExtractLimits {
        ExtractLimits {
            max_file_bytes: self.max_file_bytes,
            max_xml_entry_bytes: self.max_xml_entry_bytes,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SkillsConfig {
    /// Skills offered to the user when describing a job.
    #[serde(default = "default_skill_catalog")]
    pub catalog: Vec<String>,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            catalog: default_skill_catalog(),
        }
    }
}

fn default_skill_catalog() -> Vec<String> {
    [
        "Python",
        "SQL",
        "Machine Learning",
        "Data Analysis",
        "TensorFlow",
        "Pandas",
        "Scikit-learn",
        "Java",
        "C++",
        "JavaScript",
        "React",
        "Node.js",
        "MongoDB",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl SkillsConfig {
    pub fn contains(&self, skill: &str) -> bool {
        self.catalog.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }
}

/// Default cap on a `POST /submit` body. Uploads travel base64-encoded, so
/// this leaves room for several files at `max_file_bytes`.
pub const DEFAULT_MAX_REQUEST_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Largest request body accepted, in bytes.
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}
fn default_max_request_bytes() -> u64 {
    DEFAULT_MAX_REQUEST_BYTES
}

/// Size of `bytes` once base64-encoded.
fn base64_len(bytes: u64) -> u64 {
    bytes.div_ceil(3).saturating_mul(4)
}

/// Loads the config at `path`, or the built-in defaults when the file does
/// not exist.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::default())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        // Validate scoring
        if !self.scoring.min_score.is_finite() || !self.scoring.max_score.is_finite() {
            anyhow::bail!("scoring.min_score and scoring.max_score must be finite");
        }
        if self.scoring.min_score >= self.scoring.max_score {
            anyhow::bail!(
                "scoring.min_score ({}) must be less than scoring.max_score ({})",
                self.scoring.min_score,
                self.scoring.max_score
            );
        }

        // Validate extraction
        if self.extraction.max_file_bytes == 0 {
            anyhow::bail!("extraction.max_file_bytes must be > 0");
        }
        if self.extraction.max_xml_entry_bytes == 0 {
            anyhow::bail!("extraction.max_xml_entry_bytes must be > 0");
        }

        if self.skills.catalog.iter().any(|s| s.trim().is_empty()) {
            anyhow::bail!("skills.catalog must not contain blank entries");
        }

        if self.server.bind.trim().is_empty() {
            anyhow::bail!("server.bind must not be empty");
        }
        let one_upload = base64_len(self.extraction.max_file_bytes);
        if self.server.max_request_bytes <= one_upload {
            anyhow::bail!(
                "server.max_request_bytes ({}) must exceed one base64-encoded upload at extraction.max_file_bytes ({} bytes)",
                self.server.max_request_bytes,
                one_upload
            );
        }
        if usize::try_from(self.server.max_request_bytes).is_err() {
            anyhow::bail!("server.max_request_bytes is too large for this platform");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ranker.toml");
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn empty_file_uses_defaults() {
        let (_tmp, path) = write_config("");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.scoring.range(), ScoreRange::default());
        assert_eq!(cfg.extraction.limits(), ExtractLimits::default());
        assert_eq!(cfg.skills.catalog.len(), 13);
        assert_eq!(cfg.server.bind, "127.0.0.1:8501");
        assert_eq!(cfg.server.max_request_bytes, DEFAULT_MAX_REQUEST_BYTES);
    }

    #[test]
    fn default_request_limit_fits_several_uploads() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.server.max_request_bytes > 4 * base64_len(cfg.extraction.max_file_bytes));
    }

    #[test]
    fn request_limit_below_one_upload_is_rejected() {
        let (_tmp, path) = write_config(
            "[extraction]\nmax_file_bytes = 3000\n\n[server]\nmax_request_bytes = 4000\n",
        );
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("max_request_bytes"));

        let (_tmp, path) = write_config(
            "[extraction]\nmax_file_bytes = 3000\n\n[server]\nmax_request_bytes = 4001\n",
        );
        assert_eq!(load_config(&path).unwrap().server.max_request_bytes, 4001);
    }

    #[test]
    fn overrides_are_read() {
        let (_tmp, path) = write_config(
            r#"[scoring]
min_score = 0.0
max_score = 100.0

[extraction]
max_file_bytes = 1024

[skills]
catalog = ["Rust", "Go"]

[server]
bind = "0.0.0.0:9000"
"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.scoring.range(), ScoreRange { min: 0.0, max: 100.0 });
        assert_eq!(cfg.extraction.max_file_bytes, 1024);
        assert_eq!(cfg.extraction.max_xml_entry_bytes, DEFAULT_MAX_XML_ENTRY_BYTES);
        assert!(cfg.skills.contains("rust"));
        assert!(!cfg.skills.contains("Python"));
        assert_eq!(cfg.server.bind, "0.0.0.0:9000");
    }

    #[test]
    fn inverted_range_is_rejected() {
        let (_tmp, path) = write_config("[scoring]\nmin_score = 10.0\nmax_score = 1.0\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("min_score"));
    }

    #[test]
    fn zero_file_limit_is_rejected() {
        let (_tmp, path) = write_config("[extraction]\nmax_file_bytes = 0\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = load_config_or_default(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:8501");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let (_tmp, path) = write_config("[scoring\n");
        assert!(load_config(&path).is_err());
    }
}

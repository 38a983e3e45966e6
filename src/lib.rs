//! # Resume Ranker
//!
//! Scores candidate resumes against a job description using lexical
//! similarity, then shortlists them with a simple experience filter.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ .docx    │──▶│ Extract text │──▶│ Bag-of-words │──▶│ Filter+Rank  │
//! │ uploads  │   │ (skip bad)   │   │ cosine, 1-10 │   │ by exp/score │
//! └──────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! The pipeline is driven through a [`session::Session`], either from the
//! `ranker` CLI or from the single-user HTTP server.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`extract`] | `.docx` text extraction |
//! | [`vectorize`] | Tokenization and term-frequency vectors |
//! | [`scoring`] | Cosine similarity and min-max rescaling |
//! | [`experience`] | Years-of-experience heuristic |
//! | [`rank`] | Experience filter and top-N ranking |
//! | [`analyze`] | The end-to-end scoring pipeline |
//! | [`session`] | Session context and form validation |
//! | [`chart`] | Score and experience chart data |
//! | [`score_cmd`] | `ranker score` command |
//! | [`server`] | HTTP server |

pub mod analyze;
pub mod chart;
pub mod config;
pub mod experience;
pub mod extract;
pub mod models;
pub mod rank;
pub mod score_cmd;
pub mod scoring;
pub mod server;
pub mod session;
pub mod vectorize;

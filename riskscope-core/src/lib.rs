//! # riskscope-core
//!
//! Core library for riskscope - a financial and health risk assessment
//! dashboard.
//!
//! This library provides:
//! - The pure risk-scoring model (Framingham cardiovascular probability,
//!   financial stability index, composite scores, classification tables)
//! - Score orchestration and narrative fetching
//! - The assistant chat session state machine
//! - Typed clients for the prediction, narrative, and Q&A services
//! - A SQLite-backed document store for the dashboard and chat history
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows in one direction: questionnaire profiles go out to the
//! prediction services, their results land in the document store, the
//! scoring model derives a [`ScoreBundle`] from whatever is stored, and the
//! narrative/assistant collaborators consume the derived scores. Scoring is
//! pure and deterministic; every network boundary sits behind a trait seam.
//!
//! ## Example
//!
//! ```rust,no_run
//! use riskscope_core::{dashboard, Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//!
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let data = db.load_dashboard().expect("failed to load dashboard");
//! let bundle = dashboard::assemble(&data).expect("failed to derive scores");
//! println!("overall: {}", bundle.overall_risk_score);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use services::ServiceClient;
pub use store::Database;
pub use types::*;

// Public modules
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod scoring;
pub mod services;
pub mod store;
pub mod types;

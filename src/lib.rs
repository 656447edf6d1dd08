//! # repo-history
//!
//! A small web service that proxies repository searches to the GitHub search
//! API and keeps a short, per-user history of searches and picked repos.
//!
//! ## Request flow
//!
//! ```text
//!   GET /search ──────────────► github::GithubClient ──► api.github.com
//!
//!   POST /save-search ─────┐
//!   POST /selected-repo ───┤
//!   GET  /search-history ──┼──► store::HistoryStore ──► SQLite
//!   GET  /selected-repo-history
//! ```
//!
//! Each save appends a record and trims that email's collection back to the
//! newest N (default 5) in the same transaction.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration
//! - [`models`] - Records, `RepoSummary`, request/response types
//! - [`github`] - Upstream repository search client
//! - [`store`] - Capped per-email history in SQLite
//! - [`error`] - `ApiError` and its HTTP mapping
//! - [`api`] - Axum router and handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod state;
pub mod store;

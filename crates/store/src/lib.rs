//! # Journal Store
//!
//! In-memory repository for the trading journal: trades, strategies, rules,
//! timeframe roles, compliance records, and stored summaries. It presents the
//! same high-level, application-specific interface a database-backed
//! repository would, so the web layer never touches the data structures
//! directly and the analytics crate stays a pure function of its arguments.

pub mod error;
pub mod repository;
pub mod seed;

// Re-export the key components to create a clean, public-facing API.
pub use error::StoreError;
pub use repository::{JournalRepository, StoredSummary, TradeFilter};
pub use seed::seed_demo;

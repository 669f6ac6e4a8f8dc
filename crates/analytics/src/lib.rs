//! # Journal Analytics
//!
//! This crate turns a trader's journaled records into descriptive performance
//! statistics: aggregate metrics, rule-violation cost, calendar-period
//! breakdowns, strategy comparisons, timeframe-sequence performance, and a
//! short narrative summary.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every function here is a synchronous transform
//!   from immutable inputs to a new value. There is no shared state, no I/O,
//!   and nothing to lock; concurrent callers can share the functions freely.
//! - **Infallible by design:** Data-quality issues (missing numbers, missing
//!   entry timestamps, empty inputs) degrade to zeros or skipped records,
//!   never to errors. Division guards are part of the output contract.
//!
//! ## Public API
//!
//! - `calculate_metrics` / `TradeMetrics`: the aggregate metrics reducer.
//! - `calculate_rule_violation_impact` / `RuleViolationImpact`: actual vs.
//!   violation-free P/L and per-rule violation accounting.
//! - `group_trades_by_period`, `period_metrics`, `analyze_periods`: calendar
//!   bucketing and per-bucket metrics.
//! - `compare_strategies`, `timeframe_sequence_analysis`: orchestration over
//!   the reducers above.
//! - `generate_rule_based_summary`, `generate_feedback_actions`,
//!   `fallback_summary`: narrative and recommendation generation.

pub mod analysis;
pub mod metrics;
pub mod periods;
pub mod summary;
pub mod violations;

// Re-export the key components to create a clean, public-facing API.
pub use analysis::{
    analyze_periods, compare_strategies, period_metrics, timeframe_sequence_analysis,
    PeriodMetrics, PeriodWindow, StrategyComparison,
};
pub use metrics::{calculate_metrics, TradeMetrics};
pub use periods::{group_trades_by_period, period_key};
pub use summary::{
    fallback_summary, generate_feedback_actions, generate_rule_based_summary, FeedbackAction,
    FeedbackLists, FeedbackRecommendation, RuleBasedSummary,
};
pub use violations::{
    calculate_rule_violation_impact, rule_adherence_stats, RuleStats, RuleViolationImpact,
};

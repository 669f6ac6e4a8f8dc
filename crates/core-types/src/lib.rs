pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{PeriodType, TradeDirection, TradeOutcome, TradeStatus};
pub use error::CoreError;
pub use structs::{
    RuleCompliance, Strategy, StrategyRule, TimeframeCompliance, TimeframeRole, Trade,
};

use crate::enums::{TradeDirection, TradeOutcome, TradeStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One journaled position. This is a read-only view for the analytics layer:
/// the store owns creation and mutation, the calculators only consume it.
///
/// Optional numeric fields (`profit_loss`, `risk_reward_ratio`) default to
/// zero at the point of use, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    #[serde(rename = "strategy_id", default)]
    pub strategy_id: Option<String>,
    pub pair: String,
    pub direction: TradeDirection,
    pub entry_price: Decimal,
    #[serde(default)]
    pub exit_price: Option<Decimal>,
    pub volume: Decimal,
    /// Entry timestamp. `None` when the source record carried an unusable
    /// date; such trades are skipped by period bucketing instead of failing it.
    #[serde(default)]
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exit_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stop_loss: Option<Decimal>,
    #[serde(default)]
    pub take_profit: Option<Decimal>,
    #[serde(default)]
    pub risk_reward_ratio: Option<Decimal>,
    /// Signed currency amount, populated when the trade closes.
    #[serde(default)]
    pub profit_loss: Option<Decimal>,
    pub status: TradeStatus,
    #[serde(default)]
    pub outcome: Option<TradeOutcome>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A named trading strategy the journal groups trades under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A single discipline rule belonging to a strategy (e.g. "risk max 1%").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRule {
    pub id: String,
    pub strategy_id: String,
    pub description: String,
}

/// One timeframe role in a strategy's multi-timeframe plan, e.g. the "bias"
/// role read on H4 or the "entry" role read on M15.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeRole {
    pub id: String,
    pub strategy_id: String,
    pub role_type: String,
    pub timeframe: String,
}

/// Join record asserting whether a trade followed one strategy rule.
/// A trade with no records counts as fully compliant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCompliance {
    pub trade_id: String,
    pub rule_id: String,
    pub followed: bool,
}

/// Join record asserting a trade's behavior on one timeframe role. The
/// ordered `role_type` values of a trade form its sequence key in the
/// timeframe analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeCompliance {
    pub trade_id: String,
    pub role_type: String,
    pub respected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn trade_round_trips_through_journal_json() {
        let json = r#"{
            "id": "t1",
            "strategy_id": "s1",
            "pair": "EUR/USD",
            "direction": "LONG",
            "entryPrice": 1.0850,
            "exitPrice": 1.0910,
            "volume": 1.5,
            "entryTime": "2026-01-06T09:30:00Z",
            "riskRewardRatio": 2,
            "profitLoss": 90.0,
            "status": "closed",
            "outcome": "WIN"
        }"#;

        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.entry_price, dec!(1.0850));
        assert_eq!(trade.risk_reward_ratio, Some(dec!(2)));
        assert_eq!(trade.status, TradeStatus::Closed);
        assert_eq!(trade.outcome, Some(TradeOutcome::Win));
        assert!(trade.exit_time.is_none());

        let back = serde_json::to_value(&trade).unwrap();
        assert_eq!(back["entryPrice"], serde_json::json!(1.085));
        assert_eq!(back["strategy_id"], "s1");
    }
}

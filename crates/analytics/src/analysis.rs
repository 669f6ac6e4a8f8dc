use crate::metrics::{calculate_metrics, TradeMetrics};
use crate::periods::group_trades_by_period;
use crate::violations::{calculate_rule_violation_impact, RuleViolationImpact};
use chrono::{DateTime, Utc};
use core_types::{PeriodType, RuleCompliance, Strategy, TimeframeCompliance, Trade};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Boundary timestamps of a metrics bucket, taken from the first and last
/// trade of the input. `None` when the bucket is empty or the boundary trade
/// has no entry time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodWindow {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// `TradeMetrics` wrapped with the period envelope, serialized flat so the
/// metrics fields sit next to `period` in the JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub period: PeriodWindow,
    #[serde(flatten)]
    pub metrics: TradeMetrics,
}

/// Computes metrics for one period bucket.
///
/// Callers must supply trades in chronological order; this function reads the
/// boundary dates from the first and last elements and never sorts.
pub fn period_metrics(trades: &[Trade]) -> PeriodMetrics {
    PeriodMetrics {
        period: PeriodWindow {
            start_date: trades.first().and_then(|t| t.entry_time),
            end_date: trades.last().and_then(|t| t.entry_time),
        },
        metrics: calculate_metrics(trades),
    }
}

/// Groups trades by calendar period and computes per-bucket metrics.
pub fn analyze_periods(
    trades: &[Trade],
    period_type: PeriodType,
) -> BTreeMap<String, PeriodMetrics> {
    group_trades_by_period(trades, period_type)
        .into_iter()
        .map(|(key, bucket)| (key, period_metrics(&bucket)))
        .collect()
}

/// One strategy's row in the comparison report: display name, metrics over
/// its trades, and the rule-violation impact over those same trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyComparison {
    pub name: String,
    #[serde(flatten)]
    pub metrics: TradeMetrics,
    pub rule_violation_impact: RuleViolationImpact,
}

/// Compares all strategies side by side, keyed by strategy id. Trades not
/// linked to any strategy are ignored.
pub fn compare_strategies(
    strategies: &[Strategy],
    trades: &[Trade],
    compliance: &[RuleCompliance],
) -> BTreeMap<String, StrategyComparison> {
    let mut analysis = BTreeMap::new();

    for strategy in strategies {
        let strategy_trades: Vec<Trade> = trades
            .iter()
            .filter(|t| t.strategy_id.as_deref() == Some(strategy.id.as_str()))
            .cloned()
            .collect();
        let trade_ids: HashSet<&str> = strategy_trades.iter().map(|t| t.id.as_str()).collect();
        let strategy_compliance: Vec<RuleCompliance> = compliance
            .iter()
            .filter(|c| trade_ids.contains(c.trade_id.as_str()))
            .cloned()
            .collect();

        analysis.insert(
            strategy.id.clone(),
            StrategyComparison {
                name: strategy.name.clone(),
                metrics: calculate_metrics(&strategy_trades),
                rule_violation_impact: calculate_rule_violation_impact(
                    &strategy_trades,
                    &strategy_compliance,
                ),
            },
        );
    }

    analysis
}

/// Groups trades by their declared timeframe-role sequence and computes
/// metrics per sequence, answering which plan (e.g. bias→structure→entry)
/// performs best.
///
/// A trade's sequence key joins the `role_type` values of its compliance
/// records, in the order given, with `→`. Trades with no records group under
/// the literal key `"unknown"`.
pub fn timeframe_sequence_analysis(
    trades: &[Trade],
    timeframe_compliance: &[TimeframeCompliance],
) -> BTreeMap<String, TradeMetrics> {
    let mut sequences: BTreeMap<String, Vec<Trade>> = BTreeMap::new();

    for trade in trades {
        let roles: Vec<&str> = timeframe_compliance
            .iter()
            .filter(|c| c.trade_id == trade.id)
            .map(|c| c.role_type.as_str())
            .collect();
        let key = if roles.is_empty() {
            "unknown".to_string()
        } else {
            roles.join("→")
        };
        sequences.entry(key).or_default().push(trade.clone());
    }

    sequences
        .into_iter()
        .map(|(sequence, sequence_trades)| (sequence, calculate_metrics(&sequence_trades)))
        .collect()
}

use crate::error::StoreError;
use analytics::RuleBasedSummary;
use chrono::{DateTime, Utc};
use core_types::{
    RuleCompliance, Strategy, StrategyRule, TimeframeCompliance, TimeframeRole, Trade,
    TradeOutcome, TradeStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A generated summary persisted for later review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSummary {
    pub id: String,
    pub strategy_id: String,
    pub period: String,
    pub summary: RuleBasedSummary,
    pub created_at: DateTime<Utc>,
}

/// Query-string filters for listing trades. All fields are conjunctive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeFilter {
    pub pair: Option<String>,
    pub status: Option<TradeStatus>,
    pub outcome: Option<TradeOutcome>,
    #[serde(rename = "strategy_id")]
    pub strategy_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl TradeFilter {
    fn matches(&self, trade: &Trade) -> bool {
        if let Some(pair) = &self.pair {
            if &trade.pair != pair {
                return false;
            }
        }
        if let Some(status) = self.status {
            if trade.status != status {
                return false;
            }
        }
        if let Some(outcome) = self.outcome {
            if trade.outcome != Some(outcome) {
                return false;
            }
        }
        if let Some(strategy_id) = &self.strategy_id {
            if trade.strategy_id.as_deref() != Some(strategy_id.as_str()) {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            match trade.entry_time {
                Some(entry) if entry >= start => {}
                _ => return false,
            }
        }
        if let Some(end) = self.end_date {
            match trade.entry_time {
                Some(entry) if entry <= end => {}
                _ => return false,
            }
        }
        true
    }
}

#[derive(Debug, Default)]
struct JournalData {
    trades: Vec<Trade>,
    strategies: Vec<Strategy>,
    rules: Vec<StrategyRule>,
    timeframe_roles: Vec<TimeframeRole>,
    rule_compliance: Vec<RuleCompliance>,
    timeframe_compliance: Vec<TimeframeCompliance>,
    summaries: Vec<StoredSummary>,
}

/// The `JournalRepository` provides a high-level, application-specific
/// interface to the journal data. It encapsulates all access behind an async
/// `RwLock`; handlers clone the repository cheaply and share one dataset.
#[derive(Debug, Clone, Default)]
pub struct JournalRepository {
    inner: Arc<RwLock<JournalData>>,
}

impl JournalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Trades ---

    pub async fn insert_trade(&self, trade: Trade) -> Trade {
        let mut data = self.inner.write().await;
        data.trades.push(trade.clone());
        tracing::debug!(trade_id = %trade.id, pair = %trade.pair, "Inserted trade.");
        trade
    }

    /// Lists trades matching the filter, newest entry time first (trades
    /// without an entry time sort last).
    pub async fn list_trades(&self, filter: &TradeFilter) -> Vec<Trade> {
        let data = self.inner.read().await;
        let mut trades: Vec<Trade> = data
            .trades
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        trades.sort_by(|a, b| match (a.entry_time, b.entry_time) {
            (Some(a_time), Some(b_time)) => b_time.cmp(&a_time),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        trades
    }

    pub async fn get_trade(&self, id: &str) -> Result<Trade, StoreError> {
        let data = self.inner.read().await;
        data.trades
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("trade", id.to_string()))
    }

    /// Replaces the stored trade with the same id.
    pub async fn update_trade(&self, trade: Trade) -> Result<Trade, StoreError> {
        let mut data = self.inner.write().await;
        let slot = data
            .trades
            .iter_mut()
            .find(|t| t.id == trade.id)
            .ok_or_else(|| StoreError::NotFound("trade", trade.id.clone()))?;
        *slot = trade.clone();
        Ok(trade)
    }

    /// Deletes a trade and its compliance records.
    pub async fn delete_trade(&self, id: &str) -> Result<(), StoreError> {
        let mut data = self.inner.write().await;
        let before = data.trades.len();
        data.trades.retain(|t| t.id != id);
        if data.trades.len() == before {
            return Err(StoreError::NotFound("trade", id.to_string()));
        }
        data.rule_compliance.retain(|c| c.trade_id != id);
        data.timeframe_compliance.retain(|c| c.trade_id != id);
        Ok(())
    }

    pub async fn trades_for_strategy(&self, strategy_id: &str) -> Vec<Trade> {
        let data = self.inner.read().await;
        data.trades
            .iter()
            .filter(|t| t.strategy_id.as_deref() == Some(strategy_id))
            .cloned()
            .collect()
    }

    // --- Strategies, rules, timeframe roles ---

    pub async fn insert_strategy(&self, strategy: Strategy) -> Strategy {
        let mut data = self.inner.write().await;
        data.strategies.push(strategy.clone());
        strategy
    }

    pub async fn list_strategies(&self) -> Vec<Strategy> {
        self.inner.read().await.strategies.clone()
    }

    pub async fn get_strategy(&self, id: &str) -> Result<Strategy, StoreError> {
        let data = self.inner.read().await;
        data.strategies
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("strategy", id.to_string()))
    }

    /// Deletes a strategy along with its rules and timeframe roles. Trades
    /// keep their `strategy_id` reference; the journal never destroys trades
    /// implicitly.
    pub async fn delete_strategy(&self, id: &str) -> Result<(), StoreError> {
        let mut data = self.inner.write().await;
        let before = data.strategies.len();
        data.strategies.retain(|s| s.id != id);
        if data.strategies.len() == before {
            return Err(StoreError::NotFound("strategy", id.to_string()));
        }
        data.rules.retain(|r| r.strategy_id != id);
        data.timeframe_roles.retain(|r| r.strategy_id != id);
        Ok(())
    }

    pub async fn insert_rule(&self, rule: StrategyRule) -> Result<StrategyRule, StoreError> {
        let mut data = self.inner.write().await;
        if !data.strategies.iter().any(|s| s.id == rule.strategy_id) {
            return Err(StoreError::NotFound("strategy", rule.strategy_id.clone()));
        }
        data.rules.push(rule.clone());
        Ok(rule)
    }

    pub async fn rules_for_strategy(&self, strategy_id: &str) -> Vec<StrategyRule> {
        let data = self.inner.read().await;
        data.rules
            .iter()
            .filter(|r| r.strategy_id == strategy_id)
            .cloned()
            .collect()
    }

    /// Maps rule ids to their display descriptions, for the adherence report.
    pub async fn rule_names(&self) -> BTreeMap<String, String> {
        let data = self.inner.read().await;
        data.rules
            .iter()
            .map(|r| (r.id.clone(), r.description.clone()))
            .collect()
    }

    pub async fn insert_timeframe_role(
        &self,
        role: TimeframeRole,
    ) -> Result<TimeframeRole, StoreError> {
        let mut data = self.inner.write().await;
        if !data.strategies.iter().any(|s| s.id == role.strategy_id) {
            return Err(StoreError::NotFound("strategy", role.strategy_id.clone()));
        }
        data.timeframe_roles.push(role.clone());
        Ok(role)
    }

    pub async fn roles_for_strategy(&self, strategy_id: &str) -> Vec<TimeframeRole> {
        let data = self.inner.read().await;
        data.timeframe_roles
            .iter()
            .filter(|r| r.strategy_id == strategy_id)
            .cloned()
            .collect()
    }

    // --- Compliance records ---

    /// Replaces a trade's rule-compliance record set.
    pub async fn set_rule_compliance(
        &self,
        trade_id: &str,
        records: Vec<RuleCompliance>,
    ) -> Result<Vec<RuleCompliance>, StoreError> {
        let mut data = self.inner.write().await;
        if !data.trades.iter().any(|t| t.id == trade_id) {
            return Err(StoreError::UnknownTrade(trade_id.to_string()));
        }
        data.rule_compliance.retain(|c| c.trade_id != trade_id);
        data.rule_compliance.extend(records.clone());
        Ok(records)
    }

    /// Replaces a trade's timeframe-compliance record set, keeping the order
    /// given (the order defines the trade's sequence key).
    pub async fn set_timeframe_compliance(
        &self,
        trade_id: &str,
        records: Vec<TimeframeCompliance>,
    ) -> Result<Vec<TimeframeCompliance>, StoreError> {
        let mut data = self.inner.write().await;
        if !data.trades.iter().any(|t| t.id == trade_id) {
            return Err(StoreError::UnknownTrade(trade_id.to_string()));
        }
        data.timeframe_compliance.retain(|c| c.trade_id != trade_id);
        data.timeframe_compliance.extend(records.clone());
        Ok(records)
    }

    pub async fn all_rule_compliance(&self) -> Vec<RuleCompliance> {
        self.inner.read().await.rule_compliance.clone()
    }

    pub async fn all_timeframe_compliance(&self) -> Vec<TimeframeCompliance> {
        self.inner.read().await.timeframe_compliance.clone()
    }

    pub async fn rule_compliance_for_trades(&self, trade_ids: &[String]) -> Vec<RuleCompliance> {
        let data = self.inner.read().await;
        data.rule_compliance
            .iter()
            .filter(|c| trade_ids.iter().any(|id| id == &c.trade_id))
            .cloned()
            .collect()
    }

    // --- Summaries ---

    pub async fn insert_summary(&self, summary: StoredSummary) -> StoredSummary {
        let mut data = self.inner.write().await;
        data.summaries.push(summary.clone());
        summary
    }

    /// Stored summaries, newest first.
    pub async fn list_summaries(&self) -> Vec<StoredSummary> {
        let data = self.inner.read().await;
        let mut summaries = data.summaries.clone();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TradeDirection;
    use rust_decimal_macros::dec;

    fn trade(id: &str, pair: &str, strategy_id: Option<&str>, entry_time: &str) -> Trade {
        Trade {
            id: id.to_string(),
            strategy_id: strategy_id.map(str::to_string),
            pair: pair.to_string(),
            direction: TradeDirection::Long,
            entry_price: dec!(1.1),
            exit_price: None,
            volume: dec!(1),
            entry_time: entry_time.parse().ok(),
            exit_time: None,
            stop_loss: None,
            take_profit: None,
            risk_reward_ratio: None,
            profit_loss: None,
            status: TradeStatus::Open,
            outcome: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn trade_crud_round_trip() {
        let repo = JournalRepository::new();
        repo.insert_trade(trade("t1", "EUR/USD", None, "2026-01-05T10:00:00Z"))
            .await;

        let mut updated = repo.get_trade("t1").await.unwrap();
        updated.status = TradeStatus::Closed;
        updated.outcome = Some(TradeOutcome::Win);
        repo.update_trade(updated).await.unwrap();
        assert_eq!(
            repo.get_trade("t1").await.unwrap().status,
            TradeStatus::Closed
        );

        repo.delete_trade("t1").await.unwrap();
        assert!(repo.get_trade("t1").await.is_err());
        assert!(repo.delete_trade("t1").await.is_err());
    }

    #[tokio::test]
    async fn list_trades_filters_and_sorts_newest_first() {
        let repo = JournalRepository::new();
        repo.insert_trade(trade("t1", "EUR/USD", Some("s1"), "2026-01-05T10:00:00Z"))
            .await;
        repo.insert_trade(trade("t2", "GBP/USD", Some("s1"), "2026-01-07T10:00:00Z"))
            .await;
        repo.insert_trade(trade("t3", "EUR/USD", None, "2026-01-06T10:00:00Z"))
            .await;

        let all = repo.list_trades(&TradeFilter::default()).await;
        assert_eq!(
            all.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            vec!["t2", "t3", "t1"]
        );

        let eur = repo
            .list_trades(&TradeFilter {
                pair: Some("EUR/USD".to_string()),
                ..TradeFilter::default()
            })
            .await;
        assert_eq!(eur.len(), 2);

        let windowed = repo
            .list_trades(&TradeFilter {
                start_date: Some("2026-01-06T00:00:00Z".parse().unwrap()),
                end_date: Some("2026-01-06T23:59:59Z".parse().unwrap()),
                ..TradeFilter::default()
            })
            .await;
        assert_eq!(windowed.len(), 1);
        assert_eq!(windowed[0].id, "t3");
    }

    #[tokio::test]
    async fn compliance_set_replaces_existing_records() {
        let repo = JournalRepository::new();
        repo.insert_trade(trade("t1", "EUR/USD", None, "2026-01-05T10:00:00Z"))
            .await;

        let record = |rule_id: &str, followed| RuleCompliance {
            trade_id: "t1".to_string(),
            rule_id: rule_id.to_string(),
            followed,
        };
        repo.set_rule_compliance("t1", vec![record("r1", true), record("r2", false)])
            .await
            .unwrap();
        repo.set_rule_compliance("t1", vec![record("r1", false)])
            .await
            .unwrap();

        let records = repo.all_rule_compliance().await;
        assert_eq!(records.len(), 1);
        assert!(!records[0].followed);

        let missing = repo
            .set_rule_compliance("nope", vec![record("r1", true)])
            .await;
        assert!(matches!(missing, Err(StoreError::UnknownTrade(_))));
    }

    #[tokio::test]
    async fn deleting_strategy_keeps_trades() {
        let repo = JournalRepository::new();
        repo.insert_strategy(Strategy {
            id: "s1".to_string(),
            name: "London Breakout".to_string(),
            description: None,
        })
        .await;
        repo.insert_rule(StrategyRule {
            id: "r1".to_string(),
            strategy_id: "s1".to_string(),
            description: "Wait for session open".to_string(),
        })
        .await
        .unwrap();
        repo.insert_trade(trade("t1", "EUR/USD", Some("s1"), "2026-01-05T10:00:00Z"))
            .await;

        repo.delete_strategy("s1").await.unwrap();
        assert!(repo.rules_for_strategy("s1").await.is_empty());
        assert_eq!(repo.trades_for_strategy("s1").await.len(), 1);
    }
}

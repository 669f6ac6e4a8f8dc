use crate::repository::JournalRepository;
use chrono::{DateTime, Utc};
use core_types::{
    RuleCompliance, Strategy, StrategyRule, TimeframeCompliance, TimeframeRole, Trade,
    TradeDirection, TradeOutcome, TradeStatus,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn ts(s: &str) -> Option<DateTime<Utc>> {
    s.parse().ok()
}

#[allow(clippy::too_many_arguments)]
fn demo_trade(
    id: &str,
    pair: &str,
    direction: TradeDirection,
    entry_time: &str,
    rr: Decimal,
    profit_loss: Decimal,
    outcome: TradeOutcome,
) -> Trade {
    Trade {
        id: id.to_string(),
        strategy_id: Some("demo-strategy".to_string()),
        pair: pair.to_string(),
        direction,
        entry_price: dec!(1.0850),
        exit_price: Some(dec!(1.0910)),
        volume: dec!(1.0),
        entry_time: ts(entry_time),
        exit_time: None,
        stop_loss: None,
        take_profit: None,
        risk_reward_ratio: Some(rr),
        profit_loss: Some(profit_loss),
        status: TradeStatus::Closed,
        outcome: Some(outcome),
        notes: None,
    }
}

/// Populates the repository with a demo strategy, its rules and timeframe
/// roles, and a small set of closed trades with compliance records, so the
/// dashboard has data to show on a fresh start.
pub async fn seed_demo(repo: &JournalRepository) {
    repo.insert_strategy(Strategy {
        id: "demo-strategy".to_string(),
        name: "London Breakout".to_string(),
        description: Some("Trade the first displacement after London open.".to_string()),
    })
    .await;

    for (id, description) in [
        ("rule-session", "Wait for the London session open"),
        ("rule-risk", "Risk max 1% per trade"),
        ("rule-news", "No trades during red news"),
    ] {
        // Strategy exists, insert cannot fail.
        let _ = repo
            .insert_rule(StrategyRule {
                id: id.to_string(),
                strategy_id: "demo-strategy".to_string(),
                description: description.to_string(),
            })
            .await;
    }

    for (id, role_type, timeframe) in [
        ("role-bias", "bias", "H4"),
        ("role-structure", "structure", "H1"),
        ("role-entry", "entry", "M15"),
    ] {
        let _ = repo
            .insert_timeframe_role(TimeframeRole {
                id: id.to_string(),
                strategy_id: "demo-strategy".to_string(),
                role_type: role_type.to_string(),
                timeframe: timeframe.to_string(),
            })
            .await;
    }

    let trades = vec![
        demo_trade("demo-t1", "EUR/USD", TradeDirection::Long, "2026-01-06T08:30:00Z", dec!(2.0), dec!(200), TradeOutcome::Win),
        demo_trade("demo-t2", "EUR/USD", TradeDirection::Short, "2026-01-13T09:15:00Z", dec!(-1.0), dec!(-100), TradeOutcome::Loss),
        demo_trade("demo-t3", "GBP/USD", TradeDirection::Long, "2026-01-21T08:45:00Z", dec!(3.0), dec!(300), TradeOutcome::Win),
        demo_trade("demo-t4", "GBP/USD", TradeDirection::Long, "2026-02-03T08:20:00Z", dec!(0.0), dec!(0), TradeOutcome::Breakeven),
        demo_trade("demo-t5", "EUR/USD", TradeDirection::Short, "2026-02-11T10:05:00Z", dec!(-1.0), dec!(-95), TradeOutcome::Loss),
        demo_trade("demo-t6", "USD/JPY", TradeDirection::Long, "2026-02-24T08:35:00Z", dec!(2.5), dec!(250), TradeOutcome::Win),
    ];
    let trade_count = trades.len();
    for trade in trades {
        repo.insert_trade(trade).await;
    }

    // demo-t2 broke the news rule, demo-t5 broke the risk rule.
    // set_rule_compliance replaces a trade's record set, so records are
    // grouped per trade before writing.
    let compliance: [(&str, &[(&str, bool)]); 4] = [
        ("demo-t1", &[("rule-session", true), ("rule-risk", true)]),
        ("demo-t2", &[("rule-news", false)]),
        ("demo-t3", &[("rule-session", true)]),
        ("demo-t5", &[("rule-risk", false), ("rule-news", true)]),
    ];
    for (trade_id, records) in compliance {
        let records = records
            .iter()
            .map(|(rule_id, followed)| RuleCompliance {
                trade_id: trade_id.to_string(),
                rule_id: rule_id.to_string(),
                followed: *followed,
            })
            .collect();
        let _ = repo.set_rule_compliance(trade_id, records).await;
    }

    for trade_id in ["demo-t1", "demo-t3", "demo-t6"] {
        let records = ["bias", "structure", "entry"]
            .into_iter()
            .map(|role_type| TimeframeCompliance {
                trade_id: trade_id.to_string(),
                role_type: role_type.to_string(),
                respected: true,
            })
            .collect();
        let _ = repo.set_timeframe_compliance(trade_id, records).await;
    }

    tracing::info!(trades = trade_count, "Seeded demo journal data.");
}

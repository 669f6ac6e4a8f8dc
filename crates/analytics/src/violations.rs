use crate::metrics::round2;
use core_types::{RuleCompliance, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Actual vs. hypothetical (violation-free) profitability plus per-rule
/// violation accounting. `impact_from_violations` is negative when breaking
/// rules cost money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolationImpact {
    #[serde(rename = "actualPL")]
    pub actual_pl: Decimal,
    /// Sum of P/L over only the trades with zero violations.
    #[serde(rename = "hypotheticalPL")]
    pub hypothetical_pl: Decimal,
    pub impact_from_violations: Decimal,
    pub rule_violation_counts: BTreeMap<String, u32>,
    #[serde(rename = "ruleViolationPL")]
    pub rule_violation_pl: BTreeMap<String, Decimal>,
}

/// Cross-references trades against their rule-compliance records.
///
/// Each trade is visited once: its P/L always feeds `actual_pl`, and feeds
/// `hypothetical_pl` only when the trade has no `followed == false` record.
/// Every violation record increments its rule's count and adds the trade's
/// P/L to that rule's accumulator (trade-rule pairs are expected to be
/// unique, so no double counting).
pub fn calculate_rule_violation_impact(
    trades: &[Trade],
    compliance: &[RuleCompliance],
) -> RuleViolationImpact {
    let mut actual_pl = Decimal::ZERO;
    let mut hypothetical_pl = Decimal::ZERO;
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut violation_pl: BTreeMap<String, Decimal> = BTreeMap::new();

    for trade in trades {
        let pl = trade.profit_loss.unwrap_or_default();
        actual_pl += pl;

        let violations: Vec<&RuleCompliance> = compliance
            .iter()
            .filter(|c| c.trade_id == trade.id && !c.followed)
            .collect();

        if violations.is_empty() {
            hypothetical_pl += pl;
        }
        for violation in violations {
            *counts.entry(violation.rule_id.clone()).or_insert(0) += 1;
            *violation_pl
                .entry(violation.rule_id.clone())
                .or_insert(Decimal::ZERO) += pl;
        }
    }

    RuleViolationImpact {
        actual_pl: round2(actual_pl),
        hypothetical_pl: round2(hypothetical_pl),
        impact_from_violations: round2(actual_pl - hypothetical_pl),
        rule_violation_counts: counts,
        rule_violation_pl: violation_pl
            .into_iter()
            .map(|(rule_id, pl)| (rule_id, round2(pl)))
            .collect(),
    }
}

/// Per-rule adherence breakdown for the rule-violations report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleStats {
    pub rule_name: String,
    pub total_trades: u32,
    pub violations: u32,
    pub adherence: u32,
    pub violation_rate: Decimal,
    pub adherence_rate: Decimal,
}

/// Tallies how often each rule was followed vs. violated across all
/// compliance records. `rule_names` maps rule ids to display descriptions;
/// unknown ids get the label "Unknown".
pub fn rule_adherence_stats(
    compliance: &[RuleCompliance],
    rule_names: &BTreeMap<String, String>,
) -> BTreeMap<String, RuleStats> {
    let mut stats: BTreeMap<String, RuleStats> = BTreeMap::new();

    for record in compliance {
        let entry = stats
            .entry(record.rule_id.clone())
            .or_insert_with(|| RuleStats {
                rule_name: rule_names
                    .get(&record.rule_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                total_trades: 0,
                violations: 0,
                adherence: 0,
                violation_rate: Decimal::ZERO,
                adherence_rate: Decimal::ZERO,
            });
        entry.total_trades += 1;
        if record.followed {
            entry.adherence += 1;
        } else {
            entry.violations += 1;
        }
    }

    for entry in stats.values_mut() {
        let total = Decimal::from(entry.total_trades);
        entry.violation_rate = round2(Decimal::from(entry.violations) / total * Decimal::from(100));
        entry.adherence_rate = round2(Decimal::from(entry.adherence) / total * Decimal::from(100));
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::tests::make_trade;
    use core_types::TradeOutcome;
    use rust_decimal_macros::dec;

    fn compliance(trade_id: &str, rule_id: &str, followed: bool) -> RuleCompliance {
        RuleCompliance {
            trade_id: trade_id.to_string(),
            rule_id: rule_id.to_string(),
            followed,
        }
    }

    #[test]
    fn no_violations_means_zero_impact() {
        let trades = vec![
            make_trade("t1", TradeOutcome::Win, dec!(2), dec!(120)),
            make_trade("t2", TradeOutcome::Loss, dec!(-1), dec!(-40)),
        ];
        // One compliant record, one trade with no records at all.
        let records = vec![compliance("t1", "r1", true)];

        let impact = calculate_rule_violation_impact(&trades, &records);
        assert_eq!(impact.actual_pl, dec!(80));
        assert_eq!(impact.hypothetical_pl, dec!(80));
        assert_eq!(impact.impact_from_violations, Decimal::ZERO);
        assert!(impact.rule_violation_counts.is_empty());
    }

    #[test]
    fn violating_trades_drop_out_of_hypothetical_pl() {
        let trades = vec![
            make_trade("t1", TradeOutcome::Win, dec!(2), dec!(100)),
            make_trade("t2", TradeOutcome::Loss, dec!(-1), dec!(-60)),
            make_trade("t3", TradeOutcome::Loss, dec!(-1), dec!(-40)),
        ];
        let records = vec![
            compliance("t1", "r1", true),
            compliance("t2", "r1", false),
            compliance("t3", "r1", false),
            compliance("t3", "r2", false),
        ];

        let impact = calculate_rule_violation_impact(&trades, &records);
        assert_eq!(impact.actual_pl, dec!(0));
        assert_eq!(impact.hypothetical_pl, dec!(100));
        assert_eq!(impact.impact_from_violations, dec!(-100));
        assert_eq!(impact.rule_violation_counts["r1"], 2);
        assert_eq!(impact.rule_violation_counts["r2"], 1);
        assert_eq!(impact.rule_violation_pl["r1"], dec!(-100));
        assert_eq!(impact.rule_violation_pl["r2"], dec!(-40));
    }

    #[test]
    fn adherence_stats_compute_rates_per_rule() {
        let records = vec![
            compliance("t1", "r1", true),
            compliance("t2", "r1", true),
            compliance("t3", "r1", false),
            compliance("t1", "r2", false),
        ];
        let mut names = BTreeMap::new();
        names.insert("r1".to_string(), "Risk max 1% per trade".to_string());

        let stats = rule_adherence_stats(&records, &names);
        let r1 = &stats["r1"];
        assert_eq!(r1.rule_name, "Risk max 1% per trade");
        assert_eq!(r1.total_trades, 3);
        assert_eq!(r1.violations, 1);
        assert_eq!(r1.violation_rate, dec!(33.33));
        assert_eq!(r1.adherence_rate, dec!(66.67));
        // Unlisted rule falls back to the Unknown label.
        assert_eq!(stats["r2"].rule_name, "Unknown");
        assert_eq!(stats["r2"].violation_rate, dec!(100));
    }
}

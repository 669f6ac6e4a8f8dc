use crate::metrics::TradeMetrics;
use crate::violations::RuleViolationImpact;
use core_types::Strategy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Feedback-action buckets attached to a summary.
///
/// `generate_rule_based_summary` always returns these empty; the populated
/// recommendations come from `generate_feedback_actions`, which is exposed
/// separately and not wired into the summary (see DESIGN.md).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackLists {
    pub stop: Vec<String>,
    #[serde(rename = "continue")]
    pub continue_: Vec<String>,
    pub experiment: Vec<String>,
}

/// A narrative insight string plus the (empty) feedback buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBasedSummary {
    pub narrative: String,
    pub feedback: FeedbackLists,
}

/// Turns computed metrics into a space-joined string of threshold-triggered
/// insight sentences. Purely a string transformation; safe to call repeatedly.
pub fn generate_rule_based_summary(
    metrics: &TradeMetrics,
    _strategies: &[Strategy],
    rule_violation_impact: Option<&RuleViolationImpact>,
) -> RuleBasedSummary {
    let mut insights = Vec::new();

    // Win rate analysis
    if metrics.win_rate > dec!(60) {
        insights.push(format!(
            "Excellent win rate of {}% — focus on consistency and maintaining edge.",
            metrics.win_rate.normalize()
        ));
    } else if metrics.win_rate < dec!(30) {
        insights.push(format!(
            "Win rate is {}% — review entry logic and rule adherence.",
            metrics.win_rate.normalize()
        ));
    }

    // Expectancy analysis
    if metrics.expectancy > dec!(1.0) {
        insights.push(format!(
            "Positive expectancy of {}R per trade — the strategy is profitable.",
            metrics.expectancy.normalize()
        ));
    } else if metrics.expectancy < Decimal::ZERO {
        insights.push(format!(
            "Negative expectancy of {}R — strategy needs refinement.",
            metrics.expectancy.normalize()
        ));
    }

    // Rule adherence
    if let Some(impact) = rule_violation_impact {
        if impact.impact_from_violations < Decimal::ZERO {
            insights.push(format!(
                "Rule violations cost you {:.2}R — stricter discipline needed.",
                impact.impact_from_violations.abs()
            ));
        }
    }

    RuleBasedSummary {
        narrative: insights.join(" "),
        feedback: FeedbackLists::default(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FeedbackAction {
    Continue,
    Experiment,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecommendation {
    pub action: FeedbackAction,
    pub reason: String,
}

/// Derives CONTINUE/EXPERIMENT/STOP recommendations from metric thresholds.
/// `rule_violations` is the count of `followed == false` compliance records
/// behind the metrics.
pub fn generate_feedback_actions(
    metrics: &TradeMetrics,
    rule_violations: usize,
) -> Vec<FeedbackRecommendation> {
    let mut actions = Vec::new();

    if metrics.win_rate >= dec!(60) && metrics.profit_factor > dec!(2) {
        actions.push(FeedbackRecommendation {
            action: FeedbackAction::Continue,
            reason: "Strong strategy performance. Continue with current approach.".to_string(),
        });
    }

    if metrics.win_rate >= dec!(45) && metrics.win_rate < dec!(55) {
        actions.push(FeedbackRecommendation {
            action: FeedbackAction::Experiment,
            reason: "Average performance. Test new entry models or timeframes.".to_string(),
        });
    }

    if Decimal::from(rule_violations) > Decimal::from(metrics.total_trades) * dec!(0.4) {
        actions.push(FeedbackRecommendation {
            action: FeedbackAction::Stop,
            reason: "Excessive rule violations detected. Stop trading until you improve discipline."
                .to_string(),
        });
    }

    if metrics.profit_factor < Decimal::ONE {
        actions.push(FeedbackRecommendation {
            action: FeedbackAction::Stop,
            reason: "Strategy is unprofitable. Review and fix before continuing.".to_string(),
        });
    }

    actions
}

/// Deterministic markdown summary used when no AI backend is configured.
pub fn fallback_summary(metrics: &TradeMetrics, rule_violations: usize, period: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    let mut period_title = period.to_string();
    if let Some(first) = period_title.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    parts.push(format!("**{} Trading Summary**\n", period_title));
    parts.push(format!(
        "Completed {} trades with a {:.1}% win rate.\n",
        metrics.total_trades, metrics.win_rate
    ));

    if metrics.win_rate >= dec!(55) {
        parts.push("📈 Strong performance this period. Maintain current strategy.\n".to_string());
    } else if metrics.win_rate >= dec!(45) {
        parts.push("➡️ Average performance. Review rule adherence.\n".to_string());
    } else {
        parts.push("📉 Below target win rate. Analyze violations and adjust rules.\n".to_string());
    }

    if Decimal::from(rule_violations) > Decimal::from(metrics.total_trades) * dec!(0.3) {
        parts.push("⚠️ High rule violation rate. Focus on discipline next period.\n".to_string());
    }

    if metrics.profit_factor > dec!(2) {
        parts.push("💪 Excellent profit factor. Scale up if comfortable.\n".to_string());
    } else if metrics.profit_factor < Decimal::ONE {
        parts.push("⚡ Losses exceed wins. Pause trading and review strategy.\n".to_string());
    }

    parts.join("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn metrics_with(win_rate: Decimal, expectancy: Decimal, profit_factor: Decimal) -> TradeMetrics {
        TradeMetrics {
            total_trades: 10,
            closed_trades: 10,
            win_rate,
            expectancy,
            profit_factor,
            ..TradeMetrics::new()
        }
    }

    fn impact_of(amount: Decimal) -> RuleViolationImpact {
        RuleViolationImpact {
            actual_pl: Decimal::ZERO,
            hypothetical_pl: -amount,
            impact_from_violations: amount,
            rule_violation_counts: BTreeMap::new(),
            rule_violation_pl: BTreeMap::new(),
        }
    }

    #[test]
    fn high_win_rate_triggers_excellent_insight() {
        let summary =
            generate_rule_based_summary(&metrics_with(dec!(65), dec!(0.5), dec!(1.5)), &[], None);
        assert!(summary.narrative.contains("Excellent win rate of 65%"));
        assert!(summary.feedback.stop.is_empty());
        assert!(summary.feedback.continue_.is_empty());
        assert!(summary.feedback.experiment.is_empty());
    }

    #[test]
    fn low_win_rate_and_negative_expectancy_insights() {
        let summary =
            generate_rule_based_summary(&metrics_with(dec!(25), dec!(-0.4), dec!(0.6)), &[], None);
        assert!(summary.narrative.contains("Win rate is 25%"));
        assert!(summary.narrative.contains("Negative expectancy of -0.4R"));
    }

    #[test]
    fn violation_cost_insight_uses_absolute_value() {
        let metrics = metrics_with(dec!(50), dec!(1.2), dec!(2.0));
        let impact = impact_of(dec!(-3.75));
        let summary = generate_rule_based_summary(&metrics, &[], Some(&impact));
        assert!(summary
            .narrative
            .contains("Positive expectancy of 1.2R per trade"));
        assert!(summary.narrative.contains("cost you 3.75R"));
    }

    #[test]
    fn quiet_middle_band_produces_empty_narrative() {
        let summary =
            generate_rule_based_summary(&metrics_with(dec!(45), dec!(0.5), dec!(1.2)), &[], None);
        assert_eq!(summary.narrative, "");
    }

    #[test]
    fn feedback_actions_cover_each_threshold() {
        let strong = generate_feedback_actions(&metrics_with(dec!(62), dec!(1.5), dec!(2.5)), 0);
        assert_eq!(strong.len(), 1);
        assert_eq!(strong[0].action, FeedbackAction::Continue);

        let average = generate_feedback_actions(&metrics_with(dec!(50), dec!(0.2), dec!(1.1)), 0);
        assert_eq!(average[0].action, FeedbackAction::Experiment);

        // 5 violations over 10 trades crosses the 40% line, and pf < 1 adds
        // a second STOP.
        let undisciplined =
            generate_feedback_actions(&metrics_with(dec!(58), dec!(-0.2), dec!(0.8)), 5);
        let stops: Vec<_> = undisciplined
            .iter()
            .filter(|a| a.action == FeedbackAction::Stop)
            .collect();
        assert_eq!(stops.len(), 2);
    }

    #[test]
    fn fallback_summary_picks_branch_per_band() {
        let strong = fallback_summary(&metrics_with(dec!(60), dec!(1.0), dec!(2.5)), 0, "monthly");
        assert!(strong.starts_with("**Monthly Trading Summary**"));
        assert!(strong.contains("Strong performance"));
        assert!(strong.contains("Excellent profit factor"));

        let weak = fallback_summary(&metrics_with(dec!(30), dec!(-0.5), dec!(0.5)), 6, "weekly");
        assert!(weak.contains("Below target win rate"));
        assert!(weak.contains("High rule violation rate"));
        assert!(weak.contains("Losses exceed wins"));
    }
}

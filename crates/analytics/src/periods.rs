use chrono::{DateTime, Datelike, Duration, Utc};
use core_types::{PeriodType, Trade};
use std::collections::BTreeMap;

/// Buckets trades into calendar periods by entry timestamp.
///
/// Trades without a usable entry time are skipped rather than failing the
/// pass. Input order is preserved inside each bucket, and the `BTreeMap`
/// keys sort chronologically because every key format is zero-padded.
pub fn group_trades_by_period(
    trades: &[Trade],
    period_type: PeriodType,
) -> BTreeMap<String, Vec<Trade>> {
    let mut groups: BTreeMap<String, Vec<Trade>> = BTreeMap::new();

    for trade in trades {
        let Some(entry_time) = trade.entry_time else {
            continue;
        };
        groups
            .entry(period_key(entry_time, period_type))
            .or_default()
            .push(trade.clone());
    }

    groups
}

/// Derives the bucket key for a timestamp.
///
/// - day: `YYYY-MM-DD`
/// - week: `YYYY-MM-DD` of the Sunday starting that week
/// - month: `YYYY-MM`
/// - quarter: `YYYY-Q{1..4}`
/// - half: `YYYY-H1` (Jan-Jun) or `YYYY-H2`
/// - year: `YYYY`
pub fn period_key(entry_time: DateTime<Utc>, period_type: PeriodType) -> String {
    match period_type {
        PeriodType::Day => entry_time.format("%Y-%m-%d").to_string(),
        PeriodType::Week => {
            let days_since_sunday = entry_time.weekday().num_days_from_sunday() as i64;
            let week_start = entry_time.date_naive() - Duration::days(days_since_sunday);
            week_start.format("%Y-%m-%d").to_string()
        }
        PeriodType::Month => entry_time.format("%Y-%m").to_string(),
        PeriodType::Quarter => {
            format!("{}-Q{}", entry_time.year(), entry_time.month().div_ceil(3))
        }
        PeriodType::Half => {
            let half = if entry_time.month() <= 6 { 1 } else { 2 };
            format!("{}-H{}", entry_time.year(), half)
        }
        PeriodType::Year => entry_time.year().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::tests::make_trade;
    use core_types::TradeOutcome;
    use rust_decimal_macros::dec;

    fn trade_on(id: &str, timestamp: &str) -> Trade {
        let mut t = make_trade(id, TradeOutcome::Win, dec!(1), dec!(10));
        t.entry_time = Some(timestamp.parse().unwrap());
        t
    }

    fn key_for(timestamp: &str, period_type: PeriodType) -> String {
        period_key(timestamp.parse().unwrap(), period_type)
    }

    #[test]
    fn month_key_is_year_dash_padded_month() {
        assert_eq!(key_for("2026-01-06T10:00:00Z", PeriodType::Month), "2026-01");
        assert_eq!(key_for("2026-11-30T23:59:59Z", PeriodType::Month), "2026-11");
    }

    #[test]
    fn week_key_is_the_preceding_sunday() {
        // 2026-01-06 is a Tuesday; its week starts Sunday 2026-01-04.
        assert_eq!(
            key_for("2026-01-06T10:00:00Z", PeriodType::Week),
            "2026-01-04"
        );
        // A Sunday is its own week start.
        assert_eq!(
            key_for("2026-01-04T00:00:00Z", PeriodType::Week),
            "2026-01-04"
        );
        // Week start can fall in the previous year.
        assert_eq!(
            key_for("2026-01-02T12:00:00Z", PeriodType::Week),
            "2025-12-28"
        );
    }

    #[test]
    fn quarter_and_half_boundaries() {
        assert_eq!(
            key_for("2026-04-01T00:00:00Z", PeriodType::Quarter),
            "2026-Q2"
        );
        assert_eq!(key_for("2026-04-01T00:00:00Z", PeriodType::Half), "2026-H1");
        assert_eq!(
            key_for("2026-07-15T00:00:00Z", PeriodType::Quarter),
            "2026-Q3"
        );
        assert_eq!(key_for("2026-07-15T00:00:00Z", PeriodType::Half), "2026-H2");
        assert_eq!(
            key_for("2026-12-31T23:00:00Z", PeriodType::Quarter),
            "2026-Q4"
        );
        assert_eq!(key_for("2026-12-31T23:00:00Z", PeriodType::Year), "2026");
    }

    #[test]
    fn daily_buckets_partition_datable_trades_exactly_once() {
        let mut undated = trade_on("t3", "2026-02-02T08:00:00Z");
        undated.entry_time = None;
        let trades = vec![
            trade_on("t1", "2026-02-02T08:00:00Z"),
            trade_on("t2", "2026-02-03T08:00:00Z"),
            undated,
            trade_on("t4", "2026-02-02T17:00:00Z"),
        ];

        let groups = group_trades_by_period(&trades, PeriodType::Day);
        let all_ids: Vec<&str> = groups
            .values()
            .flatten()
            .map(|t| t.id.as_str())
            .collect();
        // t3 is excluded; t1 and t4 keep their relative order in the bucket.
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups["2026-02-02"]
                .iter()
                .map(|t| t.id.as_str())
                .collect::<Vec<_>>(),
            vec!["t1", "t4"]
        );
        assert_eq!(all_ids.len(), 3);
        assert!(!all_ids.contains(&"t3"));
    }
}

use core_types::{Trade, TradeOutcome, TradeStatus};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Aggregate performance statistics over a set of journaled trades.
///
/// This struct is the standard output of the metrics reducer and the building
/// block for every higher-level analysis (per-period, per-strategy,
/// per-sequence). Serialized field names match the journal's JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeMetrics {
    pub total_trades: usize,
    pub closed_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    /// Percentage of closed trades that won, 0-100.
    pub win_rate: Decimal,
    /// Sum of risk-reward ratios over ALL trades, open ones included.
    #[serde(rename = "totalRR")]
    pub total_rr: Decimal,
    /// Average R of winning trades.
    pub avg_win: Decimal,
    /// Average loss amount, stored as a negative number (0 with no losses).
    pub avg_loss: Decimal,
    pub expectancy: Decimal,
    pub profit_factor: Decimal,
}

impl TradeMetrics {
    /// Creates a new, zeroed-out TradeMetrics.
    /// This is the result for an empty trade set and the starting point otherwise.
    pub fn new() -> Self {
        Self {
            total_trades: 0,
            closed_trades: 0,
            wins: 0,
            losses: 0,
            breakeven: 0,
            win_rate: Decimal::ZERO,
            total_rr: Decimal::ZERO,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            expectancy: Decimal::ZERO,
            profit_factor: Decimal::ZERO,
        }
    }
}

impl Default for TradeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Rounds to 2 decimal places, midpoint away from zero.
pub(crate) fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Reduces a set of trades into a `TradeMetrics`.
///
/// Closed trades are partitioned by outcome; win/loss averages are measured
/// in R for wins and in currency for losses, mirroring how the journal
/// records them. Missing `risk_reward_ratio` / `profit_loss` values count
/// as zero.
///
/// Two guards are deliberate output behavior, not just crash protection:
/// with no losses, `profit_factor` and `expectancy` are both 0 even when
/// every trade won, and with no closed trades `win_rate` is 0.
pub fn calculate_metrics(trades: &[Trade]) -> TradeMetrics {
    if trades.is_empty() {
        return TradeMetrics::new();
    }

    let closed: Vec<&Trade> = trades
        .iter()
        .filter(|t| t.status == TradeStatus::Closed)
        .collect();
    let wins: Vec<&Trade> = closed
        .iter()
        .copied()
        .filter(|t| t.outcome == Some(TradeOutcome::Win))
        .collect();
    let losses: Vec<&Trade> = closed
        .iter()
        .copied()
        .filter(|t| t.outcome == Some(TradeOutcome::Loss))
        .collect();
    let breakeven = closed
        .iter()
        .filter(|t| t.outcome == Some(TradeOutcome::Breakeven))
        .count();

    // Summed over all trades, not just closed ones.
    let total_rr: Decimal = trades
        .iter()
        .map(|t| t.risk_reward_ratio.unwrap_or_default())
        .sum();
    let total_win_rr: Decimal = wins
        .iter()
        .map(|t| t.risk_reward_ratio.unwrap_or_default())
        .sum();
    let total_loss_amount: Decimal = losses
        .iter()
        .map(|t| t.profit_loss.unwrap_or_default())
        .sum::<Decimal>()
        .abs();

    let win_rate = if closed.is_empty() {
        Decimal::ZERO
    } else {
        Decimal::from(wins.len()) / Decimal::from(closed.len()) * Decimal::from(100)
    };
    let avg_win = if wins.is_empty() {
        Decimal::ZERO
    } else {
        total_win_rr / Decimal::from(wins.len())
    };
    let avg_loss = if losses.is_empty() {
        Decimal::ZERO
    } else {
        -(total_loss_amount / Decimal::from(losses.len()))
    };
    let profit_factor = if avg_loss.abs() > Decimal::ZERO {
        avg_win / avg_loss.abs()
    } else {
        Decimal::ZERO
    };
    let expectancy = if !wins.is_empty() && !losses.is_empty() {
        (Decimal::from(wins.len()) * avg_win - Decimal::from(losses.len()) * avg_loss.abs())
            / Decimal::from(wins.len() + losses.len())
    } else {
        Decimal::ZERO
    };

    TradeMetrics {
        total_trades: trades.len(),
        closed_trades: closed.len(),
        wins: wins.len(),
        losses: losses.len(),
        breakeven,
        win_rate: round2(win_rate),
        total_rr: round2(total_rr),
        avg_win: round2(avg_win),
        avg_loss: round2(avg_loss),
        expectancy: round2(expectancy),
        profit_factor: round2(profit_factor),
    }
}

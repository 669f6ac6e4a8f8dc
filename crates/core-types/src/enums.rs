use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a journaled trade. Open trades have no exit data yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

/// The resolved result of a closed trade. `Open` covers trades whose outcome
/// has not been recorded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeOutcome {
    Win,
    Loss,
    Breakeven,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeDirection {
    Long,
    Short,
}

/// Calendar bucket granularity for period analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Day,
    Week,
    Month,
    Quarter,
    Half,
    Year,
}

impl FromStr for PeriodType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(PeriodType::Day),
            "week" => Ok(PeriodType::Week),
            "month" => Ok(PeriodType::Month),
            "quarter" => Ok(PeriodType::Quarter),
            "half" => Ok(PeriodType::Half),
            "year" => Ok(PeriodType::Year),
            other => Err(CoreError::InvalidPeriodType(other.to_string())),
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeriodType::Day => "day",
            PeriodType::Week => "week",
            PeriodType::Month => "month",
            PeriodType::Quarter => "quarter",
            PeriodType::Half => "half",
            PeriodType::Year => "year",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_type_parses_all_variants() {
        for (text, expected) in [
            ("day", PeriodType::Day),
            ("week", PeriodType::Week),
            ("month", PeriodType::Month),
            ("quarter", PeriodType::Quarter),
            ("half", PeriodType::Half),
            ("year", PeriodType::Year),
        ] {
            assert_eq!(text.parse::<PeriodType>().unwrap(), expected);
            assert_eq!(expected.to_string(), text);
        }
        assert!("fortnight".parse::<PeriodType>().is_err());
    }

    #[test]
    fn outcome_uses_uppercase_wire_format() {
        let json = serde_json::to_string(&TradeOutcome::Breakeven).unwrap();
        assert_eq!(json, "\"BREAKEVEN\"");
        let status: TradeStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(status, TradeStatus::Closed);
    }
}

use crate::{error::AppError, AppState};
use analytics::{
    analyze_periods, calculate_metrics, calculate_rule_violation_impact, compare_strategies,
    generate_rule_based_summary, period_metrics, rule_adherence_stats,
    timeframe_sequence_analysis,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use core_types::{
    PeriodType, RuleCompliance, Strategy, StrategyRule, TimeframeCompliance, TimeframeRole, Trade,
    TradeDirection, TradeOutcome, TradeStatus,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use store::{StoredSummary, TradeFilter};
use uuid::Uuid;

/// Creation payload for a trade; the store assigns the id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePayload {
    #[serde(rename = "strategy_id", default)]
    pub strategy_id: Option<String>,
    pub pair: String,
    pub direction: TradeDirection,
    pub entry_price: Decimal,
    #[serde(default)]
    pub exit_price: Option<Decimal>,
    pub volume: Decimal,
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
    #[serde(default)]
    pub profit_loss: Option<Decimal>,
    #[serde(default)]
    pub status: Option<TradeStatus>,
    #[serde(default)]
    pub outcome: Option<TradeOutcome>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TradePayload {
    fn into_trade(self, id: String) -> Trade {
        Trade {
            id,
            strategy_id: self.strategy_id,
            pair: self.pair,
            direction: self.direction,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            volume: self.volume,
            entry_time: self.entry_time,
            exit_time: self.exit_time,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            risk_reward_ratio: self.risk_reward_ratio,
            profit_loss: self.profit_loss,
            status: self.status.unwrap_or(TradeStatus::Open),
            outcome: self.outcome,
            notes: self.notes,
        }
    }
}

// --- Trade CRUD ---

/// # GET /api/trades
/// Lists trades, newest first, with optional query-string filters.
pub async fn list_trades(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TradeFilter>,
) -> Json<Vec<Trade>> {
    Json(state.repo.list_trades(&filter).await)
}

/// # POST /api/trades
pub async fn create_trade(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TradePayload>,
) -> (StatusCode, Json<Trade>) {
    let trade = payload.into_trade(Uuid::new_v4().to_string());
    let trade = state.repo.insert_trade(trade).await;
    (StatusCode::CREATED, Json(trade))
}

/// # GET /api/trades/:trade_id
pub async fn get_trade(
    Path(trade_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Trade>, AppError> {
    Ok(Json(state.repo.get_trade(&trade_id).await?))
}

/// # PUT /api/trades/:trade_id
/// Full replacement of the trade's mutable fields (exit data, outcome, notes).
pub async fn update_trade(
    Path(trade_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TradePayload>,
) -> Result<Json<Trade>, AppError> {
    let trade = payload.into_trade(trade_id);
    Ok(Json(state.repo.update_trade(trade).await?))
}

/// # DELETE /api/trades/:trade_id
/// Removes the trade and its compliance records.
pub async fn delete_trade(
    Path(trade_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    state.repo.delete_trade(&trade_id).await?;
    Ok(Json(json!({ "success": true })))
}

// --- Compliance records ---

#[derive(Debug, Deserialize)]
pub struct RuleComplianceEntry {
    pub rule_id: String,
    pub followed: bool,
}

/// # POST /api/trades/:trade_id/rule-compliance
/// Replaces the trade's rule-compliance record set.
pub async fn set_rule_compliance(
    Path(trade_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(entries): Json<Vec<RuleComplianceEntry>>,
) -> Result<Json<Vec<RuleCompliance>>, AppError> {
    let records = entries
        .into_iter()
        .map(|e| RuleCompliance {
            trade_id: trade_id.clone(),
            rule_id: e.rule_id,
            followed: e.followed,
        })
        .collect();
    Ok(Json(state.repo.set_rule_compliance(&trade_id, records).await?))
}

#[derive(Debug, Deserialize)]
pub struct TimeframeComplianceEntry {
    pub role_type: String,
    pub respected: bool,
}

/// # POST /api/trades/:trade_id/timeframe-compliance
/// Replaces the trade's timeframe-compliance record set. Order matters: it
/// defines the trade's sequence key in the timeframe analysis.
pub async fn set_timeframe_compliance(
    Path(trade_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(entries): Json<Vec<TimeframeComplianceEntry>>,
) -> Result<Json<Vec<TimeframeCompliance>>, AppError> {
    let records = entries
        .into_iter()
        .map(|e| TimeframeCompliance {
            trade_id: trade_id.clone(),
            role_type: e.role_type,
            respected: e.respected,
        })
        .collect();
    Ok(Json(
        state
            .repo
            .set_timeframe_compliance(&trade_id, records)
            .await?,
    ))
}

// --- Strategy CRUD ---

#[derive(Debug, Deserialize)]
pub struct StrategyPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// # GET /api/strategies
pub async fn list_strategies(State(state): State<Arc<AppState>>) -> Json<Vec<Strategy>> {
    Json(state.repo.list_strategies().await)
}

/// # POST /api/strategies
pub async fn create_strategy(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StrategyPayload>,
) -> (StatusCode, Json<Strategy>) {
    let strategy = Strategy {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        description: payload.description,
    };
    let strategy = state.repo.insert_strategy(strategy).await;
    (StatusCode::CREATED, Json(strategy))
}

/// # GET /api/strategies/:strategy_id
pub async fn get_strategy(
    Path(strategy_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Strategy>, AppError> {
    Ok(Json(state.repo.get_strategy(&strategy_id).await?))
}

/// # DELETE /api/strategies/:strategy_id
pub async fn delete_strategy(
    Path(strategy_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    state.repo.delete_strategy(&strategy_id).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct RulePayload {
    pub description: String,
}

/// # GET /api/strategies/:strategy_id/rules
pub async fn list_rules(
    Path(strategy_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<StrategyRule>> {
    Json(state.repo.rules_for_strategy(&strategy_id).await)
}

/// # POST /api/strategies/:strategy_id/rules
pub async fn create_rule(
    Path(strategy_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RulePayload>,
) -> Result<(StatusCode, Json<StrategyRule>), AppError> {
    let rule = StrategyRule {
        id: Uuid::new_v4().to_string(),
        strategy_id,
        description: payload.description,
    };
    let rule = state.repo.insert_rule(rule).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

#[derive(Debug, Deserialize)]
pub struct TimeframeRolePayload {
    pub role_type: String,
    pub timeframe: String,
}

/// # GET /api/strategies/:strategy_id/timeframe-roles
pub async fn list_timeframe_roles(
    Path(strategy_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<TimeframeRole>> {
    Json(state.repo.roles_for_strategy(&strategy_id).await)
}

/// # POST /api/strategies/:strategy_id/timeframe-roles
pub async fn create_timeframe_role(
    Path(strategy_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TimeframeRolePayload>,
) -> Result<(StatusCode, Json<TimeframeRole>), AppError> {
    let role = TimeframeRole {
        id: Uuid::new_v4().to_string(),
        strategy_id,
        role_type: payload.role_type,
        timeframe: payload.timeframe,
    };
    let role = state.repo.insert_timeframe_role(role).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

// --- Analytics ---

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

/// # GET /api/analytics/period-analysis?period=month
/// Buckets all trades by calendar period and reports metrics per bucket.
pub async fn period_analysis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Value>, AppError> {
    let period_type = match query.period.as_deref() {
        None => PeriodType::Month,
        Some(raw) => raw
            .parse::<PeriodType>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
    };

    let mut trades = state.repo.list_trades(&TradeFilter::default()).await;
    // Oldest first, so each bucket's period envelope reads chronologically.
    trades.sort_by_key(|t| t.entry_time);

    let analysis = analyze_periods(&trades, period_type);
    Ok(Json(json!({
        "success": true,
        "period": period_type,
        "analysis": analysis,
    })))
}

/// # GET /api/analytics/rule-violations
/// Violation impact on P/L plus a per-rule adherence breakdown.
pub async fn rule_violations(State(state): State<Arc<AppState>>) -> Json<Value> {
    let trades = state.repo.list_trades(&TradeFilter::default()).await;
    let compliance = state.repo.all_rule_compliance().await;
    let rule_names = state.repo.rule_names().await;

    let impact = calculate_rule_violation_impact(&trades, &compliance);
    let stats = rule_adherence_stats(&compliance, &rule_names);

    Json(json!({
        "success": true,
        "summary": {
            "totalTrades": trades.len(),
            "actualPL": impact.actual_pl,
            "hypotheticalPL": impact.hypothetical_pl,
            "costFromViolations": impact.impact_from_violations,
        },
        "ruleStatistics": stats,
    }))
}

/// # GET /api/analytics/strategy-comparison
/// Metrics and violation impact per strategy, keyed by strategy id.
pub async fn strategy_comparison(State(state): State<Arc<AppState>>) -> Json<Value> {
    let strategies = state.repo.list_strategies().await;
    let trades = state.repo.list_trades(&TradeFilter::default()).await;
    let compliance = state.repo.all_rule_compliance().await;

    let analysis = compare_strategies(&strategies, &trades, &compliance);
    Json(json!({
        "success": true,
        "analysis": analysis,
    }))
}

/// # GET /api/analytics/timeframe-performance
/// Metrics per declared timeframe-role sequence.
pub async fn timeframe_performance(State(state): State<Arc<AppState>>) -> Json<Value> {
    let trades = state.repo.list_trades(&TradeFilter::default()).await;
    let compliance = state.repo.all_timeframe_compliance().await;

    let analysis = timeframe_sequence_analysis(&trades, &compliance);
    Json(json!({
        "success": true,
        "sequencePerformance": analysis,
    }))
}

/// # GET /api/analytics/overview
/// Whole-journal metrics with the period envelope, for the dashboard header.
pub async fn overview(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut trades = state.repo.list_trades(&TradeFilter::default()).await;
    trades.sort_by_key(|t| t.entry_time);
    Json(json!({
        "success": true,
        "metrics": period_metrics(&trades),
    }))
}

// --- Summaries ---

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub strategy_id: String,
    #[serde(default)]
    pub period: Option<String>,
}

/// # POST /api/summaries
/// Generates a rule-based summary for one strategy and stores it.
pub async fn create_summary(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummaryRequest>,
) -> Result<(StatusCode, Json<StoredSummary>), AppError> {
    let strategy = state.repo.get_strategy(&request.strategy_id).await?;
    let trades = state.repo.trades_for_strategy(&strategy.id).await;
    let trade_ids: Vec<String> = trades.iter().map(|t| t.id.clone()).collect();
    let compliance = state.repo.rule_compliance_for_trades(&trade_ids).await;

    let metrics = calculate_metrics(&trades);
    let impact = calculate_rule_violation_impact(&trades, &compliance);
    let summary =
        generate_rule_based_summary(&metrics, std::slice::from_ref(&strategy), Some(&impact));

    let stored = state
        .repo
        .insert_summary(StoredSummary {
            id: Uuid::new_v4().to_string(),
            strategy_id: strategy.id,
            period: request.period.unwrap_or_else(|| "monthly".to_string()),
            summary,
            created_at: Utc::now(),
        })
        .await;

    Ok((StatusCode::CREATED, Json(stored)))
}

/// # GET /api/summaries
pub async fn list_summaries(State(state): State<Arc<AppState>>) -> Json<Vec<StoredSummary>> {
    Json(state.repo.list_summaries().await)
}

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use store::JournalRepository;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub repo: JournalRepository,
}

/// Builds the application router. Split out from `run_server` so tests can
/// exercise the routes without binding a socket.
pub fn app(repo: JournalRepository) -> Router {
    let app_state = Arc::new(AppState { repo });
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/trades",
            get(handlers::list_trades).post(handlers::create_trade),
        )
        .route(
            "/api/trades/:trade_id",
            get(handlers::get_trade)
                .put(handlers::update_trade)
                .delete(handlers::delete_trade),
        )
        .route(
            "/api/trades/:trade_id/rule-compliance",
            post(handlers::set_rule_compliance),
        )
        .route(
            "/api/trades/:trade_id/timeframe-compliance",
            post(handlers::set_timeframe_compliance),
        )
        .route(
            "/api/strategies",
            get(handlers::list_strategies).post(handlers::create_strategy),
        )
        .route(
            "/api/strategies/:strategy_id",
            get(handlers::get_strategy).delete(handlers::delete_strategy),
        )
        .route(
            "/api/strategies/:strategy_id/rules",
            get(handlers::list_rules).post(handlers::create_rule),
        )
        .route(
            "/api/strategies/:strategy_id/timeframe-roles",
            get(handlers::list_timeframe_roles).post(handlers::create_timeframe_role),
        )
        .route("/api/analytics/overview", get(handlers::overview))
        .route(
            "/api/analytics/period-analysis",
            get(handlers::period_analysis),
        )
        .route(
            "/api/analytics/rule-violations",
            get(handlers::rule_violations),
        )
        .route(
            "/api/analytics/strategy-comparison",
            get(handlers::strategy_comparison),
        )
        .route(
            "/api/analytics/timeframe-performance",
            get(handlers::timeframe_performance),
        )
        .route(
            "/api/summaries",
            get(handlers::list_summaries).post(handlers::create_summary),
        )
        .with_state(app_state)
        .layer(cors)
        // This middleware automatically logs information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr, repo: JournalRepository) -> anyhow::Result<()> {
    let app = app(repo);

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

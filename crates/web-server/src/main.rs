use std::net::SocketAddr;

// This main function is the entry point when running `cargo run -p web-server`.
// It serves a seeded demo journal on the default port; the workspace binary
// wires in configuration and CLI flags.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let repo = store::JournalRepository::new();
    store::seed_demo(&repo).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    web_server::run_server(addr, repo).await
}

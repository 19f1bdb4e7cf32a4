use watchledger_server::api::app_router;
use watchledger_server::config::Config;
use watchledger_server::scheduler::start_rate_fetch_scheduler;
use watchledger_server::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing();
    let state = build_state(&config).await?;
    if config.scheduler_enabled {
        start_rate_fetch_scheduler(state.clone());
    }
    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use watchledger_core::countries::CountryRepositoryTrait;
use watchledger_core::fx::{FxService, LatestRatesCache, RateStore};
use watchledger_core::transactions::TransactionRepositoryTrait;
use watchledger_rate_providers::ProviderChain;
use watchledger_storage_sqlite::{
    create_pool, run_migrations, CountryRepository, FxRepository, TransactionRepository,
};

use crate::config::Config;

pub struct AppState {
    pub fx_service: Arc<FxService>,
    pub rates_cache: Arc<LatestRatesCache>,
    pub country_repository: Arc<dyn CountryRepositoryTrait>,
    pub transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    pub default_quote: String,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let pool = create_pool(&config.db_path)?;
    run_migrations(&pool)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let rate_store: Arc<dyn RateStore> = Arc::new(FxRepository::new(pool.clone()));
    let country_repository: Arc<dyn CountryRepositoryTrait> =
        Arc::new(CountryRepository::new(pool.clone()));
    let transaction_repository: Arc<dyn TransactionRepositoryTrait> =
        Arc::new(TransactionRepository::new(pool));

    let fx_service = Arc::new(FxService::new(
        rate_store.clone(),
        ProviderChain::default_chain(),
        country_repository.clone(),
    ));
    let rates_cache = Arc::new(LatestRatesCache::new(rate_store));

    Ok(Arc::new(AppState {
        fx_service,
        rates_cache,
        country_repository,
        transaction_repository,
        default_quote: config.default_quote.clone(),
    }))
}

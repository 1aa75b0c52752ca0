//! Shared state for all handlers.

use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::engine::CycleGate;
use crate::providers::{MacroClient, MacroFeed, MarketClient, MarketData, NewsClient, NewsFeed};

/// Shared state cloned into each handler via axum's State extractor.
pub struct AppState {
    /// Price-history side of the data adapter.
    pub market: Arc<dyn MarketData>,
    /// Headline side of the data adapter.
    pub news: Arc<dyn NewsFeed>,
    /// Macro-data provider.
    pub macros: Arc<dyn MacroFeed>,
    /// Latest-cycle gate for stale-response discard.
    pub gate: CycleGate,
    /// Runtime configuration.
    pub config: AppConfig,
    /// Server start time.
    start_time: Instant,
}

impl AppState {
    /// Build live provider clients from config.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Arc<Self>> {
        let timeout = config.provider_timeout;
        let market = MarketClient::new(&config.market_base_url, timeout)?;
        let news = NewsClient::new(&config.news_base_url, timeout)?;
        let macros = MacroClient::new(&config.macro_base_url, timeout)?;

        Ok(Arc::new(Self {
            market: Arc::new(market),
            news: Arc::new(news),
            macros: Arc::new(macros),
            gate: CycleGate::new(),
            config,
            start_time: Instant::now(),
        }))
    }

    /// Build state around arbitrary provider implementations (stubs in tests).
    pub fn with_providers(
        config: AppConfig,
        market: Arc<dyn MarketData>,
        news: Arc<dyn NewsFeed>,
        macros: Arc<dyn MacroFeed>,
    ) -> Arc<Self> {
        Arc::new(Self {
            market,
            news,
            macros,
            gate: CycleGate::new(),
            config,
            start_time: Instant::now(),
        })
    }

    /// Get uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

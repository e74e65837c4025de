use std::sync::Arc;

use crate::{
    config::Config,
    dashboard::{AverageWindows, Renderer},
};
use fixwatch_market_data::{BanxicoClient, Clock, RateLimitTracker, SystemClock};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub client: Arc<BanxicoClient>,
    pub renderer: Renderer,
    pub windows: AverageWindows,
}

pub fn init_tracing() {
    let log_format = std::env::var("FW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with_clock(config, Arc::new(SystemClock))
}

/// Same as [`build_state`] with an explicit clock.
pub fn build_state_with_clock(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<AppState>> {
    let tracker = Arc::new(RateLimitTracker::new(clock.now()));
    let client = BanxicoClient::new(config.banxico_token.clone(), tracker)?
        .with_base_url(config.banxico_base_url.clone())
        .with_clock(clock);
    tracing::info!("Banxico API base URL: {}", config.banxico_base_url);

    let renderer = Renderer::new()?;

    Ok(Arc::new(AppState {
        client: Arc::new(client),
        renderer,
        windows: AverageWindows {
            short: config.short_avg_window,
            long: config.long_avg_window,
        },
    }))
}

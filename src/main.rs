use anyhow::{Context, Result};
use price_ticker_bot::{
    BinanceProvider, Config, MessagePublisher, PriceTicker, StartupError, TelegramTransport,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().map_err(StartupError::from)?;

    let fetcher = BinanceProvider::new(
        &config.ticker_base_url,
        config.symbol.clone(),
        config.request_timeout(),
    )
    .context("Failed to build ticker client")?;
    let transport =
        TelegramTransport::from_token(&config.bot_token, config.telegram_api_url.as_ref());
    let publisher = MessagePublisher::new(Arc::new(transport), config.group_chat_id);

    let mut ticker = PriceTicker::new(Arc::new(fetcher), publisher)
        .with_poll_interval(config.poll_interval())
        .with_retry_policy(config.retry_policy());

    info!(
        symbol = %config.symbol,
        chat_id = config.group_chat_id,
        "price-ticker-bot starting"
    );

    if let Err(e) = ticker.start().await {
        error!(error = %e, "Startup failed");
        return Err(e.into());
    }

    ticker
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("price-ticker-bot stopped");
    Ok(())
}

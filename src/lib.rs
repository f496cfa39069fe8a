pub mod error;
pub mod models;
pub mod modules;
pub mod proxy; // Proxy route (/api/proxy)
pub mod upload; // Upload helper
mod utils;

#[cfg(test)]
mod test_support;

use modules::logger;
use tracing::info;

pub fn run() -> anyhow::Result<()> {
    // Initialize logger
    logger::init_logger();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = modules::config::load_app_config()?;
        info!(
            "Loaded config (environment: {:?}, api_url: {})",
            config.environment,
            config.proxy.base_url().unwrap_or("<unset>")
        );
        if config.proxy.base_url().is_none() {
            tracing::warn!("API_URL / NEXT_PUBLIC_API_URL not set, relative proxy targets will fail");
        }

        let (server, handle) = proxy::AxumServer::start(config.proxy).await?;

        tokio::signal::ctrl_c().await?;
        info!("Shutdown signal received");
        server.stop();
        handle.await?;
        Ok::<(), anyhow::Error>(())
    })
}

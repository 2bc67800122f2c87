use std::{net::TcpListener, sync::Arc};

use anyhow::Context;
use env_logger::Env;
use trawl::{
    configuration::get_configuration,
    services::{HttpFetcher, ScrapePipeline},
    startup::run,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address).with_context(|| format!("Failed to bind {address}"))?;

    let fetcher = HttpFetcher::new(configuration.scraper.request_timeout())
        .context("Failed to build HTTP client")?;
    let pipeline = ScrapePipeline::from_settings(Arc::new(fetcher), &configuration.scraper)
        .context("Invalid scraper origin")?;

    log::info!("Listening on http://{}", address);
    run(listener, pipeline)?.await?;

    Ok(())
}

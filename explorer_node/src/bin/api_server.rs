use atst_explorer::api::server::start_api_server;
use atst_explorer::config::ExplorerConfig;
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ExplorerConfig::load()?;
    info!(
        "loaded configuration: chain={:?}, indexer={}",
        config.chain, config.indexer_url
    );
    if config.private_key.is_none() {
        info!("no relayer key configured, submission endpoints are disabled");
    }

    start_api_server(config).await
}

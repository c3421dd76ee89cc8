//! Runtime configuration
//!
//! Defaults target Optimism mainnet. Values can be overridden by an optional
//! `explorer.toml` next to the binary and by `ATST_*` environment variables
//! (e.g. `ATST_LISTEN_PORT`, `ATST_INDEXER_API_KEY`).

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::station::{Chain, ATTESTATION_STATION_ADDRESS};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Port the REST API listens on
    pub listen_port: u16,
    /// Base URL of the attestation indexer API
    pub indexer_url: String,
    /// API key for the indexer
    pub indexer_api_key: String,
    /// JSON-RPC endpoint for submissions
    pub rpc_url: String,
    /// Chain the endpoint belongs to; decides explorer links and chain id
    pub chain: Chain,
    /// AttestationStation contract address
    pub station_address: String,
    /// Relayer private key; submissions are disabled when absent
    pub private_key: Option<String>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            listen_port: 8080,
            indexer_url: "https://api.n.xyz/api/v1/dapp/attestationstation/".to_string(),
            indexer_api_key: String::new(),
            rpc_url: "https://mainnet.optimism.io".to_string(),
            chain: Chain::Optimism,
            station_address: ATTESTATION_STATION_ADDRESS.to_string(),
            private_key: None,
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from `explorer.toml` (if present) and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(File::new("explorer", FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("ATST").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_optimism() {
        let config = ExplorerConfig::default();
        assert_eq!(config.chain, Chain::Optimism);
        assert_eq!(config.station_address, ATTESTATION_STATION_ADDRESS);
        assert!(config.private_key.is_none());
    }

    #[test]
    fn test_chain_deserializes_kebab_case() {
        let config: ExplorerConfig =
            serde_json::from_str(r#"{"chain": "optimism-goerli"}"#).unwrap();
        assert_eq!(config.chain, Chain::OptimismGoerli);
    }
}

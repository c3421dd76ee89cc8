//! AttestationStation submission client
//!
//! Wraps an ethers JSON-RPC provider and an optional relayer wallet. The
//! contract write is the `attest` call taking an array of
//! `(address, bytes32, bytes)` tuples; a single attestation is just a
//! one-element batch.

use ethers::abi::{encode as abi_encode, Token};
use ethers::prelude::*;
use ethers::types::TransactionRequest;
use log::info;

use crate::crypto::keccak256;
use crate::types::{Attestation, TxHash as AtstTxHash};

/// AttestationStation deployment shared by Optimism mainnet and Goerli
pub const ATTESTATION_STATION_ADDRESS: &str = "0xEE36eaaD94d1Cc1d0eccaDb55C38bFfB6Be06C77";

/// Solidity signature of the batch attest call
const ATTEST_SIGNATURE: &str = "attest((address,bytes32,bytes)[])";

#[derive(Debug, thiserror::Error)]
pub enum StationError {
    #[error("invalid RPC endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid contract address: {0}")]
    InvalidContractAddress(String),

    #[error("invalid relayer private key: {0}")]
    InvalidPrivateKey(String),

    #[error("no relayer wallet configured, cannot sign transactions")]
    NoWallet,

    #[error("nothing to attest: empty batch")]
    EmptyBatch,

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("transaction {0} reverted on-chain")]
    Reverted(AtstTxHash),

    #[error("transaction dropped before confirmation")]
    Dropped,
}

pub type Result<T> = std::result::Result<T, StationError>;

/// Chains the explorer knows how to link to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chain {
    Optimism,
    OptimismGoerli,
}

impl Chain {
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Optimism => 10,
            Chain::OptimismGoerli => 420,
        }
    }

    /// Block-explorer base link for transaction pages
    pub fn etherscan_base(&self) -> &'static str {
        match self {
            Chain::Optimism => "https://optimistic.etherscan.io/tx/",
            Chain::OptimismGoerli => "https://goerli-optimism.etherscan.io/tx/",
        }
    }
}

/// Handle to the AttestationStation contract on one chain
pub struct StationClient {
    provider: Provider<Http>,
    wallet: Option<LocalWallet>,
    contract: Address,
    chain: Chain,
}

impl StationClient {
    /// Create a client against an RPC endpoint
    ///
    /// Without a private key the client can only build calldata and explorer
    /// links; submission requires the relayer wallet.
    pub fn new(
        rpc_url: &str,
        contract_address: &str,
        private_key: Option<&str>,
        chain: Chain,
    ) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| StationError::InvalidEndpoint(e.to_string()))?;

        let contract = contract_address
            .parse::<Address>()
            .map_err(|e| StationError::InvalidContractAddress(e.to_string()))?;

        let wallet = match private_key {
            Some(key) => Some(
                key.parse::<LocalWallet>()
                    .map_err(|e| StationError::InvalidPrivateKey(e.to_string()))?
                    .with_chain_id(chain.chain_id()),
            ),
            None => None,
        };

        Ok(Self {
            provider,
            wallet,
            contract,
            chain,
        })
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn can_submit(&self) -> bool {
        self.wallet.is_some()
    }

    /// Submit one or more attestations in a single `attest` transaction
    ///
    /// Waits for one confirmation; a revert or dropped transaction is an
    /// error carrying the verbatim failure, recoverable by user retry.
    pub async fn attest(&self, attestations: &[Attestation]) -> Result<AtstTxHash> {
        if attestations.is_empty() {
            return Err(StationError::EmptyBatch);
        }
        let wallet = self.wallet.as_ref().ok_or(StationError::NoWallet)?;
        let client = SignerMiddleware::new(self.provider.clone(), wallet.clone());

        let tx = TransactionRequest::new()
            .to(self.contract)
            .value(0)
            .data(attest_calldata(attestations));

        let pending = client
            .send_transaction(tx, None)
            .await
            .map_err(|e| StationError::Submission(e.to_string()))?;
        let tx_hash = AtstTxHash::from(pending.tx_hash());
        info!(
            "submitted attest transaction {} ({} attestations)",
            tx_hash,
            attestations.len()
        );

        let receipt = pending
            .confirmations(1)
            .await
            .map_err(|e| StationError::Submission(e.to_string()))?;
        match receipt {
            Some(receipt) if receipt.status == Some(U64::from(1)) => Ok(tx_hash),
            Some(_) => Err(StationError::Reverted(tx_hash)),
            None => Err(StationError::Dropped),
        }
    }

    /// Block-explorer link for a submitted transaction
    pub fn etherscan_tx_url(&self, tx_hash: &AtstTxHash) -> String {
        format!("{}{}", self.chain.etherscan_base(), tx_hash)
    }
}

/// ABI-encode the calldata for `attest((address,bytes32,bytes)[])`
pub fn attest_calldata(attestations: &[Attestation]) -> Vec<u8> {
    let tuples: Vec<Token> = attestations
        .iter()
        .map(|attestation| {
            Token::Tuple(vec![
                Token::Address(attestation.about.h160()),
                Token::FixedBytes(attestation.key.as_bytes().to_vec()),
                Token::Bytes(attestation.val.clone()),
            ])
        })
        .collect();

    let mut data = Vec::new();
    data.extend_from_slice(&attest_selector());
    data.extend_from_slice(&abi_encode(&[Token::Array(tuples)]));
    data
}

fn attest_selector() -> [u8; 4] {
    let digest = keccak256(ATTEST_SIGNATURE.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{key as key_codec, value as value_codec};
    use crate::types::Address as AtstAddress;

    fn attestation() -> Attestation {
        Attestation {
            about: AtstAddress::parse("0x2222222222222222222222222222222222222222").unwrap(),
            key: key_codec::encode("test.key"),
            val: value_codec::encode("true"),
        }
    }

    #[test]
    fn test_selector_is_keccak_prefix() {
        let digest = keccak256(b"attest((address,bytes32,bytes)[])");
        assert_eq!(attest_selector(), [digest[0], digest[1], digest[2], digest[3]]);
    }

    #[test]
    fn test_calldata_layout_for_single_attestation() {
        let data = attest_calldata(&[attestation()]);

        // selector + offset word + length word at minimum
        assert!(data.len() > 4 + 64);
        assert_eq!(&data[..4], &attest_selector());

        // Head: offset to the array payload (0x20)
        let offset = &data[4..36];
        assert_eq!(offset[31], 0x20);
        assert!(offset[..31].iter().all(|&b| b == 0));

        // Array length: 1
        let length = &data[36..68];
        assert_eq!(length[31], 1);
        assert!(length[..31].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_calldata_contains_tuple_fields() {
        let attestation = attestation();
        let data = attest_calldata(&[attestation.clone()]);
        let hex_data = hex::encode(&data);
        assert!(hex_data.contains(&hex::encode(attestation.about.as_bytes())));
        assert!(hex_data.contains(&hex::encode(attestation.key.as_bytes())));
        assert!(hex_data.contains(&hex::encode(&attestation.val)));
    }

    #[test]
    fn test_batch_calldata_length_word() {
        let batch = vec![attestation(), attestation(), attestation()];
        let data = attest_calldata(&batch);
        assert_eq!(data[67], 3);
    }

    #[test]
    fn test_etherscan_links_per_chain() {
        assert_eq!(
            Chain::Optimism.etherscan_base(),
            "https://optimistic.etherscan.io/tx/"
        );
        assert_eq!(
            Chain::OptimismGoerli.etherscan_base(),
            "https://goerli-optimism.etherscan.io/tx/"
        );
    }

    #[test]
    fn test_client_without_wallet_cannot_submit() {
        let client = StationClient::new(
            "http://localhost:8545",
            ATTESTATION_STATION_ADDRESS,
            None,
            Chain::OptimismGoerli,
        )
        .unwrap();
        assert!(!client.can_submit());
    }
}

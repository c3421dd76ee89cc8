//! AttestationStation Explorer library
//!
//! Building blocks for browsing and submitting attestations: arbitrary
//! key/value claims about Ethereum addresses recorded on the
//! AttestationStation contract on Optimism.
//!
//! ## Modules
//!
//! - [`types`] - Core types (addresses, 32-byte keys, transaction hashes)
//! - [`codec`] - Key and value codecs for the on-chain representation
//! - [`feed`] - Read-side grouping and display shaping
//! - [`batch`] - CSV batch parsing and validation
//! - [`indexer`] - HTTP client for the attestation indexing API
//! - [`station`] - Contract submission client
//! - [`workflow`] - Creation-workflow state machine
//! - [`api`] - REST API routes and server
//! - [`config`] - Runtime configuration

pub mod api;
pub mod batch;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod feed;
pub mod indexer;
pub mod station;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use batch::{BatchRow, ErrorCategory, ValidationReport};
pub use config::ExplorerConfig;
pub use feed::{DisplayRecord, Grouped, RawLogEntry};
pub use indexer::{IndexerClient, SearchFilter};
pub use station::{Chain, StationClient};
pub use types::{Address, Attestation, Bytes32, TxHash};
pub use workflow::{CreationEvent, CreationState};

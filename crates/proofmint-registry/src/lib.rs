//! proofmint Registry - Allow-list gated token registry
//!
//! This crate provides:
//! - The registry state machine (initialize, admin, mint, approve, transfer)
//! - The ordered notification log
//! - Snapshot storage and host configuration
//! - Allow-list parsing and proof bundle export for the CLI

pub mod allowlist;
pub mod config;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod registry;
pub mod storage;

pub use allowlist::{parse_allow_list, MemberProof, ProofBundle};
pub use config::RegistryConfig;
pub use error::{ErrorCategory, RegistryError, Result};
pub use events::RegistryEvent;
pub use lifecycle::{AdminState, Lifecycle};
pub use registry::{CollectionInfo, Registry, TokenRecord};
pub use storage::RegistryStorage;

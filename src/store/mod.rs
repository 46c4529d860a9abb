//! Policy store module
//!
//! Provides the read-only settings collaborator the gate consults on every
//! request. The record can live in the configuration file itself or in a
//! separate settings document that administrators edit.

pub mod file;
pub mod memory;
pub mod provider;

pub use file::FilePolicyStore;
pub use memory::MemoryPolicyStore;
pub use provider::{PolicyStore, SharedPolicyStore};

use crate::config::{PolicyConfig, PolicySource};
use std::sync::Arc;

/// Create a policy store from configuration
pub fn create_policy_store(config: &PolicyConfig) -> SharedPolicyStore {
    match config.source {
        PolicySource::File => {
            let path = shellexpand::tilde(&config.path).into_owned();
            Arc::new(FilePolicyStore::new(path))
        }
        PolicySource::Inline => Arc::new(MemoryPolicyStore::new(config.inline_policy())),
    }
}

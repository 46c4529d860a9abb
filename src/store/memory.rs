//! In-memory policy store
//!
//! Holds the record in process. Used for policies declared inline in the
//! configuration file, and by applications that manage settings themselves.

use crate::access_control::AccessPolicy;
use crate::error::{StoreError, StoreResult};
use crate::store::provider::PolicyStore;
use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Policy store backed by a lock-protected `Option<AccessPolicy>`
#[derive(Debug, Default)]
pub struct MemoryPolicyStore {
    policy: RwLock<Option<AccessPolicy>>,
}

impl MemoryPolicyStore {
    /// Create a store holding the given record
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            policy: RwLock::new(Some(policy)),
        }
    }

    /// Create a store with no record
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the stored record
    pub fn set_policy(&self, policy: AccessPolicy) -> StoreResult<()> {
        *self.write()? = Some(policy);
        Ok(())
    }

    /// Remove the stored record
    pub fn clear(&self) -> StoreResult<()> {
        *self.write()? = None;
        Ok(())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Option<AccessPolicy>>> {
        self.policy
            .read()
            .map_err(|_| StoreError::Unavailable("policy lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Option<AccessPolicy>>> {
        self.policy
            .write()
            .map_err(|_| StoreError::Unavailable("policy lock poisoned".into()))
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn find_policy(&self) -> StoreResult<Option<AccessPolicy>> {
        Ok(self.read()?.clone())
    }

    fn store_type(&self) -> &'static str {
        "in-memory"
    }
}

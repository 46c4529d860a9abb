//! Policy store trait
//!
//! The gate reads the admin settings record through this trait on every
//! request. It never writes through it.

use crate::access_control::AccessPolicy;
use crate::error::StoreResult;
// async_trait required for dyn-compatibility with Arc<dyn PolicyStore>
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only source of the admin settings record
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Fetch the single policy record.
    ///
    /// `Ok(None)` means no record exists, which the gate treats as a
    /// configuration error. `Err` is reserved for failures to reach or
    /// read the store.
    async fn find_policy(&self) -> StoreResult<Option<AccessPolicy>>;

    /// Short description of the backing store (for logging)
    fn store_type(&self) -> &'static str;
}

/// Shared handle type for policy stores
pub type SharedPolicyStore = Arc<dyn PolicyStore>;

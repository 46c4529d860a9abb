//! File-backed policy store
//!
//! Reads the admin settings document from disk on every lookup, so edits to
//! the file apply to the next request without a restart.

use crate::access_control::AccessPolicy;
use crate::error::{StoreError, StoreResult};
use crate::store::provider::PolicyStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Policy store reading a JSON or TOML settings document
#[derive(Debug, Clone)]
pub struct FilePolicyStore {
    path: PathBuf,
}

impl FilePolicyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_toml(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
    }

    fn parse(&self, contents: &str) -> StoreResult<Option<AccessPolicy>> {
        if contents.trim().is_empty() {
            return Ok(None);
        }

        let parse_error = |reason: String| StoreError::Parse {
            path: self.path.clone(),
            reason,
        };

        if self.is_toml() {
            toml::from_str(contents)
                .map(Some)
                .map_err(|e| parse_error(e.to_string()))
        } else {
            // `null` deserializes to None: an explicitly empty record
            serde_json::from_str(contents).map_err(|e| parse_error(e.to_string()))
        }
    }
}

#[async_trait]
impl PolicyStore for FilePolicyStore {
    async fn find_policy(&self) -> StoreResult<Option<AccessPolicy>> {
        trace!(path = %self.path.display(), "Reading admin settings");

        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        self.parse(&contents)
    }

    fn store_type(&self) -> &'static str {
        "file"
    }
}

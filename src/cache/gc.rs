//! Garbage Collector
//!
//! Full-scan sweep that deletes every expired entry, independent of reads.

use tracing::{debug, warn};

use crate::cache::{envelope, Cache};
use crate::error::Result;

impl Cache {
    // == Collect Garbage ==
    /// Scans every record and deletes the expired ones.
    ///
    /// Returns the removed keys in scan order. Records whose payload cannot be
    /// decoded are logged and left in place.
    pub async fn collect_garbage(&self) -> Result<Vec<String>> {
        let mut removed = Vec::new();

        for (key, payload) in self.scan().await? {
            let header = match envelope::decode_header(&payload) {
                Ok(Some(header)) => header,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Skipping undecodable entry '{}': {}", key, e);
                    continue;
                }
            };

            // Stored keys are deleted as listed, without argument validation
            if self.is_expired(header.ttl, header.created_at)
                && self.store().delete_by_key(&key).await?
            {
                removed.push(key);
            }
        }

        debug!("Garbage collection removed {} entries", removed.len());
        Ok(removed)
    }
}

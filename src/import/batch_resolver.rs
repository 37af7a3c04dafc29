// Download-handle resolution for photo imports.
//
// The drive API throttles bursts of delegated metadata calls, so items are
// resolved in fixed-size batches: calls within a batch run concurrently,
// batches run strictly one after another so throttling responses have a
// chance to recover. Per-item failure drops that item from the result - the
// operation never aborts, it just reports a smaller final count.

use crate::backend_client::PhotoImportItem;
use crate::drive_client::{DriveItem, DriveStore};
use futures::future::join_all;
use std::sync::Arc;
use tracing::warn;

/// Batch size chosen to stay under the delegated-API rate ceiling
pub const DOWNLOAD_BATCH_SIZE: usize = 6;

pub struct BatchResolver {
    store: Arc<dyn DriveStore>,
    batch_size: usize,
}

impl BatchResolver {
    pub fn new(store: Arc<dyn DriveStore>) -> Self {
        Self::with_batch_size(store, DOWNLOAD_BATCH_SIZE)
    }

    pub fn with_batch_size(store: Arc<dyn DriveStore>, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    /// Resolve download handles for `items`, calling `on_progress` with
    /// `(processed, total)` after each batch completes.
    pub async fn resolve<F>(&self, items: &[DriveItem], mut on_progress: F) -> Vec<PhotoImportItem>
    where
        F: FnMut(usize, usize),
    {
        let total = items.len();
        let mut resolved = Vec::with_capacity(total);
        let mut processed = 0;

        for batch in items.chunks(self.batch_size) {
            let results = join_all(batch.iter().map(|item| self.resolve_one(item))).await;

            processed += batch.len();
            resolved.extend(results.into_iter().flatten());
            on_progress(processed, total);
        }

        if resolved.len() < total {
            warn!(
                "Resolved {} of {} photos; the rest were skipped",
                resolved.len(),
                total
            );
        }

        resolved
    }

    async fn resolve_one(&self, item: &DriveItem) -> Option<PhotoImportItem> {
        let meta = match self.store.get_metadata(&item.id).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Metadata fetch failed for '{}': {}", item.name, e);
                return None;
            }
        };

        let download_url = match meta.download_url {
            Some(url) => url,
            None => {
                warn!("No download URL on '{}', skipping", item.name);
                return None;
            }
        };

        Some(PhotoImportItem {
            remote_id: meta.id,
            filename: meta.name,
            mime_type: meta.mime_type.unwrap_or_else(|| "image/jpeg".to_string()),
            download_url,
            size: meta.size.unwrap_or(0),
        })
    }
}

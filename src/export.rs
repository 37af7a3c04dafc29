// Write-back of generated artifacts to the drive.
//
// Generated BOQ workbooks and TSSR documents land next to the site's source
// documents. The drive answers "locked" while someone has the target open in
// another client; lock contention is assumed transient, so a single rename
// and retry covers it - a second failure is surfaced to the caller.

use crate::backend_client::ProjectBackend;
use crate::drive_client::{DriveError, DriveItem, DriveStore};
use crate::import::ImportError;
use chrono::Local;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub struct ExportService {
    drive: Arc<dyn DriveStore>,
    backend: Arc<dyn ProjectBackend>,
}

impl ExportService {
    pub fn new(drive: Arc<dyn DriveStore>, backend: Arc<dyn ProjectBackend>) -> Self {
        Self { drive, backend }
    }

    /// Generate the live BOQ workbook and upload it to `folder_path`
    pub async fn export_boq(
        &self,
        project_id: Uuid,
        site_id: &str,
        folder_path: &str,
    ) -> Result<DriveItem, ImportError> {
        let bytes = self
            .backend
            .export_boq_workbook(project_id)
            .await
            .map_err(|e| ImportError::step("BOQ export", e))?;

        let name = format!("{}_BOQ_live.xlsm", site_id);
        upload_with_retry(self.drive.as_ref(), folder_path, &name, bytes).await
    }

    /// Generate the TSSR document and upload it to `folder_path`
    pub async fn export_tssr(
        &self,
        project_id: Uuid,
        site_id: &str,
        folder_path: &str,
    ) -> Result<DriveItem, ImportError> {
        let bytes = self
            .backend
            .export_tssr_document(project_id)
            .await
            .map_err(|e| ImportError::step("TSSR export", e))?;

        let name = format!("{}_TSSR_live.docx", site_id);
        upload_with_retry(self.drive.as_ref(), folder_path, &name, bytes).await
    }

    /// Create the per-site folder exports land in
    pub async fn create_site_folder(
        &self,
        parent_id: &str,
        site_id: &str,
    ) -> Result<DriveItem, ImportError> {
        self.drive
            .create_folder(parent_id, site_id)
            .await
            .map_err(ImportError::StoreUnavailable)
    }
}

/// Upload, retrying exactly once with a disambiguated name when the target
/// is locked
pub async fn upload_with_retry(
    store: &dyn DriveStore,
    folder_path: &str,
    name: &str,
    bytes: Vec<u8>,
) -> Result<DriveItem, ImportError> {
    match store.upload(folder_path, name, bytes.clone()).await {
        Ok(item) => {
            info!("Uploaded '{}' to {}", name, folder_path);
            Ok(item)
        }
        Err(DriveError::Locked { .. }) => {
            let renamed = timestamped_name(name);
            warn!("'{}' is locked, retrying as '{}'", name, renamed);

            match store.upload(folder_path, &renamed, bytes).await {
                Ok(item) => Ok(item),
                Err(DriveError::Locked { name }) => Err(ImportError::LockedResource { name }),
                Err(e) => Err(ImportError::StoreUnavailable(e)),
            }
        }
        Err(e) => Err(ImportError::StoreUnavailable(e)),
    }
}

/// Insert a compact time-of-day suffix before the extension:
/// `OSL0042_BOQ_live.xlsm` → `OSL0042_BOQ_live_143501.xlsm`
fn timestamped_name(name: &str) -> String {
    rename_with_suffix(name, &Local::now().format("%H%M%S").to_string())
}

fn rename_with_suffix(name: &str, suffix: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_{}{}", &name[..dot], suffix, &name[dot..]),
        _ => format!("{}_{}", name, suffix),
    }
}

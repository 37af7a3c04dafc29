use async_trait::async_trait;
use siteforge::backend_client::{
    BackendError, BoqComputeRequest, NewProject, PhotoImportItem, Project, ProjectBackend,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Records backend calls in order; individual operations can be made to fail.
pub struct MockBackend {
    pub project_id: Uuid,
    pub calls: Mutex<Vec<String>>,
    pub photo_items: Mutex<Vec<PhotoImportItem>>,
    fail_create: AtomicBool,
    fail_import_photos: AtomicBool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            project_id: Uuid::new_v4(),
            calls: Mutex::new(Vec::new()),
            photo_items: Mutex::new(Vec::new()),
            fail_create: AtomicBool::new(false),
            fail_import_photos: AtomicBool::new(false),
        }
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create_project(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    pub fn fail_import_photos(&self) {
        self.fail_import_photos.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Positions of calls whose name starts with `prefix`
    pub fn call_positions(&self, prefix: &str) -> Vec<usize> {
        self.calls()
            .iter()
            .enumerate()
            .filter(|(_, call)| call.starts_with(prefix))
            .map(|(i, _)| i)
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn api_error(message: &str) -> BackendError {
        BackendError::Api {
            status: 500,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl ProjectBackend for MockBackend {
    async fn create_project(&self, fields: &NewProject) -> Result<Project, BackendError> {
        self.record(format!("create_project:{}", fields.site_id));

        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::api_error("create refused"));
        }

        Ok(Project {
            id: self.project_id,
            site_id: fields.site_id.clone(),
            site_name: fields.site_name.clone(),
            operator: fields.operator.clone(),
            status: "draft".to_string(),
        })
    }

    async fn set_project_folder(
        &self,
        _project_id: Uuid,
        _folder_id: &str,
        folder_path: &str,
    ) -> Result<(), BackendError> {
        self.record(format!("set_project_folder:{}", folder_path));
        Ok(())
    }

    async fn set_working_field(
        &self,
        _project_id: Uuid,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), BackendError> {
        self.record(format!("set_working_field:{}={}", key, value));
        Ok(())
    }

    async fn import_photos(
        &self,
        _project_id: Uuid,
        items: &[PhotoImportItem],
        phase: &str,
    ) -> Result<usize, BackendError> {
        self.record(format!("import_photos:{}:{}", items.len(), phase));

        if self.fail_import_photos.load(Ordering::SeqCst) {
            return Err(Self::api_error("photo import refused"));
        }

        self.photo_items.lock().unwrap().extend_from_slice(items);
        Ok(items.len())
    }

    async fn compute_boq(
        &self,
        _project_id: Uuid,
        request: &BoqComputeRequest,
    ) -> Result<usize, BackendError> {
        self.record(format!("compute_boq:{}", request.config));
        Ok(42)
    }

    async fn export_boq_workbook(&self, _project_id: Uuid) -> Result<Vec<u8>, BackendError> {
        self.record("export_boq_workbook".to_string());
        Ok(b"workbook".to_vec())
    }

    async fn export_tssr_document(&self, _project_id: Uuid) -> Result<Vec<u8>, BackendError> {
        self.record("export_tssr_document".to_string());
        Ok(b"document".to_vec())
    }
}

// SiteForge backend client.
//
// The backend owns persistence, the BOQ dependency engine and artifact
// generation; this module is a thin typed client over its REST API. The
// `ProjectBackend` trait is the seam the orchestrator is tested through.

use crate::models::{PowerCalc, RadioPlan, RadioPlanCell, RadioPlanSector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend answered {status}: {message}")]
    Api { status: u16, message: String },
}

/// Fields for a new project record
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewProject {
    pub site_id: String,
    pub site_name: String,
    pub operator: String,
}

/// A project record as returned by the backend
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub site_id: String,
    pub site_name: String,
    pub operator: String,
    pub status: String,
}

/// One photo handed to the backend's photo-import call.
/// Wire names match the backend's OneDrive import schema.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PhotoImportItem {
    #[serde(rename = "onedrive_item_id")]
    pub remote_id: String,
    pub filename: String,
    pub mime_type: String,
    pub download_url: String,
    #[serde(rename = "file_size")]
    pub size: u64,
}

/// Parsed radio plan (plus optional power calculator data) sent to the BOQ
/// compute endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoqComputeRequest {
    pub site_id: String,
    pub project: String,
    pub config: String,
    pub total_cells: u32,
    pub sectors: Vec<RadioPlanSector>,
    pub raw_rows: Vec<RadioPlanCell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_calc: Option<PowerCalc>,
}

impl BoqComputeRequest {
    pub fn from_parsed(plan: &RadioPlan, power_calc: Option<&PowerCalc>) -> Self {
        Self {
            site_id: plan.site_id.clone(),
            project: plan.project.clone(),
            config: plan.config.clone(),
            total_cells: plan.total_cells,
            sectors: plan.sectors.clone(),
            raw_rows: plan.raw_rows.clone(),
            power_calc: power_calc.cloned(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BoqComputeResponse {
    items: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct PhotoImportBody<'a> {
    photos: &'a [PhotoImportItem],
    phase: &'a str,
}

/// Trait for backend project operations (allows mocking for tests)
#[async_trait::async_trait]
pub trait ProjectBackend: Send + Sync {
    async fn create_project(&self, fields: &NewProject) -> Result<Project, BackendError>;
    /// Persist the drive folder a project is anchored to
    async fn set_project_folder(
        &self,
        project_id: Uuid,
        folder_id: &str,
        folder_path: &str,
    ) -> Result<(), BackendError>;
    /// Write a single working-document field. Field keys use the backend's
    /// wire names (`siteCategory`, `craneNeeded`, ...).
    async fn set_working_field(
        &self,
        project_id: Uuid,
        key: &str,
        value: Value,
    ) -> Result<(), BackendError>;
    /// Import resolved photos; returns how many the backend accepted
    async fn import_photos(
        &self,
        project_id: Uuid,
        items: &[PhotoImportItem],
        phase: &str,
    ) -> Result<usize, BackendError>;
    /// Run the BOQ dependency engine; returns the computed item count
    async fn compute_boq(
        &self,
        project_id: Uuid,
        request: &BoqComputeRequest,
    ) -> Result<usize, BackendError>;
    async fn export_boq_workbook(&self, project_id: Uuid) -> Result<Vec<u8>, BackendError>;
    async fn export_tssr_document(&self, project_id: Uuid) -> Result<Vec<u8>, BackendError>;
}

#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(BackendError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait::async_trait]
impl ProjectBackend for BackendClient {
    async fn create_project(&self, fields: &NewProject) -> Result<Project, BackendError> {
        let url = format!("{}/api/projects", self.base_url);
        let response = self.client.post(&url).json(fields).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn set_project_folder(
        &self,
        project_id: Uuid,
        folder_id: &str,
        folder_path: &str,
    ) -> Result<(), BackendError> {
        let url = format!("{}/api/projects/{}", self.base_url, project_id);
        let body = serde_json::json!({
            "onedrive_folder_id": folder_id,
            "onedrive_folder_path": folder_path,
        });

        let response = self.client.patch(&url).json(&body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn set_working_field(
        &self,
        project_id: Uuid,
        key: &str,
        value: Value,
    ) -> Result<(), BackendError> {
        let url = format!("{}/api/projects/{}/tssr", self.base_url, project_id);
        let body = serde_json::json!({ key: value });

        let response = self.client.patch(&url).json(&body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn import_photos(
        &self,
        project_id: Uuid,
        items: &[PhotoImportItem],
        phase: &str,
    ) -> Result<usize, BackendError> {
        let url = format!(
            "{}/api/projects/{}/photos/import-onedrive",
            self.base_url, project_id
        );
        let body = PhotoImportBody {
            photos: items,
            phase,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let created: Vec<Value> = Self::check(response).await?.json().await?;
        Ok(created.len())
    }

    async fn compute_boq(
        &self,
        project_id: Uuid,
        request: &BoqComputeRequest,
    ) -> Result<usize, BackendError> {
        let url = format!("{}/api/projects/{}/boq/compute", self.base_url, project_id);

        let response = self.client.post(&url).json(request).send().await?;
        let computed: BoqComputeResponse = Self::check(response).await?.json().await?;
        Ok(computed.items.len())
    }

    async fn export_boq_workbook(&self, project_id: Uuid) -> Result<Vec<u8>, BackendError> {
        let url = format!("{}/api/projects/{}/boq/export", self.base_url, project_id);
        let response = self.client.get(&url).send().await?;
        Ok(Self::check(response).await?.bytes().await?.to_vec())
    }

    async fn export_tssr_document(&self, project_id: Uuid) -> Result<Vec<u8>, BackendError> {
        let url = format!("{}/api/projects/{}/tssr/export", self.base_url, project_id);
        let response = self.client.get(&url).send().await?;
        Ok(Self::check(response).await?.bytes().await?.to_vec())
    }
}

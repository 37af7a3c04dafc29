// OneDrive (Graph-style) client for the remote document store.
//
// Site documents, photos and generated artifacts live in a shared drive
// folder tree. This module owns the drive API surface the import flow needs:
// listing, search, metadata/download-handle resolution, download, upload and
// folder creation. Everything goes through the `DriveStore` trait so the
// orchestration layer can be tested against an in-memory store.

use serde::Deserialize;
use thiserror::Error;

/// Listings are name-ordered and capped at this page size
const LIST_PAGE_SIZE: usize = 200;

#[derive(Error, Debug)]
pub enum DriveError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
    #[error("item not found")]
    NotFound,
    #[error("access token rejected")]
    Unauthorized,
    #[error("'{name}' is locked by another process")]
    Locked { name: String },
}

/// Immutable snapshot of a drive item as returned by a listing call.
/// Never mutated locally - remote contents are re-fetched on every visit.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    pub size: Option<u64>,
    pub is_folder: bool,
    pub mime_type: Option<String>,
    /// Path of the containing folder, relative to the drive root
    pub parent_path: String,
    /// Short-lived pre-authenticated download URL, present on metadata fetches
    pub download_url: Option<String>,
    pub web_url: Option<String>,
}

/// Trait for remote store operations (allows mocking for tests)
#[async_trait::async_trait]
pub trait DriveStore: Send + Sync {
    /// List the children of a folder (`None` = drive root), name-ordered
    async fn list_children(&self, folder_id: Option<&str>) -> Result<Vec<DriveItem>, DriveError>;
    async fn search(&self, query: &str) -> Result<Vec<DriveItem>, DriveError>;
    /// Fetch full metadata for one item, including its download URL
    async fn get_metadata(&self, item_id: &str) -> Result<DriveItem, DriveError>;
    async fn download(&self, item_id: &str) -> Result<Vec<u8>, DriveError>;
    /// Upload `bytes` as `name` under the folder at `parent_path`.
    /// May answer `Locked` while the target is open elsewhere.
    async fn upload(
        &self,
        parent_path: &str,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<DriveItem, DriveError>;
    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<DriveItem, DriveError>;
}

// ============================================================================
// Graph wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListResponse {
    value: Vec<ItemResponse>,
}

#[derive(Debug, Deserialize)]
struct ItemResponse {
    id: String,
    name: String,
    size: Option<u64>,
    file: Option<FileFacet>,
    folder: Option<FolderFacet>,
    #[serde(rename = "parentReference")]
    parent_reference: Option<ParentReference>,
    #[serde(rename = "@microsoft.graph.downloadUrl")]
    download_url: Option<String>,
    #[serde(rename = "webUrl")]
    web_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileFacet {
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
}

// Presence of the facet is what marks a folder; its fields are not needed
#[derive(Debug, Deserialize)]
struct FolderFacet {}

#[derive(Debug, Deserialize)]
struct ParentReference {
    path: Option<String>,
}

impl ItemResponse {
    fn into_item(self) -> DriveItem {
        // Graph paths look like "/drive/root:/Sites/OSL0042"; keep the part
        // after the root marker
        let parent_path = self
            .parent_reference
            .and_then(|p| p.path)
            .map(|p| match p.find(':') {
                Some(colon) => p[colon + 1..].to_string(),
                None => p,
            })
            .unwrap_or_default();

        DriveItem {
            id: self.id,
            name: self.name,
            size: self.size,
            is_folder: self.folder.is_some(),
            mime_type: self.file.and_then(|f| f.mime_type),
            parent_path,
            download_url: self.download_url,
            web_url: self.web_url,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone)]
pub struct DriveClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl DriveClient {
    pub fn new(base_url: String, access_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            access_token,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, DriveError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        check_status(&response)?;
        Ok(response.json().await?)
    }

    /// Percent-encode every segment of a root-relative folder path
    fn encode_path(path: &str) -> String {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), DriveError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else if status.as_u16() == 401 || status.as_u16() == 403 {
        Err(DriveError::Unauthorized)
    } else if status.as_u16() == 404 {
        Err(DriveError::NotFound)
    } else {
        Err(DriveError::Unavailable(format!(
            "drive answered {}",
            status
        )))
    }
}

#[async_trait::async_trait]
impl DriveStore for DriveClient {
    async fn list_children(&self, folder_id: Option<&str>) -> Result<Vec<DriveItem>, DriveError> {
        let url = match folder_id {
            Some(id) => format!(
                "{}/items/{}/children?$top={}&$orderby=name",
                self.base_url, id, LIST_PAGE_SIZE
            ),
            None => format!(
                "{}/root/children?$top={}&$orderby=name",
                self.base_url, LIST_PAGE_SIZE
            ),
        };

        let listing: ListResponse = self.get_json(&url).await?;
        Ok(listing.value.into_iter().map(|i| i.into_item()).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<DriveItem>, DriveError> {
        let url = format!(
            "{}/root/search(q='{}')?$top={}",
            self.base_url,
            urlencoding::encode(query),
            LIST_PAGE_SIZE
        );

        let listing: ListResponse = self.get_json(&url).await?;
        Ok(listing.value.into_iter().map(|i| i.into_item()).collect())
    }

    async fn get_metadata(&self, item_id: &str) -> Result<DriveItem, DriveError> {
        let url = format!("{}/items/{}", self.base_url, item_id);
        let item: ItemResponse = self.get_json(&url).await?;
        Ok(item.into_item())
    }

    async fn download(&self, item_id: &str) -> Result<Vec<u8>, DriveError> {
        let url = format!("{}/items/{}/content", self.base_url, item_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        check_status(&response)?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn upload(
        &self,
        parent_path: &str,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<DriveItem, DriveError> {
        let url = format!(
            "{}/root:/{}/{}:/content",
            self.base_url,
            Self::encode_path(parent_path),
            urlencoding::encode(name)
        );

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.access_token)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        // 423 means the target is open in another client
        if response.status().as_u16() == 423 {
            return Err(DriveError::Locked {
                name: name.to_string(),
            });
        }
        check_status(&response)?;

        let item: ItemResponse = response.json().await?;
        Ok(item.into_item())
    }

    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<DriveItem, DriveError> {
        let url = format!("{}/items/{}/children", self.base_url, parent_id);

        let body = serde_json::json!({
            "name": name,
            "folder": {},
            "@microsoft.graph.conflictBehavior": "fail",
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        check_status(&response)?;
        let item: ItemResponse = response.json().await?;
        Ok(item.into_item())
    }
}

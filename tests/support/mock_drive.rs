use async_trait::async_trait;
use siteforge::drive_client::{DriveError, DriveItem, DriveStore};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory drive: folder id → children. Records every call in order and
/// can be told to fail listings, break metadata fetches or lock uploads.
#[derive(Default)]
pub struct MockDrive {
    children: Mutex<HashMap<String, Vec<DriveItem>>>,
    downloads: Mutex<HashMap<String, Vec<u8>>>,
    failing_folders: Mutex<HashSet<String>>,
    broken_items: Mutex<HashSet<String>>,
    locked_names: Mutex<HashSet<String>>,
    lock_everything: Mutex<bool>,
    pub calls: Mutex<Vec<String>>,
}

const ROOT: &str = "<root>";

impl MockDrive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_children(&self, folder_id: Option<&str>, items: Vec<DriveItem>) {
        let key = folder_id.unwrap_or(ROOT).to_string();
        self.children.lock().unwrap().insert(key, items);
    }

    pub fn put_bytes(&self, item_id: &str, bytes: Vec<u8>) {
        self.downloads
            .lock()
            .unwrap()
            .insert(item_id.to_string(), bytes);
    }

    /// Make listings of this folder fail with `Unavailable`
    pub fn fail_folder(&self, folder_id: &str) {
        self.failing_folders
            .lock()
            .unwrap()
            .insert(folder_id.to_string());
    }

    /// Make metadata fetches for this item fail
    pub fn break_item(&self, item_id: &str) {
        self.broken_items
            .lock()
            .unwrap()
            .insert(item_id.to_string());
    }

    /// Uploads targeting this exact name answer `Locked`
    pub fn lock_name(&self, name: &str) {
        self.locked_names.lock().unwrap().insert(name.to_string());
    }

    /// Every upload answers `Locked`, regardless of name
    pub fn lock_everything(&self) {
        *self.lock_everything.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn upload_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("upload:"))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DriveStore for MockDrive {
    async fn list_children(&self, folder_id: Option<&str>) -> Result<Vec<DriveItem>, DriveError> {
        let key = folder_id.unwrap_or(ROOT);
        self.record(format!("list:{}", key));

        if self.failing_folders.lock().unwrap().contains(key) {
            return Err(DriveError::Unavailable("injected failure".to_string()));
        }

        Ok(self
            .children
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn search(&self, query: &str) -> Result<Vec<DriveItem>, DriveError> {
        self.record(format!("search:{}", query));

        let children = self.children.lock().unwrap();
        Ok(children
            .values()
            .flatten()
            .filter(|item| item.name.contains(query))
            .cloned()
            .collect())
    }

    async fn get_metadata(&self, item_id: &str) -> Result<DriveItem, DriveError> {
        self.record(format!("meta:{}", item_id));

        if self.broken_items.lock().unwrap().contains(item_id) {
            return Err(DriveError::NotFound);
        }

        let children = self.children.lock().unwrap();
        let item = children
            .values()
            .flatten()
            .find(|item| item.id == item_id)
            .cloned()
            .ok_or(DriveError::NotFound)?;

        Ok(DriveItem {
            download_url: Some(format!("https://dl.example/{}", item_id)),
            ..item
        })
    }

    async fn download(&self, item_id: &str) -> Result<Vec<u8>, DriveError> {
        self.record(format!("download:{}", item_id));

        self.downloads
            .lock()
            .unwrap()
            .get(item_id)
            .cloned()
            .ok_or(DriveError::NotFound)
    }

    async fn upload(
        &self,
        parent_path: &str,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<DriveItem, DriveError> {
        self.record(format!("upload:{}", name));

        let locked = *self.lock_everything.lock().unwrap()
            || self.locked_names.lock().unwrap().contains(name);
        if locked {
            return Err(DriveError::Locked {
                name: name.to_string(),
            });
        }

        Ok(DriveItem {
            id: format!("uploaded-{}", name),
            name: name.to_string(),
            size: Some(bytes.len() as u64),
            is_folder: false,
            mime_type: None,
            parent_path: parent_path.to_string(),
            download_url: None,
            web_url: Some(format!("https://web.example{}/{}", parent_path, name)),
        })
    }

    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<DriveItem, DriveError> {
        self.record(format!("create_folder:{}:{}", parent_id, name));

        Ok(DriveItem {
            id: format!("folder-{}", name),
            name: name.to_string(),
            size: None,
            is_folder: true,
            mime_type: None,
            parent_path: String::new(),
            download_url: None,
            web_url: None,
        })
    }
}

// Breadcrumb navigation over the remote drive tree.
//
// Every visit re-fetches the folder listing - remote contents can change
// between visits, so nothing is cached. Navigation is all-or-nothing: the
// listing call runs first and a failure leaves the breadcrumb and the
// current entries untouched.

use crate::drive_client::{DriveError, DriveItem, DriveStore};
use std::sync::Arc;

/// One entry in the navigation path. The root crumb has `id == None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub id: Option<String>,
    pub name: String,
}

pub struct RemoteBrowser {
    store: Arc<dyn DriveStore>,
    breadcrumb: Vec<Crumb>,
    entries: Vec<DriveItem>,
}

impl RemoteBrowser {
    pub fn new(store: Arc<dyn DriveStore>) -> Self {
        Self {
            store,
            breadcrumb: vec![Crumb {
                id: None,
                name: "OneDrive".to_string(),
            }],
            entries: Vec::new(),
        }
    }

    pub fn breadcrumb(&self) -> &[Crumb] {
        &self.breadcrumb
    }

    pub fn entries(&self) -> &[DriveItem] {
        &self.entries
    }

    /// Display path of the current folder, e.g. `OneDrive/Sites/OSL0042`
    pub fn current_path(&self) -> String {
        self.breadcrumb
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Entry action for the Browsing phase: list the drive root
    pub async fn open(&mut self) -> Result<&[DriveItem], DriveError> {
        self.entries = self.store.list_children(None).await?;
        Ok(&self.entries)
    }

    /// Descend into a child folder, appending a crumb
    pub async fn navigate(&mut self, folder: &DriveItem) -> Result<&[DriveItem], DriveError> {
        let entries = self.store.list_children(Some(&folder.id)).await?;

        self.breadcrumb.push(Crumb {
            id: Some(folder.id.clone()),
            name: folder.name.clone(),
        });
        self.entries = entries;
        Ok(&self.entries)
    }

    /// Search the whole drive by name. Results are a flat listing; the
    /// breadcrumb and current entries are left alone.
    pub async fn search(&self, query: &str) -> Result<Vec<DriveItem>, DriveError> {
        self.store.search(query).await
    }

    /// Jump back to an ancestor crumb, dropping everything after it.
    /// `index` past the end is clamped to the last crumb.
    pub async fn navigate_to(&mut self, index: usize) -> Result<&[DriveItem], DriveError> {
        let index = index.min(self.breadcrumb.len() - 1);
        let folder_id = self.breadcrumb[index].id.clone();

        let entries = self.store.list_children(folder_id.as_deref()).await?;

        self.breadcrumb.truncate(index + 1);
        self.entries = entries;
        Ok(&self.entries)
    }
}

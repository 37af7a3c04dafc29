// Role-keyed bindings for the import confirmation step.
//
// Four independent slots, each holding at most one drive item: the radio
// plan document (required), the power calculator document, the photo source
// folder and the target project folder. Binding the photo source is a
// compound operation - the folder is probed for its image count before the
// bind completes.

use crate::drive_client::{DriveError, DriveItem, DriveStore};
use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Roles a drive item can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRole {
    PrimaryDocument,
    AuxiliaryDocument,
    PhotoSource,
    TargetFolder,
}

/// A drive item captured together with the breadcrumb path it was picked from
#[derive(Debug, Clone, PartialEq)]
pub struct BoundItem {
    pub item: DriveItem,
    pub path: String,
}

/// The photo-source slot carries the probed image count
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoSource {
    pub folder: BoundItem,
    pub image_count: usize,
}

/// The current bindings. Assigning a slot replaces, never appends; only
/// `primary_document` is required to start the import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSelection {
    pub primary_document: Option<BoundItem>,
    pub auxiliary_document: Option<BoundItem>,
    pub photo_source: Option<PhotoSource>,
    pub target_folder: Option<BoundItem>,
}

/// Name filter for photo candidates. Photo folders carry planning documents
/// next to the photos, so only obvious image files count.
pub fn is_image_name(name: &str) -> bool {
    static IMAGE_EXT: OnceLock<Regex> = OnceLock::new();
    IMAGE_EXT
        .get_or_init(|| {
            Regex::new(r"(?i)\.(jpe?g|png|gif|bmp|heic|webp)$").expect("image extension pattern")
        })
        .is_match(name)
}

pub struct SelectionModel {
    store: Arc<dyn DriveStore>,
    selection: ImportSelection,
    /// Folder ids with an image-count probe outstanding, so callers can
    /// avoid double-binding while one is in flight
    counting: HashSet<String>,
}

impl SelectionModel {
    pub fn new(store: Arc<dyn DriveStore>) -> Self {
        Self {
            store,
            selection: ImportSelection::default(),
            counting: HashSet::new(),
        }
    }

    pub fn selection(&self) -> &ImportSelection {
        &self.selection
    }

    pub fn has_primary(&self) -> bool {
        self.selection.primary_document.is_some()
    }

    pub fn is_counting(&self, item_id: &str) -> bool {
        self.counting.contains(item_id)
    }

    /// Bind the radio plan document. Synchronous and unconditional - no
    /// content inspection happens at bind time.
    pub fn bind_primary(&mut self, item: DriveItem, path: &str) {
        self.selection.primary_document = Some(BoundItem {
            item,
            path: path.to_string(),
        });
    }

    /// Bind the power calculator document
    pub fn bind_auxiliary(&mut self, item: DriveItem, path: &str) {
        self.selection.auxiliary_document = Some(BoundItem {
            item,
            path: path.to_string(),
        });
    }

    /// Bind the target project folder
    pub fn bind_target(&mut self, item: DriveItem, path: &str) {
        self.selection.target_folder = Some(BoundItem {
            item,
            path: path.to_string(),
        });
    }

    /// Bind the photo source folder. Probes the folder's children first and
    /// completes the bind with the image count attached; on probe failure
    /// the slot stays unbound and the error is the caller's to surface (no
    /// automatic retry).
    pub async fn bind_photo_source(
        &mut self,
        item: DriveItem,
        path: &str,
    ) -> Result<usize, DriveError> {
        self.counting.insert(item.id.clone());

        let children = match self.store.list_children(Some(&item.id)).await {
            Ok(children) => children,
            Err(e) => {
                self.counting.remove(&item.id);
                warn!("Image-count probe failed for '{}': {}", item.name, e);
                return Err(e);
            }
        };

        let image_count = children
            .iter()
            .filter(|c| !c.is_folder && is_image_name(&c.name))
            .count();

        debug!(
            "Probed '{}': {} of {} entries are images",
            item.name,
            image_count,
            children.len()
        );

        self.counting.remove(&item.id);
        self.selection.photo_source = Some(PhotoSource {
            folder: BoundItem {
                item,
                path: path.to_string(),
            },
            image_count,
        });

        Ok(image_count)
    }

    pub fn clear(&mut self, role: SelectionRole) {
        match role {
            SelectionRole::PrimaryDocument => self.selection.primary_document = None,
            SelectionRole::AuxiliaryDocument => self.selection.auxiliary_document = None,
            SelectionRole::PhotoSource => self.selection.photo_source = None,
            SelectionRole::TargetFolder => self.selection.target_folder = None,
        }
    }

    /// Drop all bindings, e.g. when a session is cancelled
    pub fn reset(&mut self) {
        self.selection = ImportSelection::default();
        self.counting.clear();
    }
}

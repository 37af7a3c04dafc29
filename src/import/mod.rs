// # Import Module
//
// The drive → SiteForge import flow, built from focused components:
//
// - **RemoteBrowser**: breadcrumb navigation over the drive tree
// - **SelectionModel**: role-keyed document/folder bindings
// - **BatchResolver**: rate-friendly download-handle resolution
// - **ImportOrchestrator**: the phase state machine driving the pipeline
// - **Kickstart**: post-import questionnaire applied to the working document
//
// Public API:
// - `ImportOrchestrator` / `ImportOptions`: open and drive a session
// - `ImportPhase` / `ImportProgress` / `ImportError`: session surface
// - `RemoteBrowser` / `SelectionModel`: the pre-confirmation picking state

mod batch_resolver;
mod browser;
mod kickstart;
mod orchestrator;
mod selection;
mod types;

pub use batch_resolver::{BatchResolver, DOWNLOAD_BATCH_SIZE};
pub use browser::{Crumb, RemoteBrowser};
pub use kickstart::{
    apply_build_type, BuildType, CabinetType, KickstartAnswers, KickstartSeed, SiteCategory,
};
pub use orchestrator::{ImportOptions, ImportOrchestrator};
pub use selection::{
    is_image_name, BoundItem, ImportSelection, PhotoSource, SelectionModel, SelectionRole,
};
pub use types::{ImportError, ImportPhase, ImportProgress};

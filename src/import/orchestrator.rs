// # Import Orchestrator
//
// The state machine that drives one drive → SiteForge import session:
//
//   Browsing → Confirming → Importing → Kickstart → Done
//
// with Importing → Confirming on failure (the selection survives, so the
// user fixes the problem and retries) and any phase → Aborted on cancel.
//
// Cancellation is cooperative: it abandons the in-memory session but does
// not abort requests already in flight, so a project record created before
// the cancel persists on the backend. Nothing is rolled back.

use crate::backend_client::{BoqComputeRequest, NewProject, ProjectBackend};
use crate::drive_client::{DriveItem, DriveStore};
use crate::import::batch_resolver::{BatchResolver, DOWNLOAD_BATCH_SIZE};
use crate::import::browser::RemoteBrowser;
use crate::import::kickstart::{KickstartAnswers, KickstartSeed};
use crate::import::selection::{is_image_name, PhotoSource, SelectionModel};
use crate::import::types::{ImportError, ImportPhase, ImportProgress};
use crate::models::{parse_config, PowerCalc, RadioPlan};
use crate::parser_client::DocumentParser;
use crate::project_context::ProjectContext;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Tunables for one import session
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Operator stamped onto the new project record
    pub operator: String,
    /// Batch size for photo download-handle resolution
    pub photo_batch_size: usize,
    /// Phase tag on imported photos
    pub photo_phase: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            operator: String::new(),
            photo_batch_size: DOWNLOAD_BATCH_SIZE,
            photo_phase: "planning".to_string(),
        }
    }
}

pub struct ImportOrchestrator {
    drive: Arc<dyn DriveStore>,
    backend: Arc<dyn ProjectBackend>,
    parser: Arc<dyn DocumentParser>,
    context: ProjectContext,
    options: ImportOptions,

    browser: RemoteBrowser,
    selection: SelectionModel,
    phase: ImportPhase,
    message: String,
    kickstart_seed: Option<KickstartSeed>,
    progress_tx: mpsc::UnboundedSender<ImportProgress>,
}

impl ImportOrchestrator {
    /// Open a new import session. Returns the orchestrator and the progress
    /// event receiver the caller drives its display from. The session starts
    /// in Browsing; call `begin` to run its entry action.
    pub fn new(
        drive: Arc<dyn DriveStore>,
        backend: Arc<dyn ProjectBackend>,
        parser: Arc<dyn DocumentParser>,
        context: ProjectContext,
        options: ImportOptions,
    ) -> (Self, mpsc::UnboundedReceiver<ImportProgress>) {
        let (progress_tx, progress_rx) = mpsc::unbounded_channel();

        let orchestrator = Self {
            browser: RemoteBrowser::new(drive.clone()),
            selection: SelectionModel::new(drive.clone()),
            drive,
            backend,
            parser,
            context,
            options,
            phase: ImportPhase::Browsing,
            message: String::new(),
            kickstart_seed: None,
            progress_tx,
        };

        (orchestrator, progress_rx)
    }

    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn browser(&self) -> &RemoteBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut RemoteBrowser {
        &mut self.browser
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionModel {
        &mut self.selection
    }

    pub fn kickstart_seed(&self) -> Option<&KickstartSeed> {
        self.kickstart_seed.as_ref()
    }

    /// Entry action for Browsing: list the drive root
    pub async fn begin(&mut self) -> Result<(), ImportError> {
        if self.phase != ImportPhase::Browsing {
            return Err(ImportError::InvalidTransition(self.phase));
        }
        self.browser
            .open()
            .await
            .map_err(ImportError::StoreUnavailable)?;
        Ok(())
    }

    /// Browsing → Confirming once the user has made their picks
    pub fn review_selection(&mut self) -> Result<(), ImportError> {
        if self.phase != ImportPhase::Browsing {
            return Err(ImportError::InvalidTransition(self.phase));
        }
        self.set_phase(ImportPhase::Confirming);
        Ok(())
    }

    /// Confirming → Importing. Refused before anything reaches the network
    /// unless a radio plan document is bound. On success the session sits in
    /// Kickstart with the returned seed; on failure it is back in Confirming
    /// with the selection intact.
    pub async fn start_import(&mut self) -> Result<KickstartSeed, ImportError> {
        if self.phase != ImportPhase::Confirming {
            return Err(ImportError::InvalidTransition(self.phase));
        }
        if !self.selection.has_primary() {
            return Err(ImportError::RequiredInputMissing);
        }

        self.set_phase(ImportPhase::Importing);

        match self.run_import().await {
            Ok(seed) => {
                self.kickstart_seed = Some(seed.clone());
                self.set_phase(ImportPhase::Kickstart);
                Ok(seed)
            }
            Err(e) => {
                let _ = self.progress_tx.send(ImportProgress::Failed {
                    error: e.to_string(),
                });
                self.set_phase(ImportPhase::Confirming);
                Err(e)
            }
        }
    }

    async fn run_import(&mut self) -> Result<KickstartSeed, ImportError> {
        let selection = self.selection.selection().clone();
        let primary = selection
            .primary_document
            .as_ref()
            .ok_or(ImportError::RequiredInputMissing)?;

        // 1. Download and parse the radio plan. This is the one input the
        //    rest of the pipeline cannot proceed without.
        self.set_message(format!("Reading {}", primary.item.name));
        let bytes = self
            .drive
            .download(&primary.item.id)
            .await
            .map_err(|e| ImportError::step("radio plan download", e))?;
        let plan = self
            .parser
            .parse_radio_plan(&bytes)
            .await
            .map_err(|e| ImportError::step("radio plan parse", e))?;

        info!(
            "Parsed radio plan for {}: {} sectors, config '{}'",
            plan.site_id,
            plan.sector_count(),
            plan.config
        );

        // 2. The power calculator is optional: a failure here degrades to a
        //    document-only import instead of aborting.
        let mut power_calc = None;
        if let Some(aux) = &selection.auxiliary_document {
            self.set_message(format!("Reading {}", aux.item.name));
            match self.parse_power_calc(&aux.item).await {
                Ok(calc) => power_calc = Some(calc),
                Err(e) => self.warn_step(format!("Power calculator skipped: {}", e)),
            }
        }

        // 3. Create the backend project from the parsed fields. The bound
        //    target folder rides along as project metadata so later exports
        //    know where to land.
        self.set_message(format!("Creating project {}", plan.site_id));
        let fields = NewProject {
            site_id: plan.site_id.clone(),
            site_name: plan.project.clone(),
            operator: self.options.operator.clone(),
        };
        let project = self
            .backend
            .create_project(&fields)
            .await
            .map_err(|e| ImportError::step("project creation", e))?;

        if let Some(target) = &selection.target_folder {
            self.backend
                .set_project_folder(project.id, &target.item.id, &target.path)
                .await
                .map_err(|e| ImportError::step("project folder", e))?;
        }

        // 4. The project id goes into shared context before any
        //    working-field write: field mutation kicks off debounced
        //    persistence that needs a target to write against.
        self.context.set_project_id(project.id);

        // 5. Gate up before parsed data lands in shared state, so listeners
        //    watching for "plan is present" cannot recompute against
        //    half-applied answers.
        self.context.gate().raise();
        self.install_working_fields(project.id, &primary.item.name, &plan, power_calc.as_ref())
            .await?;
        self.context.install_parsed(plan.clone(), power_calc);

        // 6. Photos are supplementary to document generation: any failure in
        //    this whole step is reported and the pipeline moves on.
        if let Some(photo_source) = &selection.photo_source {
            if let Err(e) = self.import_photos(project.id, photo_source).await {
                self.warn_step(format!("Photo import skipped: {}", e));
            }
        }

        // 7. Hand over to the questionnaire.
        Ok(KickstartSeed::from_radio_plan(&plan))
    }

    /// Kickstart → Done. Applies the answers (if any), releases the BOQ
    /// gate and triggers the one recompute of this session.
    pub async fn finish(&mut self, answers: Option<KickstartAnswers>) -> Result<(), ImportError> {
        if self.phase != ImportPhase::Kickstart {
            return Err(ImportError::InvalidTransition(self.phase));
        }

        let project_id = self
            .context
            .project_id()
            .ok_or_else(|| ImportError::step("kickstart", "no project in context"))?;
        let plan = self
            .context
            .radio_plan()
            .ok_or_else(|| ImportError::step("kickstart", "no parsed plan in context"))?;

        let mut config = plan.config.clone();
        if let Some(answers) = answers {
            for (key, value) in answers.to_field_updates(&plan.config) {
                if key == "config" {
                    if let Some(transformed) = value.as_str() {
                        config = transformed.to_string();
                    }
                }
                self.backend
                    .set_working_field(project_id, key, value)
                    .await
                    .map_err(|e| ImportError::step("kickstart answers", e))?;
            }
        }

        // Gate down, then exactly one recompute - in that order, as one step
        // from the session's point of view.
        self.context.gate().release();
        let mut request = BoqComputeRequest::from_parsed(&plan, self.context.power_calc().as_ref());
        request.config = config;
        let item_count = self
            .backend
            .compute_boq(project_id, &request)
            .await
            .map_err(|e| ImportError::step("BOQ compute", e))?;

        info!("BOQ computed: {} items for project {}", item_count, project_id);

        let _ = self
            .progress_tx
            .send(ImportProgress::Completed { project_id });
        self.set_phase(ImportPhase::Done);
        Ok(())
    }

    /// Abandon the session from any phase. In-flight requests are not
    /// aborted; whatever the backend already created stays.
    pub fn cancel(&mut self) {
        self.selection.reset();
        self.kickstart_seed = None;
        self.set_phase(ImportPhase::Aborted);
    }

    async fn parse_power_calc(&self, item: &DriveItem) -> Result<PowerCalc, ImportError> {
        let bytes = self
            .drive
            .download(&item.id)
            .await
            .map_err(|e| ImportError::step("power calculator download", e))?;
        self.parser
            .parse_power_calc(&bytes)
            .await
            .map_err(|e| ImportError::step("power calculator parse", e))
    }

    /// Working-document fields derivable from the parsed documents
    async fn install_working_fields(
        &self,
        project_id: Uuid,
        primary_name: &str,
        plan: &RadioPlan,
        power_calc: Option<&PowerCalc>,
    ) -> Result<(), ImportError> {
        let parsed = parse_config(&plan.config);
        let sector_data: Vec<Value> = plan
            .sectors
            .iter()
            .map(|s| {
                json!({
                    "id": s.id,
                    "azimuth": s.azimuth,
                    "mTilt": s.m_tilt,
                    "eTilt": s.e_tilt,
                    "antennas": s.antennas,
                })
            })
            .collect();

        let mut fields: Vec<(&str, Value)> = vec![
            ("config", json!(plan.config)),
            ("sectors", json!(plan.sector_count())),
            ("size", json!(parsed.site_size())),
            ("sectorData", json!(sector_data)),
            ("rfsrRnp", json!(primary_name)),
        ];
        if let Some(calc) = power_calc {
            fields.push(("rectifier", json!(calc.rectifier_model)));
        }

        for (key, value) in fields {
            self.backend
                .set_working_field(project_id, key, value)
                .await
                .map_err(|e| ImportError::step("working document update", e))?;
        }

        Ok(())
    }

    async fn import_photos(
        &mut self,
        project_id: Uuid,
        source: &PhotoSource,
    ) -> Result<(), ImportError> {
        let children = self
            .drive
            .list_children(Some(&source.folder.item.id))
            .await
            .map_err(ImportError::StoreUnavailable)?;

        let candidates: Vec<DriveItem> = children
            .into_iter()
            .filter(|c| !c.is_folder && is_image_name(&c.name))
            .collect();

        if candidates.is_empty() {
            info!("Photo folder '{}' has no images", source.folder.item.name);
            return Ok(());
        }

        let resolver =
            BatchResolver::with_batch_size(self.drive.clone(), self.options.photo_batch_size);
        let progress_tx = self.progress_tx.clone();
        let message = &mut self.message;

        let items = resolver
            .resolve(&candidates, |processed, total| {
                *message = format!("Importing photos ({}/{})", processed, total);
                let _ = progress_tx.send(ImportProgress::PhotoBatch { processed, total });
            })
            .await;

        if items.is_empty() {
            warn!("None of the photos could be resolved");
            return Ok(());
        }

        let imported = self
            .backend
            .import_photos(project_id, &items, &self.options.photo_phase)
            .await
            .map_err(|e| ImportError::step("photo import", e))?;

        info!("Imported {}/{} photos", imported, candidates.len());
        Ok(())
    }

    fn set_phase(&mut self, phase: ImportPhase) {
        self.phase = phase;
        let _ = self.progress_tx.send(ImportProgress::PhaseChanged { phase });
    }

    fn set_message(&mut self, text: String) {
        self.message = text.clone();
        let _ = self.progress_tx.send(ImportProgress::Message { text });
    }

    fn warn_step(&mut self, text: String) {
        warn!("{}", text);
        let _ = self.progress_tx.send(ImportProgress::Warning { text });
    }
}

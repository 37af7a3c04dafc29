// Shared per-project state.
//
// The import pipeline installs results here; the rest of the editor reads
// them. The context is the only mutable resource shared with code outside
// the pipeline, and the orchestrator is its single writer while the
// Importing phase runs. The embedded gate decides whether ambient
// "parsed data present" listeners may trigger a BOQ recompute.

use crate::backend_client::{BackendError, BoqComputeRequest, ProjectBackend};
use crate::compute_gate::ComputeGate;
use crate::models::{PowerCalc, RadioPlan};
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct ProjectContextInner {
    project_id: Option<Uuid>,
    radio_plan: Option<RadioPlan>,
    power_calc: Option<PowerCalc>,
}

#[derive(Clone, Default)]
pub struct ProjectContext {
    inner: Arc<Mutex<ProjectContextInner>>,
    gate: ComputeGate,
}

/// What happened when an ambient listener asked for a recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeOutcome {
    /// The BOQ engine ran; carries the computed item count
    Ran(usize),
    /// The gate is up: an import session owns the next recompute
    SuppressedByGate,
    /// No parsed plan installed yet
    NoParsedData,
    /// No project bound to this context
    NoProject,
}

impl ProjectContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self) -> &ComputeGate {
        &self.gate
    }

    pub fn project_id(&self) -> Option<Uuid> {
        self.inner.lock().unwrap().project_id
    }

    /// Install the project identity. Must happen before any working-field
    /// write: field mutation kicks off debounced persistence that needs a
    /// target to write against.
    pub fn set_project_id(&self, project_id: Uuid) {
        self.inner.lock().unwrap().project_id = Some(project_id);
    }

    pub fn radio_plan(&self) -> Option<RadioPlan> {
        self.inner.lock().unwrap().radio_plan.clone()
    }

    pub fn power_calc(&self) -> Option<PowerCalc> {
        self.inner.lock().unwrap().power_calc.clone()
    }

    /// Install parsed payloads. Callers raise the gate first so listeners
    /// watching for this data cannot recompute against half-applied answers.
    pub fn install_parsed(&self, plan: RadioPlan, power_calc: Option<PowerCalc>) {
        let mut inner = self.inner.lock().unwrap();
        inner.radio_plan = Some(plan);
        inner.power_calc = power_calc;
    }

    /// Discard all state, returning the context to its pre-import shape
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.project_id = None;
        inner.radio_plan = None;
        inner.power_calc = None;
        self.gate.release();
    }

    /// Ambient entry point for recompute triggers. Runs the BOQ engine only
    /// when a parsed plan is present and no import session holds the gate.
    pub async fn try_recompute(
        &self,
        backend: &dyn ProjectBackend,
    ) -> Result<RecomputeOutcome, BackendError> {
        if self.gate.is_pending() {
            debug!("Recompute suppressed: gate is up");
            return Ok(RecomputeOutcome::SuppressedByGate);
        }

        let (project_id, plan, power_calc) = {
            let inner = self.inner.lock().unwrap();
            (
                inner.project_id,
                inner.radio_plan.clone(),
                inner.power_calc.clone(),
            )
        };

        let Some(project_id) = project_id else {
            return Ok(RecomputeOutcome::NoProject);
        };
        let Some(plan) = plan else {
            return Ok(RecomputeOutcome::NoParsedData);
        };

        let request = BoqComputeRequest::from_parsed(&plan, power_calc.as_ref());
        let count = backend.compute_boq(project_id, &request).await?;
        Ok(RecomputeOutcome::Ran(count))
    }
}

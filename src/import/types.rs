use crate::drive_client::DriveError;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Phases of one import session, in their normal order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    Browsing,
    Confirming,
    Importing,
    Kickstart,
    Done,
    Aborted,
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportPhase::Browsing => "Browsing",
            ImportPhase::Confirming => "Confirming",
            ImportPhase::Importing => "Importing",
            ImportPhase::Kickstart => "Kickstart",
            ImportPhase::Done => "Done",
            ImportPhase::Aborted => "Aborted",
        };
        write!(f, "{}", name)
    }
}

/// Progress updates emitted during an import session.
///
/// Optional-step failures surface here as `Warning` events rather than as
/// errors: the pipeline keeps going, but nothing is swallowed silently.
#[derive(Debug, Clone)]
pub enum ImportProgress {
    PhaseChanged { phase: ImportPhase },
    Message { text: String },
    /// Photo resolution progress, reported once per completed batch
    PhotoBatch { processed: usize, total: usize },
    Warning { text: String },
    Failed { error: String },
    Completed { project_id: Uuid },
}

#[derive(Error, Debug)]
pub enum ImportError {
    /// Listing or navigation failed; session state is unchanged and the
    /// operation can be retried by re-navigating
    #[error("remote store unavailable: {0}")]
    StoreUnavailable(#[source] DriveError),

    /// A radio plan document must be bound before the import can start.
    /// Checked before anything reaches the network.
    #[error("no radio plan document selected")]
    RequiredInputMissing,

    /// A required pipeline step failed; the session is back in Confirming
    /// with the selection intact for a manual retry
    #[error("{step} failed: {message}")]
    PipelineStepFailed { step: &'static str, message: String },

    /// Write-back target still locked after the rename-and-retry
    #[error("'{name}' is locked on the remote store")]
    LockedResource { name: String },

    /// The requested operation is not valid in the session's current phase
    #[error("operation not valid in the {0} phase")]
    InvalidTransition(ImportPhase),
}

impl ImportError {
    pub(crate) fn step(step: &'static str, err: impl fmt::Display) -> Self {
        ImportError::PipelineStepFailed {
            step,
            message: err.to_string(),
        }
    }
}

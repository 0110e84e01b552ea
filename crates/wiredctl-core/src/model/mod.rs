// ── Domain model ──
//
// Feature catalogue, document and plan types shared by every stage of a
// reconcile run.

pub mod document;
pub mod feature;
pub mod plan;
pub mod version;

// ── Re-exports ──────────────────────────────────────────────────────

pub use document::{DeviceDocument, Layer2Document, StateTag};
pub use feature::{ApiFeature, DeletionClass, DiffClass, Feature};
pub use plan::{
    DeletionOutcome, DeletionStatus, IntentOperation, Mismatch, Plan, PlanRecord,
    ReconcileSummary, VerificationReport,
};
pub use version::{ControllerVersion, MINIMUM_CONTROLLER_VERSION};

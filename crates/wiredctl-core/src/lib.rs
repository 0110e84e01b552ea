//! Layer-2 reconciliation engine between `wiredctl-api` and the CLI.
//!
//! A run takes a declared Layer-2 document for one switch and converges the
//! controller's intent towards it:
//!
//! - **[`validate()`]**: Checks every field against its rule table and the
//!   cross-field constraints, producing a [`Layer2Document`] with coerced
//!   values. No controller contact.
//!
//! - **[`mapping`]**: A single schema-driven mapper that turns declared
//!   bodies into the controller's `{items: [...]}` wire containers, tagging
//!   each item with its `configType`.
//!
//! - **[`reader`]** / **[`diff`]**: Read deployed and intended state, then
//!   plan per API feature with keyed deep-merge. The payload always carries
//!   the full merged state, not a delta.
//!
//! - **[`executor`]** / **[`deletion`]**: Sequential intent writes polled
//!   to completion, then one deploy. The first failed task stops the run.
//!
//! - **[`Reconciler`]**: Facade tying the stages together, with optional
//!   post-deploy checks in [`verify`].

pub mod config;
pub mod deletion;
pub mod diff;
pub mod error;
pub mod executor;
pub mod mapping;
pub mod model;
pub mod reader;
pub mod reconciler;
pub mod validate;
pub mod verify;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    AuthCredentials, ControllerConfig, DeviceTarget, ReconcileOptions, TlsVerification,
};
pub use error::{CoreError, IntentFailure};
pub use executor::ExecutionReport;
pub use mapping::{WireState, map_document, map_feature};
pub use reader::DeviceState;
pub use reconciler::{PlannedRun, Reconciler};
pub use validate::validate;

pub use model::{
    ApiFeature, ControllerVersion, DeletionOutcome, DeletionStatus, DeviceDocument, Feature,
    IntentOperation, Layer2Document, MINIMUM_CONTROLLER_VERSION, Mismatch, Plan, PlanRecord,
    ReconcileSummary, StateTag, VerificationReport,
};

// Poll tuning is configured through `ReconcileOptions`.
pub use wiredctl_api::PollConfig;

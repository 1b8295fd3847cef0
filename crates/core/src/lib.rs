//! # Aahara Core
//!
//! Core coordination logic for the patient–dietitian system:
//! - account registration and lookup against the document store
//! - patient/dietitian assignment (policy, coordinator, roster resolution)
//! - clinical profile lifecycle and completeness evaluation
//! - todo synthesis over an injected persistence medium
//! - diet plan read model (latest-per-patient, publish gating)
//!
//! **No API concerns**: identity-provider mechanics, HTTP servers and
//! response shaping belong in `api-shared` and the `aahara-run` binary.
//! Every operation takes an explicit [`AuthContext`]; there is no ambient
//! current-user state anywhere in this crate.

pub mod accounts;
pub mod assignment;
pub mod completeness;
pub mod config;
pub mod constants;
pub mod context;
pub mod dietplan;
pub mod error;
pub mod policy;
pub mod store;
pub mod todo;

pub use accounts::{AccountService, DietitianCard};
pub use assignment::{AssignOutcome, AssignmentService};
pub use completeness::{is_complete, missing_fields};
pub use config::CoreConfig;
pub use context::AuthContext;
pub use dietplan::PlanService;
pub use error::{CoordResult, CoordinationError};
pub use policy::{evaluate as evaluate_assignment, AssignmentDecision};
pub use store::file::{shared_store, FileDocumentStore, FileTodoMedium};
pub use store::memory::MemoryTodoMedium;
pub use store::{AccountStore, PlanStore, ProfileStore, TodoMedium};
pub use todo::store::TodoStore;
pub use todo::synthesizer::{PatientSnapshot, TodoSynthesizer};

// Re-export the primitives downstream crates pair with this API.
pub use aahara_types::{EmailAddress, Identity, NonEmptyText};

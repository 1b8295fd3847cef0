//! # API Shared
//!
//! Shared utilities for the coordination API surface.
//!
//! Contains:
//! - `HealthService`, the liveness check behind `GET /health`
//! - identity resolution from the externally-issued identity header into an
//!   [`aahara_core::AuthContext`]
//!
//! HTTP framework types stay out of this crate; the binary maps these
//! helpers onto its routes.

pub mod auth;
pub mod health;

pub use auth::{resolve_identity, USER_ID_HEADER};
pub use health::{HealthRes, HealthService};

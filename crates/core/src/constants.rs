//! Constants used throughout the aahara core crate.
//!
//! This module contains all path and filename constants to ensure
//! consistency across the codebase and make maintenance easier.

/// Directory name for account documents.
pub const ACCOUNTS_DIR_NAME: &str = "accounts";

/// Directory name for clinical profile documents.
pub const PROFILES_DIR_NAME: &str = "profiles";

/// Directory name for generated diet plan documents.
pub const PLANS_DIR_NAME: &str = "plans";

/// Directory name for per-dietitian todo blobs.
pub const TODOS_DIR_NAME: &str = "todos";

/// Default directory for document storage when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "aahara_data";

/// Storage key under which a dietitian's todo list is persisted.
///
/// Kept from the source system's single namespaced key; the dietitian id is
/// appended by the file medium so each dietitian gets an isolated blob.
pub const TODO_STORAGE_KEY: &str = "dietitian_todos";

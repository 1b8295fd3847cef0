//! Dietitian reminder management.
//!
//! [`store::TodoStore`] is the keyed collection over an injected persistence
//! medium; [`synthesizer::TodoSynthesizer`] derives system-generated records
//! from roster and profile-completeness state and merges them idempotently.

pub mod store;
pub mod synthesizer;

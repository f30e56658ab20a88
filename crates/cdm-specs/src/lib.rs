//! CDM desired-state definitions
//!
//! Typed, validated descriptions of the resources an operator wants on the
//! appliance, and the YAML manifest that bundles them.

pub mod archival;
pub mod cluster;
pub mod error;
pub mod fileset;
pub mod host;
pub mod manifest;
pub mod sla;
pub mod snapshot;
pub mod validation;

pub use archival::*;
pub use cluster::*;
pub use error::SpecError;
pub use fileset::*;
pub use host::*;
pub use manifest::Manifest;
pub use sla::*;
pub use snapshot::*;

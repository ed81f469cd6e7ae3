//! pawprint-annotate library interface
//!
//! Keeps the annotation folder in step with the worklist: every worklist
//! image gets a copy under a unique name, recorded in the annotation map,
//! so species tags can be written as sidecar files next to it.

pub mod naming;
pub mod stage;
pub mod status;

pub use crate::naming::{unique_name, ReservedNames};
pub use crate::stage::{stage_worklist, StageReport, StagedImage};
pub use crate::status::{workspace_status, StatusReport};

//! # Paw-print common library
//!
//! Shared code for the paw-print collection tools:
//! - Error type
//! - Configuration loading and project root resolution
//! - Tracing initialization
//! - Worklist CSV reading
//! - Annotation map and sidecar access
//! - Best-effort asset copy
//! - Progress bars

pub mod annotation_map;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod logging;
pub mod progress;
pub mod sidecar;
pub mod worklist;

pub use annotation_map::AnnotationMap;
pub use config::{ProjectPaths, TomlConfig};
pub use error::{Error, Result};

//! pawprint-collect library interface
//!
//! Builds the paw-print collection: copies worklist images into the site's
//! `objects/` folder and writes one metadata row per image.

pub mod coords;
pub mod dates;
pub mod error;
pub mod format;
pub mod geocode;
pub mod hooks;
pub mod metadata;
pub mod pipeline;
pub mod record;

pub use crate::error::{CollectError, CollectResult};
pub use crate::pipeline::{CollectionBuilder, RunSummary, SkipReason, SkippedItem};

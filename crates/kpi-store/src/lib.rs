#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kpi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Record source and preference store implementations.
//!
//! This crate provides implementations of the seam traits from `kpi-core`:
//!
//! - [`InMemorySource`] - [`RecordSource`] serving pre-fetched rows
//! - [`InMemoryStore`] - [`PreferenceStore`] backed by a map
//! - [`NoopStore`] - [`PreferenceStore`] that stores nothing

/// In-memory implementations.
pub mod memory;
/// No-op store implementation.
pub mod noop;

// Re-export the traits for convenience
pub use kpi_core::{PreferenceStore, RecordSource};

// Re-export implementations
pub use memory::{InMemorySource, InMemoryStore};
pub use noop::NoopStore;

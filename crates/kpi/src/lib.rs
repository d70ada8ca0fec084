#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kpi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Client KPI dashboard metrics.
//!
//! This crate re-exports the engine from `kpi-core` and the implementations
//! from `kpi-store`, and provides a [`Dashboard`] that wires record sources,
//! preferences and the engine together.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kpi::{ClientId, Dashboard, InMemorySource, RawRecord};
//!
//! #[tokio::main]
//! async fn main() -> kpi::Result<()> {
//!     let client = ClientId::new("acme-outdoor");
//!     let source = Arc::new(InMemorySource::new("sheets"));
//!     source
//!         .insert_periods(
//!             client.clone(),
//!             vec![RawRecord::new("May 2024").with_field("Revenue", "$12,400")],
//!         )
//!         .await;
//!
//!     let dashboard = Dashboard::new().with_source(source).with_memory_store();
//!     let rows = dashboard.table(&client).await?;
//!     println!("{} rows", rows.len());
//!
//!     Ok(())
//! }
//! ```

// Core types, traits and engine
pub use kpi_core::*;

// Source and store implementations
pub use kpi_store::{InMemorySource, InMemoryStore, NoopStore};

mod dashboard;
pub use dashboard::Dashboard;

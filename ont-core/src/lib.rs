//! ONT dataset tooling
//!
//! Shared library behind `ont-merge` and `ont-reset`:
//! - models: canonical ONT record and status
//! - loader / persist: JSON array read, atomic write with backup
//! - convert / merge: CSV-export rows into the canonical dataset
//! - reset: status baseline for every ONT
//! - dataset: handle tying a dataset path to its persister

pub mod config;
pub mod convert;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod logging;
pub mod merge;
pub mod models;
pub mod persist;
pub mod reset;

pub use config::{PathOverrides, ToolsConfig};
pub use dataset::{Dataset, MergePlan, ResetOutcome};
pub use error::StoreError;
pub use loader::{load_json_array, LoadOutcome};
pub use merge::{merge_records, MergeEvent, MergeOutcome};
pub use models::{OntRecord, OntStatus, SourceRecord};
pub use persist::{Persister, SaveReport};
pub use reset::{reset_statuses, ResetReport, StatusSummary};

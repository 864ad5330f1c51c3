//! `phasebill-consolidate` — two-snapshot inventory consolidation and
//! costing engine.
//!
//! Pure engine crate: receives pre-loaded snapshot rows and catalog entries,
//! returns a consolidated, priced, costed table with audit summaries.
//! No file IO.

pub mod catalog;
pub mod config;
pub mod cost;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod summary;
pub mod validate;

pub use config::ConsolidationConfig;
pub use engine::{build_base, cost_table, run, run_with_factor};
pub use error::ConsolidateError;
pub use model::{
    BaseTable, CatalogEntry, Category, ConsolidationInput, ConsolidationResult, Item,
    LifecycleState, SnapshotPair, SnapshotRow,
};

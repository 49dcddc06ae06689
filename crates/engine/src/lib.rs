//! `stocksync-engine` — reconciliation and bulk-update engine.
//!
//! Sequential batch pipeline: the snapshot's SKUs are chunked into bounded
//! batches, each batch is resolved to Shopify variants, a pure policy decides
//! update/skip per variant, pending corrections go out as one bulk mutation,
//! and everything is merged into a categorized per-SKU report. Per-batch
//! failures are isolated; a failed batch never aborts its successors.

pub mod batch;
pub mod policy;
pub mod report;
pub mod run;

pub use batch::batches;
pub use policy::{Action, SkipReason, decide};
pub use report::{RecordStatus, ResultRecord, RunReport, RunSummary};
pub use run::run;

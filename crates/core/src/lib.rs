//! `stocksync-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod config;
pub mod id;

pub use config::{ConfigError, RunConfig};
pub use id::{RunId, Sku};

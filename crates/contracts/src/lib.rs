//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Readings carry a UTC wall-clock timestamp taken at generation
//! - Timestamps are non-decreasing per source only, never across sources

mod config;
mod error;
mod reading;
mod shutdown;
mod sink;
mod source_id;
mod summary;

pub use config::*;
pub use error::*;
pub use reading::*;
pub use shutdown::{ShutdownListener, ShutdownSignal};
pub use sink::*;
pub use source_id::SourceId;
pub use summary::*;

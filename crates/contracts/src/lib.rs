//! # Contracts
//!
//! Shared interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Scheduling works on absolute unix timestamps truncated to whole seconds
//! - Intervals are configured in seconds, jittered in milliseconds

mod config;
mod error;
mod line_spec;
mod sink;

pub use config::*;
pub use error::*;
pub use line_spec::*;
pub use sink::*;

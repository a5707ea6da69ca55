//! Software audio graph — pure Rust rendering of the deck's node graph.
//!
//! The browser build drives real Web Audio nodes; this module provides
//! the same graph natively so the deck can be rendered and inspected
//! off the web.

pub mod buffer;
#[cfg(feature = "offline")]
pub mod decode;
pub mod filter;
pub mod graph;

pub use buffer::SampleBuffer;
pub use graph::{FilterId, OfflineGraph, SourceId, SourceStatus};

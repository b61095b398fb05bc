//! # newsdesk: a bounded-buffer news pipeline
//!
//! Producer threads write categorised articles into private bounded buffers;
//! a dispatcher sorts them into SPORTS, NEWS and WEATHER buffers; one
//! co-editor per category edits and forwards them to a shared screen buffer;
//! a screen manager prints them.
//!
//! ## Architecture
//!
//! - **Bounded buffers**: mutex-guarded rings with counting semaphores for
//!   blocking insert/remove (see [`pipeline::BoundedBuffer`])
//! - **Stages**: one named OS thread per producer, dispatcher, co-editor and
//!   screen manager (see [`pipeline::nodes`])
//! - **Configuration**: text descriptor or TOML (see [`config`])
//!
//! ## Example
//!
//! ```ignore
//! use newsdesk::{config::PipelineConfig, pipeline::{PipelineBuilder, StdoutSink}};
//!
//! fn main() -> newsdesk::Result<()> {
//!     let config = PipelineConfig::load("config.txt")?;
//!     let report = PipelineBuilder::new(config).build()?.run(StdoutSink)?;
//!     assert!(report.is_conserved());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use config::{PipelineConfig, PipelineSettings, ProducerSpec};
pub use error::{NewsdeskError, Result, ResultExt};
pub use pipeline::{Pipeline, PipelineBuilder, RunReport};
pub use types::{Category, CategoryCounts, Message, SENTINEL_TEXT};

//! Multi-stage bounded-buffer pipeline.
//!
//! Articles flow from producer threads through a single dispatcher into three
//! category co-editors and finally to one screen manager. Every hop is a
//! [`BoundedBuffer`]; a full buffer blocks its inserter, which throttles the
//! stage upstream of it.
//!
//! # Architecture
//!
//! ```text
//! [Producer 1] ─► buf ─┐                 ┌─► SPORTS  ─► [Co-Editor] ─┐
//! [Producer 2] ─► buf ─┼─► [Dispatcher] ─┼─► NEWS    ─► [Co-Editor] ─┼─► screen ─► [Screen Manager]
//! [Producer N] ─► buf ─┘                 └─► WEATHER ─► [Co-Editor] ─┘
//! ```
//!
//! # Termination
//!
//! Each producer ends its stream with one sentinel. The dispatcher forwards
//! one sentinel per category once every producer is finished; each co-editor
//! forwards its sentinel to the screen buffer; the screen manager prints the
//! sentinel after it has seen all three.
//!
//! # Design
//!
//! - **One OS thread per stage**: `producers + 5` threads, see [`stage`].
//! - **No shared globals**: buffers are `Arc` handles moved into each stage.
//! - **Polling dispatcher**: non-blocking scan over producers, yielding when
//!   a whole pass finds nothing.

pub mod buffer;
pub mod error;
pub mod executor;
pub mod nodes;
pub mod semaphore;
pub mod stage;

pub use buffer::BoundedBuffer;
pub use error::{PipelineError, PipelineResult};
pub use executor::{Pipeline, PipelineBuilder, RunReport, RunningPipeline};
pub use nodes::{
    CategoryBuffers, ChannelSink, CoEditorNode, DispatchReport, DispatcherNode, EditReport,
    ProducerNode, ProducerReport, ScreenManagerNode, ScreenReport, ScreenSink, StdoutSink,
};
pub use semaphore::Semaphore;
pub use stage::{Stage, StageHandle};

//! Built-in pipeline stages.
//!
//! - [`ProducerNode`] generates articles into a private buffer.
//! - [`DispatcherNode`] routes producer buffers into category buffers.
//! - [`CoEditorNode`] moves a category buffer to the screen buffer, with delay.
//! - [`ScreenManagerNode`] drains the screen buffer into a [`ScreenSink`].

mod co_editor;
mod dispatcher;
mod producer;
mod screen_manager;

pub use co_editor::{CoEditorNode, EditReport};
pub use dispatcher::{CategoryBuffers, DispatchReport, DispatcherNode};
pub use producer::{ProducerNode, ProducerReport};
pub use screen_manager::{ChannelSink, ScreenManagerNode, ScreenReport, ScreenSink, StdoutSink};

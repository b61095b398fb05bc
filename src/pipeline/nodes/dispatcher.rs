//! Dispatcher stage: fans N producer buffers into the three category buffers.
//!
//! The dispatcher never blocks on a single producer. Each pass scans every
//! unfinished producer in index order with a non-blocking `try_remove`, so a
//! slow producer cannot starve the others. Routing into a category buffer is
//! a blocking insert, which carries category backpressure back to producers.
//!
//! Per-producer state only moves forward:
//!
//! ```text
//! Active ──(sentinel removed)──► Draining ──(buffer observed empty)──► Done
//! ```
//!
//! Once every producer is `Done`, one sentinel goes into each category buffer.

use crate::pipeline::buffer::BoundedBuffer;
use crate::pipeline::error::PipelineResult;
use crate::pipeline::stage::Stage;
use crate::types::{Category, CategoryCounts, Message};
use std::sync::Arc;
use std::thread;

/// The three category buffers, indexed by [`Category`].
#[derive(Debug, Clone)]
pub struct CategoryBuffers([Arc<BoundedBuffer>; Category::COUNT]);

impl CategoryBuffers {
    pub fn new(
        sports: Arc<BoundedBuffer>,
        news: Arc<BoundedBuffer>,
        weather: Arc<BoundedBuffer>,
    ) -> Self {
        Self([sports, news, weather])
    }

    /// Build one buffer per category, each holding `capacity` messages.
    pub fn with_capacity(capacity: usize) -> PipelineResult<Self> {
        let make = |c: Category| {
            BoundedBuffer::new(format!("category-{}", c.name()), capacity).map(Arc::new)
        };
        Ok(Self::new(
            make(Category::Sports)?,
            make(Category::News)?,
            make(Category::Weather)?,
        ))
    }

    pub fn get(&self, category: Category) -> &Arc<BoundedBuffer> {
        &self.0[category.index()]
    }
}

/// Liveness of one producer as seen by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceState {
    Active,
    /// Sentinel removed; waiting to observe the buffer empty.
    Draining,
    Done,
}

#[derive(Debug)]
struct Source {
    buffer: Arc<BoundedBuffer>,
    state: SourceState,
}

/// What the dispatcher routed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub routed: CategoryCounts,
    /// Payloads with no recognisable category tag.
    pub dropped: u64,
    /// Sentinels removed from producer buffers.
    pub sentinels_received: usize,
    /// Sentinels inserted into category buffers (always one per category).
    pub sentinels_sent: usize,
}

pub struct DispatcherNode {
    sources: Vec<Source>,
    outputs: CategoryBuffers,
}

impl DispatcherNode {
    pub fn new(sources: Vec<Arc<BoundedBuffer>>, outputs: CategoryBuffers) -> Self {
        let sources = sources
            .into_iter()
            .map(|buffer| Source {
                buffer,
                state: SourceState::Active,
            })
            .collect();
        Self { sources, outputs }
    }

    /// Poll one source once. Returns whether a message was taken.
    fn poll(&self, source: &mut Source, report: &mut DispatchReport) -> bool {
        let taken = match source.buffer.try_remove() {
            Some(Message::Done) => {
                report.sentinels_received += 1;
                if source.state == SourceState::Draining {
                    tracing::warn!(source = source.buffer.name(), "duplicate sentinel ignored");
                } else {
                    tracing::debug!(source = source.buffer.name(), "sentinel received");
                }
                source.state = SourceState::Draining;
                true
            }
            Some(Message::Text(text)) => {
                self.route(text, report);
                true
            }
            None => false,
        };

        if source.state == SourceState::Draining && source.buffer.is_empty() {
            source.state = SourceState::Done;
            tracing::debug!(source = source.buffer.name(), "producer done");
        }
        taken
    }

    fn route(&self, text: String, report: &mut DispatchReport) {
        match Category::classify(&text) {
            Some(category) => {
                tracing::trace!(%category, %text, "routed");
                self.outputs.get(category).insert(Message::Text(text));
                report.routed[category] += 1;
            }
            None => {
                tracing::warn!(%text, "dropping message with no category");
                report.dropped += 1;
            }
        }
    }
}

impl Stage for DispatcherNode {
    type Report = DispatchReport;

    fn name(&self) -> String {
        "dispatcher".to_string()
    }

    fn run(mut self) -> DispatchReport {
        let mut report = DispatchReport::default();
        let mut sources = std::mem::take(&mut self.sources);

        while sources.iter().any(|s| s.state != SourceState::Done) {
            let mut progressed = false;
            for source in sources.iter_mut().filter(|s| s.state != SourceState::Done) {
                progressed |= self.poll(source, &mut report);
            }
            if !progressed {
                thread::yield_now();
            }
        }

        for category in Category::ALL {
            self.outputs.get(category).insert(Message::Done);
            report.sentinels_sent += 1;
        }

        tracing::info!(
            routed = report.routed.total(),
            dropped = report.dropped,
            producers = sources.len(),
            "dispatcher finished"
        );
        report
    }
}

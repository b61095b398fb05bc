//! Pipeline assembly and lifecycle.
//!
//! [`PipelineBuilder`] turns a [`PipelineConfig`] into a [`Pipeline`] that
//! owns every buffer. Starting it spawns `producers + 5` stage threads,
//! downstream first; waiting joins all of them and folds their reports into a
//! [`RunReport`]. Buffers are created before any thread starts and dropped
//! only after the last stage thread has been joined.

use crate::config::PipelineConfig;
use crate::pipeline::buffer::BoundedBuffer;
use crate::pipeline::error::PipelineResult;
use crate::pipeline::nodes::{
    CategoryBuffers, CoEditorNode, DispatchReport, DispatcherNode, EditReport, ProducerNode,
    ProducerReport, ScreenManagerNode, ScreenReport, ScreenSink,
};
use crate::pipeline::stage::{self, StageHandle};
use crate::types::{Category, CategoryCounts, Message};
use std::sync::Arc;
use std::time::Duration;

/// Builds a [`Pipeline`] from a config, with optional overrides.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Fix the base seed for producer category choice.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.settings.seed = Some(seed);
        self
    }

    /// Override the co-editors' per-article delay.
    pub fn edit_delay(mut self, delay: Duration) -> Self {
        self.config.settings.edit_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Allocate every buffer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::pipeline::PipelineError::ZeroCapacity`] if any
    /// configured capacity is 0.
    pub fn build(self) -> PipelineResult<Pipeline> {
        let config = self.config;
        let seed = config.settings.seed.unwrap_or_else(rand::random);

        let producer_buffers = config
            .producers
            .iter()
            .map(|p| BoundedBuffer::new(format!("producer-{}", p.id), p.queue_size).map(Arc::new))
            .collect::<PipelineResult<Vec<_>>>()?;
        let categories = CategoryBuffers::with_capacity(config.co_editor_queue_size)?;
        let screen = Arc::new(BoundedBuffer::new("screen", config.co_editor_queue_size)?);

        Ok(Pipeline {
            config,
            seed,
            producer_buffers,
            categories,
            screen,
        })
    }
}

/// A fully allocated, not yet running pipeline.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    seed: u64,
    producer_buffers: Vec<Arc<BoundedBuffer>>,
    categories: CategoryBuffers,
    screen: Arc<BoundedBuffer>,
}

impl Pipeline {
    /// Base seed; producer `i` uses `seed + i`.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run to completion, writing screen output to `sink`.
    pub fn run<S: ScreenSink>(self, sink: S) -> PipelineResult<RunReport> {
        self.start(sink)?.wait()
    }

    /// Spawn every stage thread and return without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`crate::pipeline::PipelineError::Spawn`] if a thread cannot be
    /// created. Before returning, a sentinel is inserted on behalf of every
    /// stage that never started, and the stages that did start are joined,
    /// so no thread outlives the failed call.
    pub fn start<S: ScreenSink>(self, sink: S) -> PipelineResult<RunningPipeline> {
        tracing::info!(
            producers = self.config.producers.len(),
            seed = self.seed,
            edit_delay_ms = self.config.settings.edit_delay_ms,
            "Starting pipeline"
        );

        let mut started = StartedStages::default();
        if let Err(e) = self.spawn_stages(sink, &mut started) {
            tracing::error!("{}; stopping stages already started", e);
            started.unwind(&self);
            return Err(e);
        }

        let StartedStages {
            screen: Some(screen),
            co_editors,
            dispatcher: Some(dispatcher),
            producers,
        } = started
        else {
            unreachable!("every stage spawned without error");
        };

        Ok(RunningPipeline {
            pipeline: self,
            producers,
            dispatcher,
            co_editors,
            screen,
        })
    }

    /// Spawn downstream first, recording each handle as it starts.
    fn spawn_stages<S: ScreenSink>(
        &self,
        sink: S,
        started: &mut StartedStages,
    ) -> PipelineResult<()> {
        let edit_delay = self.config.settings.edit_delay();

        started.screen = Some(stage::spawn(ScreenManagerNode::new(
            Arc::clone(&self.screen),
            sink,
        ))?);

        for category in Category::ALL {
            started.co_editors.push(stage::spawn(CoEditorNode::new(
                category,
                Arc::clone(self.categories.get(category)),
                Arc::clone(&self.screen),
                edit_delay,
            ))?);
        }

        started.dispatcher = Some(stage::spawn(DispatcherNode::new(
            self.producer_buffers.clone(),
            self.categories.clone(),
        ))?);

        for (i, (spec, buffer)) in self
            .config
            .producers
            .iter()
            .zip(&self.producer_buffers)
            .enumerate()
        {
            let seed = self.seed.wrapping_add(i as u64);
            started.producers.push(stage::spawn(ProducerNode::new(
                spec.clone(),
                Arc::clone(buffer),
                seed,
            ))?);
        }
        Ok(())
    }
}

/// Stage handles collected while a pipeline starts.
#[derive(Debug, Default)]
struct StartedStages {
    screen: Option<StageHandle<ScreenReport>>,
    co_editors: Vec<StageHandle<EditReport>>,
    dispatcher: Option<StageHandle<DispatchReport>>,
    producers: Vec<StageHandle<ProducerReport>>,
}

impl StartedStages {
    /// Finish a partial start: send the sentinels the missing stages would
    /// have sent, then join everything that is running.
    ///
    /// Stages start downstream first, so every buffer written here is empty
    /// and has a live consumer; no insert blocks for long.
    fn unwind(self, pipeline: &Pipeline) {
        if self.screen.is_none() {
            return;
        }

        if self.dispatcher.is_none() {
            for category in Category::ALL {
                pipeline.categories.get(category).insert(Message::Done);
            }
            for _ in self.co_editors.len()..Category::COUNT {
                pipeline.screen.insert(Message::Done);
            }
        } else {
            for buffer in &pipeline.producer_buffers[self.producers.len()..] {
                buffer.insert(Message::Done);
            }
        }

        for handle in self.producers {
            let _ = handle.join();
        }
        if let Some(handle) = self.dispatcher {
            let _ = handle.join();
        }
        for handle in self.co_editors {
            let _ = handle.join();
        }
        if let Some(handle) = self.screen {
            let _ = handle.join();
        }
    }
}

/// Handles to every stage thread of a started pipeline.
#[derive(Debug)]
pub struct RunningPipeline {
    /// Keeps the buffers alive until every stage is joined.
    pipeline: Pipeline,
    producers: Vec<StageHandle<ProducerReport>>,
    dispatcher: StageHandle<DispatchReport>,
    co_editors: Vec<StageHandle<EditReport>>,
    screen: StageHandle<ScreenReport>,
}

impl RunningPipeline {
    /// Join every stage and collect the run report.
    ///
    /// # Errors
    ///
    /// Returns [`crate::pipeline::PipelineError::StagePanicked`] for the first
    /// stage (in join order) that panicked.
    pub fn wait(self) -> PipelineResult<RunReport> {
        let screen = self.screen.join()?;

        let mut edited = CategoryCounts::new();
        for handle in self.co_editors {
            let report = handle.join()?;
            edited[report.category] += report.forwarded;
        }

        let dispatch = self.dispatcher.join()?;

        let produced = self
            .producers
            .into_iter()
            .map(StageHandle::join)
            .collect::<PipelineResult<Vec<_>>>()?;

        let report = RunReport {
            seed: self.pipeline.seed,
            produced,
            dispatch,
            edited,
            screen,
        };
        tracing::info!(
            produced = report.produced_total(),
            displayed = report.displayed(),
            dropped = report.dispatch.dropped,
            "Pipeline finished"
        );
        Ok(report)
    }
}

/// Per-stage summaries of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Base seed the producers used
    pub seed: u64,
    /// One entry per producer, in config order
    pub produced: Vec<ProducerReport>,
    pub dispatch: DispatchReport,
    /// Articles each co-editor forwarded
    pub edited: CategoryCounts,
    pub screen: ScreenReport,
}

impl RunReport {
    /// Articles emitted by all producers
    pub fn produced_total(&self) -> u64 {
        self.produced.iter().map(|p| p.emitted.total()).sum()
    }

    /// Articles handed to the screen sink
    pub fn displayed(&self) -> u64 {
        self.screen.displayed
    }

    /// Every article is accounted for at every stage boundary.
    pub fn is_conserved(&self) -> bool {
        self.produced_total() == self.dispatch.routed.total() + self.dispatch.dropped
            && self.dispatch.routed == self.edited
            && self.edited.total() == self.screen.displayed
    }
}

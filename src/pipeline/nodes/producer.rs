//! Producer stage: emits a fixed number of random-category articles into its
//! private buffer, then exactly one sentinel.
//!
//! A full private buffer blocks the producer; that is the backpressure that
//! keeps a fast producer from running far ahead of the dispatcher.

use crate::config::ProducerSpec;
use crate::pipeline::buffer::BoundedBuffer;
use crate::pipeline::stage::Stage;
use crate::types::{Category, CategoryCounts, Message};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// What a producer emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerReport {
    pub id: u32,
    /// Articles emitted per category (the sentinel is not counted).
    pub emitted: CategoryCounts,
}

/// One producer thread's state.
pub struct ProducerNode {
    spec: ProducerSpec,
    output: Arc<BoundedBuffer>,
    rng: ChaCha8Rng,
}

impl ProducerNode {
    /// Create a producer writing into `output`, drawing categories from a
    /// generator seeded with `seed`.
    pub fn new(spec: ProducerSpec, output: Arc<BoundedBuffer>, seed: u64) -> Self {
        Self {
            spec,
            output,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Stage for ProducerNode {
    type Report = ProducerReport;

    fn name(&self) -> String {
        format!("producer-{}", self.spec.id)
    }

    fn run(mut self) -> ProducerReport {
        let id = self.spec.id;
        let mut emitted = CategoryCounts::new();

        for _ in 0..self.spec.messages {
            let category = Category::ALL[self.rng.gen_range(0..Category::COUNT)];
            let seq = emitted[category];
            emitted[category] += 1;

            let msg = Message::article(id, category, seq);
            tracing::trace!(producer = id, %msg, "produced");
            self.output.insert(msg);
        }

        self.output.insert(Message::Done);
        tracing::debug!(producer = id, total = emitted.total(), "producer finished");

        ProducerReport { id, emitted }
    }
}

//! Test data builders for creating test objects

use newsdesk::{PipelineConfig, PipelineSettings, ProducerSpec};

/// Builder for creating test pipeline configs
pub struct ConfigBuilder {
    producers: Vec<ProducerSpec>,
    co_editor_queue_size: usize,
    edit_delay_ms: u64,
    seed: Option<u64>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            producers: Vec::new(),
            co_editor_queue_size: 1,
            edit_delay_ms: 0,
            seed: Some(42),
        }
    }

    pub fn producer(mut self, id: u32, messages: usize, queue_size: usize) -> Self {
        self.producers.push(ProducerSpec {
            id,
            messages,
            queue_size,
        });
        self
    }

    /// Add `count` producers with ids 1..=count
    pub fn producers(mut self, count: u32, messages: usize, queue_size: usize) -> Self {
        for id in 1..=count {
            self = self.producer(id, messages, queue_size);
        }
        self
    }

    pub fn co_editor_queue_size(mut self, size: usize) -> Self {
        self.co_editor_queue_size = size;
        self
    }

    pub fn edit_delay_ms(mut self, ms: u64) -> Self {
        self.edit_delay_ms = ms;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> PipelineConfig {
        PipelineConfig::new(self.producers, self.co_editor_queue_size).with_settings(
            PipelineSettings {
                edit_delay_ms: self.edit_delay_ms,
                seed: self.seed,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .producers(3, 5, 2)
            .co_editor_queue_size(4)
            .build();

        assert_eq!(config.producers.len(), 3);
        assert_eq!(config.producers[2].id, 3);
        assert_eq!(config.co_editor_queue_size, 4);
        assert_eq!(config.settings.edit_delay_ms, 0);
    }
}

//! Co-editor stage: one per category.
//!
//! Takes each article from its category buffer, spends a fixed editing delay
//! on it and forwards it unchanged to the shared screen buffer. The category
//! sentinel is forwarded once and ends the stage.

use crate::pipeline::buffer::BoundedBuffer;
use crate::pipeline::stage::Stage;
use crate::types::{Category, Message};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditReport {
    pub category: Category,
    /// Articles forwarded to the screen buffer.
    pub forwarded: u64,
}

pub struct CoEditorNode {
    category: Category,
    input: Arc<BoundedBuffer>,
    screen: Arc<BoundedBuffer>,
    edit_delay: Duration,
}

impl CoEditorNode {
    pub fn new(
        category: Category,
        input: Arc<BoundedBuffer>,
        screen: Arc<BoundedBuffer>,
        edit_delay: Duration,
    ) -> Self {
        Self {
            category,
            input,
            screen,
            edit_delay,
        }
    }
}

impl Stage for CoEditorNode {
    type Report = EditReport;

    fn name(&self) -> String {
        format!("co-editor-{}", self.category.name())
    }

    fn run(self) -> EditReport {
        let mut forwarded = 0;

        loop {
            let msg = self.input.remove();
            if msg.is_sentinel() {
                self.screen.insert(Message::Done);
                break;
            }

            if !self.edit_delay.is_zero() {
                thread::sleep(self.edit_delay);
            }
            self.screen.insert(msg);
            forwarded += 1;
        }

        tracing::debug!(category = %self.category, forwarded, "co-editor finished");
        EditReport {
            category: self.category,
            forwarded,
        }
    }
}

//! Screen manager stage and the sinks it writes to.
//!
//! The screen manager is the only consumer of the screen buffer. It prints
//! every article verbatim and counts sentinels; after the sentinel from the
//! last co-editor it prints the sentinel text once and exits.

use crate::pipeline::buffer::BoundedBuffer;
use crate::pipeline::stage::Stage;
use crate::types::{Category, Message, SENTINEL_TEXT};
use crossbeam_channel::Sender;
use std::io::{self, Write};
use std::sync::Arc;

/// Where screen lines end up.
pub trait ScreenSink: Send + 'static {
    /// Show one line of output.
    fn show(&mut self, line: &str) -> io::Result<()>;
}

/// Writes each line to standard output, flushing per line.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ScreenSink for StdoutSink {
    fn show(&mut self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()
    }
}

/// Sends each line over a channel, for embedding the pipeline elsewhere.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<String>,
}

impl ChannelSink {
    pub fn new(tx: Sender<String>) -> Self {
        Self { tx }
    }
}

impl ScreenSink for ChannelSink {
    fn show(&mut self, line: &str) -> io::Result<()> {
        self.tx
            .send(line.to_owned())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "display receiver dropped"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenReport {
    /// Articles handed to the display (the final sentinel line is not counted).
    pub displayed: u64,
    pub sentinels_received: usize,
    /// Lines the display failed to accept.
    pub write_errors: u64,
}

pub struct ScreenManagerNode<S: ScreenSink> {
    input: Arc<BoundedBuffer>,
    sink: S,
}

impl<S: ScreenSink> ScreenManagerNode<S> {
    pub fn new(input: Arc<BoundedBuffer>, sink: S) -> Self {
        Self { input, sink }
    }

    /// A failed write is logged once and then only counted. The manager
    /// keeps draining so the co-editors never stall on a full screen buffer.
    fn show(&mut self, line: &str, report: &mut ScreenReport) {
        if let Err(e) = self.sink.show(line) {
            if report.write_errors == 0 {
                tracing::error!("display write failed: {}", e);
            }
            report.write_errors += 1;
        }
    }
}

impl<S: ScreenSink> Stage for ScreenManagerNode<S> {
    type Report = ScreenReport;

    fn name(&self) -> String {
        "screen-manager".to_string()
    }

    fn run(mut self) -> ScreenReport {
        let mut report = ScreenReport::default();

        while report.sentinels_received < Category::COUNT {
            match self.input.remove() {
                Message::Done => report.sentinels_received += 1,
                Message::Text(text) => {
                    self.show(&text, &mut report);
                    report.displayed += 1;
                }
            }
        }
        self.show(SENTINEL_TEXT, &mut report);

        tracing::info!(displayed = report.displayed, "screen manager finished");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stage;
    use crossbeam_channel::unbounded;

    struct Failing;

    impl ScreenSink for Failing {
        fn show(&mut self, _line: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_prints_sentinel_once_after_three() {
        let input = Arc::new(BoundedBuffer::new("screen", 8).unwrap());
        input.insert(Message::text("producer 1 NEWS 0"));
        input.insert(Message::Done);
        input.insert(Message::text("producer 1 SPORTS 0"));
        input.insert(Message::Done);
        input.insert(Message::text("producer 2 WEATHER 0"));
        input.insert(Message::Done);

        let (tx, rx) = unbounded();
        let report = ScreenManagerNode::new(input, ChannelSink::new(tx)).run();

        let lines: Vec<String> = rx.try_iter().collect();
        assert_eq!(
            lines,
            vec![
                "producer 1 NEWS 0",
                "producer 1 SPORTS 0",
                "producer 2 WEATHER 0",
                "DONE"
            ]
        );
        assert_eq!(report.displayed, 3);
        assert_eq!(report.sentinels_received, 3);
    }

    #[test]
    fn test_waits_for_third_sentinel() {
        let input = Arc::new(BoundedBuffer::new("screen", 4).unwrap());
        input.insert(Message::Done);
        input.insert(Message::Done);

        let (tx, rx) = unbounded();
        let node = ScreenManagerNode::new(Arc::clone(&input), ChannelSink::new(tx));
        let handle = stage::spawn(node).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(30));
        assert!(!handle.is_finished());
        assert!(rx.is_empty(), "sentinel must not print before the third arrives");

        input.insert(Message::Done);
        handle.join().unwrap();
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["DONE".to_string()]);
    }

    #[test]
    fn test_keeps_draining_when_display_fails() {
        let input = Arc::new(BoundedBuffer::new("screen", 8).unwrap());
        input.insert(Message::text("producer 1 NEWS 0"));
        for _ in 0..3 {
            input.insert(Message::Done);
        }

        let report = ScreenManagerNode::new(Arc::clone(&input), Failing).run();
        assert_eq!(report.displayed, 1);
        assert_eq!(report.write_errors, 2);
        assert!(input.is_empty());
    }
}

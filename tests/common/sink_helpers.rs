//! Screen sink helpers

use crossbeam_channel::{unbounded, Receiver};
use newsdesk::pipeline::{ChannelSink, Pipeline, RunReport};
use std::thread;
use std::time::Duration;

/// A channel sink plus the receiving end for inspecting output
pub fn capture_sink() -> (ChannelSink, Receiver<String>) {
    let (tx, rx) = unbounded();
    (ChannelSink::new(tx), rx)
}

/// Run `pipeline` on a helper thread, failing the test if it does not
/// finish within `timeout`. Returns the report and every screen line.
pub fn run_with_timeout(pipeline: Pipeline, timeout: Duration) -> (RunReport, Vec<String>) {
    let (sink, lines) = capture_sink();
    let (done_tx, done_rx) = crossbeam_channel::bounded(1);

    thread::spawn(move || {
        let report = pipeline.run(sink);
        let _ = done_tx.send(report);
    });

    let report = done_rx
        .recv_timeout(timeout)
        .expect("pipeline did not terminate in time (deadlock?)")
        .expect("pipeline failed");
    (report, lines.try_iter().collect())
}

//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod sink_helpers;

use std::time::Duration;

/// Upper bound for a full pipeline run in tests
pub fn run_timeout() -> Duration {
    Duration::from_secs(60)
}

/// Split an article line into (producer id, category, sequence number)
pub fn parse_article(line: &str) -> (u32, String, u64) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    assert_eq!(parts.len(), 4, "malformed article line: {line:?}");
    assert_eq!(parts[0], "producer", "malformed article line: {line:?}");
    (
        parts[1].parse().expect("producer id"),
        parts[2].to_string(),
        parts[3].parse().expect("sequence number"),
    )
}

//! Parser for the plain-text pipeline descriptor.
//!
//! ```text
//! PRODUCER 1
//! 30
//! queue size = 5
//!
//! PRODUCER 2
//! 25
//! queue size = 3
//!
//! Co-Editor queue size = 17
//! ```
//!
//! Blank lines and carriage returns are ignored. Each `PRODUCER <id>` line is
//! followed by the message count and then the `queue size = <n>` line, each
//! on the next non-empty line.

use crate::config::{PipelineConfig, PipelineSettings, ProducerSpec};
use crate::error::{NewsdeskError, Result};

const PRODUCER_TAG: &str = "PRODUCER";
const CO_EDITOR_TAG: &str = "Co-Editor queue size";

/// Non-empty lines with their 1-based line numbers.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

fn parse_number<T: std::str::FromStr>(raw: &str, line_no: usize, what: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| NewsdeskError::parse(line_no, format!("invalid {what}: '{}'", raw.trim())))
}

/// Value to the right of the `=` in `key = value`.
fn assigned_value<T: std::str::FromStr>(line: &str, line_no: usize, what: &str) -> Result<T> {
    let (_, value) = line
        .split_once('=')
        .ok_or_else(|| NewsdeskError::parse(line_no, format!("expected '{what} = <n>'")))?;
    parse_number(value, line_no, what)
}

fn parse_producer_id(line: &str, line_no: usize) -> Result<u32> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(PRODUCER_TAG), Some(id), None) => parse_number(id, line_no, "producer id"),
        _ => Err(NewsdeskError::parse(line_no, "expected 'PRODUCER <id>'")),
    }
}

/// Parse a text descriptor into a [`PipelineConfig`] with default settings.
///
/// The result is not validated; see [`PipelineConfig::validate`].
pub fn parse_descriptor(text: &str) -> Result<PipelineConfig> {
    let mut lines = content_lines(text);
    let mut producers = Vec::new();
    let mut co_editor_queue_size = None;

    while let Some((line_no, line)) = lines.next() {
        if line.starts_with(PRODUCER_TAG) {
            let id = parse_producer_id(line, line_no)?;

            let (count_no, count) = lines.next().ok_or_else(|| {
                NewsdeskError::parse(line_no, format!("missing message count for producer {id}"))
            })?;
            let messages = parse_number(count, count_no, "message count")?;

            let (size_no, size_line) = lines.next().ok_or_else(|| {
                NewsdeskError::parse(count_no, format!("missing queue size for producer {id}"))
            })?;
            if !size_line.contains("queue size") {
                return Err(NewsdeskError::parse(size_no, "expected 'queue size = <n>'"));
            }
            let queue_size = assigned_value(size_line, size_no, "queue size")?;

            producers.push(ProducerSpec {
                id,
                messages,
                queue_size,
            });
        } else if line.starts_with(CO_EDITOR_TAG) {
            co_editor_queue_size = Some(assigned_value(line, line_no, CO_EDITOR_TAG)?);
        } else {
            tracing::warn!(line = line_no, text = line, "ignoring unrecognised config line");
        }
    }

    let co_editor_queue_size = co_editor_queue_size.ok_or_else(|| {
        NewsdeskError::Config(format!("missing '{CO_EDITOR_TAG} = <n>' line"))
    })?;

    Ok(PipelineConfig {
        producers,
        co_editor_queue_size,
        settings: PipelineSettings::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "PRODUCER 1\n30\nqueue size = 5\n\nPRODUCER 2\n25\nqueue size = 3\n\nCo-Editor queue size = 17\n";

    #[test]
    fn test_parse_sample() {
        let config = parse_descriptor(SAMPLE).unwrap();
        assert_eq!(
            config.producers,
            vec![
                ProducerSpec {
                    id: 1,
                    messages: 30,
                    queue_size: 5
                },
                ProducerSpec {
                    id: 2,
                    messages: 25,
                    queue_size: 3
                },
            ]
        );
        assert_eq!(config.co_editor_queue_size, 17);
    }

    #[test]
    fn test_parse_crlf_and_extra_blank_lines() {
        let text = "\r\nPRODUCER 4\r\n\r\n10\r\n\r\nqueue size = 2\r\n\r\n\r\nCo-Editor queue size = 1\r\n";
        let config = parse_descriptor(text).unwrap();
        assert_eq!(
            config.producers,
            vec![ProducerSpec {
                id: 4,
                messages: 10,
                queue_size: 2
            }]
        );
        assert_eq!(config.co_editor_queue_size, 1);
    }

    #[test]
    fn test_parse_no_producers() {
        let config = parse_descriptor("Co-Editor queue size = 3").unwrap();
        assert!(config.producers.is_empty());
        assert_eq!(config.co_editor_queue_size, 3);
    }

    #[test]
    fn test_missing_co_editor_line() {
        let err = parse_descriptor("PRODUCER 1\n5\nqueue size = 1\n").unwrap_err();
        assert!(matches!(err, NewsdeskError::Config(_)));
    }

    #[test]
    fn test_bad_count_reports_line() {
        let err = parse_descriptor("PRODUCER 1\n\nfive\nqueue size = 1\n").unwrap_err();
        match err {
            NewsdeskError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("message count"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncated_producer_block() {
        let err = parse_descriptor("PRODUCER 1\n5\n").unwrap_err();
        assert!(matches!(err, NewsdeskError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_queue_size_line_required() {
        let err = parse_descriptor("PRODUCER 1\n5\nPRODUCER 2\n").unwrap_err();
        assert!(matches!(err, NewsdeskError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_bad_producer_header() {
        let err = parse_descriptor("PRODUCER one\n5\nqueue size = 1\n").unwrap_err();
        assert!(matches!(err, NewsdeskError::Parse { line: 1, .. }));
    }

    // Property-based tests using proptest
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_rendered_descriptor_parses_back(
            specs in prop::collection::vec((any::<u32>(), 0usize..10_000, 1usize..1_000), 0..12),
            co_editor in 1usize..1_000
        ) {
            let mut text = String::new();
            for (id, messages, queue_size) in &specs {
                text.push_str(&format!("PRODUCER {id}\n{messages}\nqueue size = {queue_size}\n\n"));
            }
            text.push_str(&format!("Co-Editor queue size = {co_editor}\n"));

            let config = parse_descriptor(&text).unwrap();
            prop_assert_eq!(config.producers.len(), specs.len());
            for (spec, (id, messages, queue_size)) in config.producers.iter().zip(&specs) {
                prop_assert_eq!(spec.id, *id);
                prop_assert_eq!(spec.messages, *messages);
                prop_assert_eq!(spec.queue_size, *queue_size);
            }
            prop_assert_eq!(config.co_editor_queue_size, co_editor);
        }

        #[test]
        fn test_arbitrary_text_never_panics(text in "[ -~\n\r]{0,200}") {
            let _ = parse_descriptor(&text);
        }
    }
}

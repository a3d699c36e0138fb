//! Producer task: drains one record source against the shared channel.

use crate::channel::Channel;
use crate::record;
use crate::source::RecordSource;
use crate::summary::{FailureRecord, ProducerResult};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs one producer to completion. All failure is data: a send error is
/// recorded and the loop moves on, and a source that cannot be opened
/// yields an empty result rather than an `Err`. Records are submitted in
/// source order; nothing is guaranteed across sibling producers.
pub async fn run_producer(source_path: PathBuf, channel: Arc<dyn Channel>) -> ProducerResult {
    let started = Instant::now();

    let mut source = match RecordSource::open(&source_path).await {
        Ok(source) => source,
        Err(err) => {
            warn!(source = %source_path.display(), %err, "source unavailable, producer idle");
            let mut result =
                ProducerResult::unopened(source_path.display().to_string(), err.to_string());
            result.elapsed = started.elapsed();
            return result;
        }
    };

    let mut result = ProducerResult::new(source.name().to_string());
    while let Some(rec) = source.next_record().await {
        let request = record::encode(&rec);
        let sent_at = Instant::now();
        match channel.send(request).await {
            Ok(_ack) => {
                result.record_success(sent_at.elapsed().as_nanos() as u64);
                debug!(source = %rec.source, line = rec.line, "record acked");
            }
            Err(err) => {
                warn!(source = %rec.source, line = rec.line, %err, "send failed");
                result.record_failure(FailureRecord {
                    source: rec.source.to_string(),
                    line: rec.line,
                    kind: err.kind(),
                    message: err.to_string(),
                });
            }
        }
    }

    result.elapsed = started.elapsed();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelOptions;
    use crate::channel::mock::MockChannel;
    use std::path::PathBuf;

    fn temp_file(contents: &str) -> PathBuf {
        let path =
            std::env::temp_dir().join(format!("feeder-producer-{}.txt", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).expect("write temp file");
        path
    }

    #[tokio::test]
    async fn records_are_delivered_in_source_order() {
        let path = temp_file("first\n\nsecond\nthird\n");
        let channel = MockChannel::always_ok();
        let result = run_producer(path.clone(), channel.clone()).await;

        assert_eq!(result.attempted, 3);
        assert_eq!(result.succeeded, 3);
        assert_eq!(result.failed, 0);
        assert_eq!(channel.delivered(), vec!["first", "second", "third"]);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn a_failed_send_does_not_stop_the_loop() {
        let path = temp_file("keep\ndrop this one\nkeep\n");
        let mut opts = ChannelOptions::default();
        opts.params.insert("fail_contains".into(), "drop".into());
        opts.params.insert("fail_kind".into(), "rejected".into());
        let channel = MockChannel::from_options(&opts);

        let result = run_producer(path.clone(), channel.clone()).await;
        assert_eq!(result.attempted, 3);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].line, 2);
        assert_eq!(result.failures[0].kind, "rejected");
        assert_eq!(channel.delivered(), vec!["keep", "keep"]);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn missing_source_yields_empty_result() {
        let path =
            std::env::temp_dir().join(format!("feeder-producer-{}.txt", uuid::Uuid::new_v4()));
        let channel = MockChannel::always_ok();
        let result = run_producer(path, channel.clone()).await;

        assert_eq!(result.attempted, 0);
        assert!(result.source_error.is_some());
        assert_eq!(channel.calls(), 0);
    }
}

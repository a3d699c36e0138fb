//! Record sources: lazy line readers, one per producer.

use crate::record::Record;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tracing::warn;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("source {path} unavailable: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Lazy, finite, non-restartable sequence of non-empty trimmed lines.
pub struct RecordSource {
    name: Arc<str>,
    lines: Lines<BufReader<File>>,
    line_no: u64,
}

impl RecordSource {
    pub async fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).await.map_err(|source| SourceError::Unavailable {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            name: Arc::from(path.display().to_string().as_str()),
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }

    pub fn name(&self) -> Arc<str> {
        self.name.clone()
    }

    /// Next record in source order. Blank and whitespace-only lines are
    /// skipped without being counted; line numbers stay physical.
    pub async fn next_record(&mut self) -> Option<Record> {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    self.line_no += 1;
                    let payload = line.trim();
                    if payload.is_empty() {
                        continue;
                    }
                    return Some(Record {
                        source: self.name.clone(),
                        line: self.line_no,
                        payload: payload.to_string(),
                    });
                }
                Ok(None) => return None,
                Err(err) => {
                    // Content is assumed line-well-formed; a mid-stream
                    // read error ends the sequence.
                    warn!(source = %self.name, %err, "read error, ending source");
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("feeder-source-{}.txt", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).expect("write temp file");
        path
    }

    #[tokio::test]
    async fn blank_lines_are_skipped_and_line_numbers_stay_physical() {
        let path = temp_file("userID:001,event:login\n\n   \nuserID:002,event:purchase\n");
        let mut source = RecordSource::open(&path).await.expect("open");

        let first = source.next_record().await.expect("first record");
        assert_eq!(first.line, 1);
        assert_eq!(first.payload, "userID:001,event:login");

        let second = source.next_record().await.expect("second record");
        assert_eq!(second.line, 4);
        assert_eq!(second.payload, "userID:002,event:purchase");

        assert!(source.next_record().await.is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn lines_are_trimmed() {
        let path = temp_file("  userID:003,event:signup  \n");
        let mut source = RecordSource::open(&path).await.expect("open");
        let record = source.next_record().await.expect("record");
        assert_eq!(record.payload, "userID:003,event:signup");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let path = std::env::temp_dir().join(format!("feeder-missing-{}.txt", uuid::Uuid::new_v4()));
        let err = RecordSource::open(&path).await.err().expect("must fail");
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }
}

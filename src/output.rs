use crate::summary::{DispatchSummary, ProducerResult};
use anyhow::Result;
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};

pub enum OutputWriter {
    Csv(BufWriter<File>),
    Stdout,
}

impl OutputWriter {
    pub async fn new_csv(path: String) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = std::path::Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.ok();
            }
        }
        let file = File::create(&path).await?;
        let mut writer = BufWriter::new(file);

        writer.write_all(ProducerResult::csv_header().as_bytes()).await?;
        writer.write_all(b"\n").await?;

        println!("Writing CSV summary to: {}", path);
        Ok(Self::Csv(writer))
    }

    pub fn new_stdout() -> Self {
        Self::Stdout
    }

    async fn write_row(&mut self, row: &str) -> Result<()> {
        match self {
            Self::Csv(writer) => {
                writer.write_all(row.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                // Flush per row so partial summaries survive an abort
                writer.flush().await?;
            }
            Self::Stdout => {
                println!("{}", row);
            }
        }
        Ok(())
    }

    /// One row per producer, then the aggregate row.
    pub async fn write_summary(&mut self, summary: &DispatchSummary) -> Result<()> {
        for producer in &summary.producers {
            self.write_row(&producer.to_csv_row()).await?;
        }
        self.write_row(&summary.to_csv_row()).await
    }
}

use std::time::Duration;

use serde::Serialize;

use crate::chunk::{chunk_path, read_chunk_file};
use crate::config::ResolvedConfig;
use crate::domain::{
    APP_NAME, METADATA_CONTENT_TYPE, METADATA_VERSION, Paper, PaperRecord, PdfIndex, Receipt,
    SearchField, Tag,
};
use crate::error::ScivaultError;
use crate::gateway::GatewayClient;
use crate::graphql::GraphqlClient;
use crate::uploader::UploadClient;

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    Loaded(Vec<Paper>),
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub chunks: Vec<ChunkSummary>,
    pub finished_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkSummary {
    pub chunk: u32,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub success_rate: u32,
}

#[derive(Clone)]
pub struct App<G: GraphqlClient, W: GatewayClient, U: UploadClient> {
    graphql: G,
    gateway: W,
    uploader: U,
}

impl<G: GraphqlClient, W: GatewayClient, U: UploadClient> App<G, W, U> {
    pub fn new(graphql: G, gateway: W, uploader: U) -> Self {
        Self {
            graphql,
            gateway,
            uploader,
        }
    }

    // Empty Loaded means the query matched nothing; any client failure
    // maps to Unavailable, never to an empty list.
    pub fn search(&self, field: SearchField, value: &str, sink: &dyn ProgressSink) -> SearchOutcome {
        match self.run_search(field, value, sink) {
            Ok(papers) => SearchOutcome::Loaded(papers),
            Err(err) => SearchOutcome::Unavailable {
                reason: err.to_string(),
            },
        }
    }

    fn run_search(
        &self,
        field: SearchField,
        value: &str,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<Paper>, ScivaultError> {
        sink.event(ProgressEvent {
            message: format!("phase=Query; searching metadata by {field}"),
            elapsed: None,
        });
        let edges = self.graphql.metadata_edges(field, value)?;

        let dois = edges
            .iter()
            .filter_map(|edge| edge.tag_value("doi"))
            .map(|doi| doi.to_string())
            .collect::<Vec<_>>();

        sink.event(ProgressEvent {
            message: format!(
                "phase=Query; resolving PDFs for {} of {} edges",
                dois.len(),
                edges.len()
            ),
            elapsed: None,
        });
        let pdf_edges = self.graphql.pdf_edges(&dois)?;
        let index = PdfIndex::from_edges(&pdf_edges);

        let mut papers = Vec::new();
        for (position, edge) in edges.iter().enumerate() {
            sink.event(ProgressEvent {
                message: format!(
                    "phase=Fetch; document {}/{} ({})",
                    position + 1,
                    edges.len(),
                    edge.id
                ),
                elapsed: None,
            });
            let mut paper = self.gateway.fetch_paper(&edge.id)?;
            paper.tx_id = Some(edge.id.clone());
            paper.pdf_id = edge
                .tag_value("doi")
                .and_then(|doi| index.get(doi))
                .map(|id| id.to_string());
            papers.push(paper);
        }
        Ok(papers)
    }

    pub fn upload(
        &self,
        config: &ResolvedConfig,
        sink: &dyn ProgressSink,
    ) -> Result<UploadResult, ScivaultError> {
        let mut chunks = Vec::new();
        for number in 1..=config.chunk_count {
            let path = chunk_path(&config.chunk_dir, number);
            sink.event(ProgressEvent {
                message: format!("phase=Read; processing {path}"),
                elapsed: None,
            });

            let records = read_chunk_file(&path, sink)?;
            sink.event(ProgressEvent {
                message: format!(
                    "phase=Read; {} validated records in chunk_{number}.json",
                    records.len()
                ),
                elapsed: None,
            });

            chunks.push(self.upload_chunk(number, &records, sink));
        }
        Ok(UploadResult {
            chunks,
            finished_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    fn upload_chunk(
        &self,
        number: u32,
        records: &[PaperRecord],
        sink: &dyn ProgressSink,
    ) -> ChunkSummary {
        let total = records.len();
        let mut succeeded = 0usize;
        let mut failed = 0usize;

        for (index, record) in records.iter().enumerate() {
            match self.upload_record(record) {
                Ok(receipt) => {
                    succeeded += 1;
                    sink.event(ProgressEvent {
                        message: format!("phase=Upload; uploaded {} ({})", record.doi, receipt.id),
                        elapsed: None,
                    });
                }
                Err(err) => {
                    failed += 1;
                    sink.event(ProgressEvent {
                        message: format!("phase=Upload; failed {}: {}", record.doi, err),
                        elapsed: None,
                    });
                }
            }

            let attempted = index + 1;
            if attempted % 10 == 0 || attempted == total {
                sink.event(ProgressEvent {
                    message: format!(
                        "phase=Upload; progress {succeeded} ok, {failed} failed, {}%",
                        percentage(attempted, total)
                    ),
                    elapsed: None,
                });
            }
        }

        let summary = ChunkSummary {
            chunk: number,
            attempted: total,
            succeeded,
            failed,
            success_rate: percentage(succeeded, total),
        };
        sink.event(ProgressEvent {
            message: format!(
                "phase=Upload; completed chunk_{number}.json: {} ok, {} failed, {}% success",
                summary.succeeded, summary.failed, summary.success_rate
            ),
            elapsed: None,
        });
        summary
    }

    pub fn upload_record(&self, record: &PaperRecord) -> Result<Receipt, ScivaultError> {
        let doi = record.doi.trim().to_string();
        let title = normalize_title(&record.title);
        let tags = vec![
            Tag::new("App-Name", APP_NAME),
            Tag::new("Content-Type", METADATA_CONTENT_TYPE),
            Tag::new("Version", METADATA_VERSION),
            Tag::new("doi", &doi),
            Tag::new("title", &title),
            Tag::new("aid", &record.aid),
        ];
        self.uploader.upload(&record.payload(), &tags)
    }
}

pub fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_whitespace_collapsed() {
        assert_eq!(
            normalize_title("  A   title\nacross\t lines  "),
            "A title across lines"
        );
        assert_eq!(normalize_title("plain"), "plain");
    }

    #[test]
    fn rounded_percentage() {
        assert_eq!(percentage(20, 23), 87);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(10, 10), 100);
    }
}

use tracing::{info, warn};

use crate::catalog::CatalogApi;
use crate::models::{ContentKind, MediaType, SearchKind};

pub const MAX_BATCH_QUERIES: usize = 100;

/// Queries from a batch file: one per line, trimmed. Blank lines and `#`
/// comments are skipped; anything past [`MAX_BATCH_QUERIES`] is dropped.
pub fn parse_batch_queries(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .take(MAX_BATCH_QUERIES)
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Fetched(ContentKind),
    NoMatch,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub query: String,
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn fetched(&self) -> Vec<ContentKind> {
        self.items
            .iter()
            .filter_map(|item| match &item.outcome {
                BatchOutcome::Fetched(content) => Some(content.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|item| item.outcome == BatchOutcome::NoMatch)
            .map(|item| item.query.as_str())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            BatchOutcome::Failed(reason) => Some((item.query.as_str(), reason.as_str())),
            _ => None,
        })
    }
}

/// Resolve each query to its first search hit and fetch the full record.
/// Runs one query at a time; a failing query is recorded and the batch moves
/// on.
pub async fn run_batch(
    api: &dyn CatalogApi,
    queries: &[String],
    kind: SearchKind,
    include_episodes: bool,
) -> BatchReport {
    let mut report = BatchReport::default();
    for query in queries {
        let outcome = fetch_one(api, query, kind, include_episodes).await;
        match &outcome {
            BatchOutcome::Fetched(content) => {
                info!(query = %query, id = content.id(), "Batch item fetched")
            }
            BatchOutcome::NoMatch => warn!(query = %query, "Batch item had no match"),
            BatchOutcome::Failed(reason) => {
                warn!(query = %query, "Batch item failed: {}", reason)
            }
        }
        report.items.push(BatchItem {
            query: query.clone(),
            outcome,
        });
    }
    report
}

async fn fetch_one(
    api: &dyn CatalogApi,
    query: &str,
    kind: SearchKind,
    include_episodes: bool,
) -> BatchOutcome {
    let hits = match api.search(query, kind).await {
        Ok(resp) => resp.results,
        Err(e) => return BatchOutcome::Failed(e.to_string()),
    };
    let Some(hit) = hits.into_iter().next() else {
        return BatchOutcome::NoMatch;
    };
    let fetched = match hit.media_type {
        MediaType::Movie => api.get_movie(hit.id).await.map(ContentKind::from),
        MediaType::Tv => api
            .get_tv_show(hit.id, include_episodes)
            .await
            .map(ContentKind::from),
    };
    match fetched {
        Ok(content) => BatchOutcome::Fetched(content),
        Err(e) => BatchOutcome::Failed(e.to_string()),
    }
}

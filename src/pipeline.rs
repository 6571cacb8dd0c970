//! End-to-end analysis pipeline: fetch -> parse -> chart

use crate::chart::{build_figure, Figure};
use crate::fetcher::{ReasoningFetcher, ReasoningResult};
use crate::parser::{parse_thinking, Stage};
use crate::provider::{LlmProvider, ProviderError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors from the analysis pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Query is empty")]
    EmptyQuery,

    #[error("Figure serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of analyzing one query
#[derive(Debug)]
pub struct CotAnalysis {
    /// Full extracted thinking text
    pub thinking: String,
    /// Final answer text
    pub answer: String,
    /// Ordered classified stages
    pub stages: Vec<Stage>,
    /// Two-panel figure for the stages
    pub figure: Figure,
}

/// Runs the full chain-of-thought analysis pipeline.
///
/// Holds no per-request state; safe to share behind an `Arc` across
/// concurrent web requests.
pub struct CotPipeline {
    fetcher: ReasoningFetcher,
}

impl CotPipeline {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            fetcher: ReasoningFetcher::new(provider),
        }
    }

    /// The provider behind the pipeline (for health checks and banners).
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        self.fetcher.provider()
    }

    /// Analyze a query: fetch the reasoning transcript, split it into
    /// classified stages, and build the figure.
    ///
    /// Blank queries are rejected before any model call. Everything else
    /// propagates errors to the caller; front ends decide how to report.
    pub async fn analyze(&self, query: &str) -> Result<CotAnalysis, PipelineError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        let ReasoningResult { thinking, answer } = self.fetcher.fetch(query).await?;

        let stages = parse_thinking(&thinking);
        info!(stages = stages.len(), "Parsed thinking stages");

        let figure = build_figure(&stages);

        Ok(CotAnalysis {
            thinking,
            answer,
            stages,
            figure,
        })
    }
}

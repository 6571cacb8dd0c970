//! Chain-of-Thought Visualizer
//!
//! This crate provides:
//! - An Ollama provider backend for fetching model reasoning transcripts
//! - A sentence-level parser and keyword classifier for "thinking stages"
//! - A Plotly-compatible two-panel figure builder (timeline bars + pie)
//! - A REST API and an interactive CLI driving the same pipeline

pub mod api;
pub mod chart;
pub mod classify;
pub mod fetcher;
pub mod parser;
pub mod pipeline;
pub mod provider;

pub use chart::Figure;
pub use classify::Category;
pub use fetcher::{ReasoningFetcher, ReasoningResult};
pub use parser::Stage;
pub use pipeline::{CotAnalysis, CotPipeline};
pub use provider::{LlmProvider, LlmRequest, LlmResponse};

/// Configuration for the visualizer
#[derive(Debug, Clone, serde::Deserialize)]
pub struct VizConfig {
    /// Model to ask for reasoning transcripts
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the Ollama server
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Timeout for a single generation request (seconds)
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Port for the web portal
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_model() -> String {
    "llama3:latest".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_port() -> u16 {
    8080
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            ollama_url: default_ollama_url(),
            request_timeout_secs: default_timeout_secs(),
            port: default_port(),
        }
    }
}

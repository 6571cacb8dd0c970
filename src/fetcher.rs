//! Fetching reasoning transcripts from the model backend
//!
//! One generation request per query, with a fixed instruction template that
//! asks the model to emit labeled THINKING/ANSWER sections. The response is
//! split on those delimiter tokens; a response missing either token is
//! treated as all-thinking with a placeholder answer.

use crate::provider::{LlmProvider, LlmRequest, ProviderError};
use std::sync::Arc;
use tracing::{debug, info};

const THINKING_TOKEN: &str = "THINKING:";
const ANSWER_TOKEN: &str = "ANSWER:";

/// Substituted when the model ignores the ANSWER: delimiter.
const FALLBACK_ANSWER: &str = "Generated response";

/// Extracted reasoning narration and final answer for one query.
#[derive(Debug, Clone)]
pub struct ReasoningResult {
    /// Full extracted thinking text
    pub thinking: String,
    /// Final answer text
    pub answer: String,
}

/// Fetches chain-of-thought transcripts through an LLM provider.
pub struct ReasoningFetcher {
    provider: Arc<dyn LlmProvider>,
}

impl ReasoningFetcher {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// The provider behind this fetcher (for health checks and logging).
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Ask the model to think out loud about a query.
    ///
    /// Blocks (awaits) for the full generation; the provider's request
    /// timeout is the only bound on how long that takes.
    pub async fn fetch(&self, query: &str) -> Result<ReasoningResult, ProviderError> {
        let prompt = build_prompt(query);

        info!(model = self.provider.model(), "Requesting reasoning transcript");
        let response = self.provider.generate(&LlmRequest::new(prompt)).await?;
        debug!(
            content_len = response.content.len(),
            duration_ms = response.duration_ms,
            "Got model response"
        );

        Ok(extract_sections(&response.content))
    }
}

fn build_prompt(query: &str) -> String {
    format!(
        r#"Think step by step about this query and explain your reasoning process:

Query: {query}

Please format your response as:
THINKING: [Your detailed step-by-step thinking process]
ANSWER: [Your final answer]

Be explicit about your reasoning stages - analysis, planning, research, synthesis, evaluation, and problem-solving."#
    )
}

/// Split a raw model response into thinking and answer sections.
///
/// If either delimiter is absent the whole response becomes the thinking
/// text and the answer falls back to a placeholder. Never an error.
fn extract_sections(response: &str) -> ReasoningResult {
    let thinking_idx = response.find(THINKING_TOKEN);
    let answer_idx = response.find(ANSWER_TOKEN);

    match (thinking_idx, answer_idx) {
        (Some(t), Some(a)) if t + THINKING_TOKEN.len() <= a => ReasoningResult {
            thinking: response[t + THINKING_TOKEN.len()..a].trim().to_string(),
            answer: response[a + ANSWER_TOKEN.len()..].trim().to_string(),
        },
        _ => ReasoningResult {
            thinking: response.to_string(),
            answer: FALLBACK_ANSWER.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_both_sections() {
        let response = "THINKING: I analyze the question. Then I plan.\nANSWER: Forty-two.";
        let result = extract_sections(response);
        assert_eq!(result.thinking, "I analyze the question. Then I plan.");
        assert_eq!(result.answer, "Forty-two.");
    }

    #[test]
    fn test_missing_answer_token_uses_placeholder() {
        let response = "THINKING: endless musing with no conclusion";
        let result = extract_sections(response);
        assert_eq!(result.thinking, response);
        assert_eq!(result.answer, "Generated response");
    }

    #[test]
    fn test_missing_both_tokens_uses_placeholder() {
        let response = "The model just rambled.";
        let result = extract_sections(response);
        assert_eq!(result.thinking, response);
        assert_eq!(result.answer, "Generated response");
    }

    #[test]
    fn test_preamble_before_thinking_is_dropped() {
        let response = "Sure, here you go.\nTHINKING: step one.\nANSWER: done";
        let result = extract_sections(response);
        assert_eq!(result.thinking, "step one.");
        assert_eq!(result.answer, "done");
    }

    #[test]
    fn test_prompt_embeds_query_and_delimiters() {
        let prompt = build_prompt("Explain quantum computing");
        assert!(prompt.contains("Query: Explain quantum computing"));
        assert!(prompt.contains("THINKING:"));
        assert!(prompt.contains("ANSWER:"));
    }
}

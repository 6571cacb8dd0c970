//! REST API for the chain-of-thought visualizer

use crate::pipeline::{CotPipeline, PipelineError};
use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// API state
pub struct ApiState {
    pub pipeline: Arc<CotPipeline>,
}

/// Request to analyze a query
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// The query to think about. Optional so that a missing field maps to
    /// 400 rather than a body-rejection status.
    #[serde(default)]
    pub query: Option<String>,
}

/// Response for a successful analysis
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Full thinking text
    pub thinking: String,
    /// Final answer text
    pub answer: String,
    /// Figure serialized as a JSON string (the page calls JSON.parse on it)
    pub visualization: String,
    /// Number of thinking stages identified
    pub stages_count: usize,
}

/// Error body for 4xx/5xx responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub backend_error: Option<String>,
}

/// Create the API router
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(portal_page))
        .route("/health", get(health_check))
        .route("/analyze", post(analyze))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Main portal page
async fn portal_page() -> Html<&'static str> {
    Html(PORTAL_HTML)
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let provider = state.pipeline.provider();
    let health = provider.health_check().await;

    Json(HealthResponse {
        status: if health.healthy {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: provider.model().to_string(),
        backend_error: health.error,
    })
}

/// Run the analysis pipeline for a query
async fn analyze(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let query = request.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "No query provided"));
    }

    match state.pipeline.analyze(&query).await {
        Ok(analysis) => {
            let visualization = analysis.figure.to_json().map_err(|e| {
                error!(error = %e, "Figure serialization failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
            })?;

            Ok(Json(AnalyzeResponse {
                thinking: analysis.thinking,
                answer: analysis.answer,
                visualization,
                stages_count: analysis.stages.len(),
            }))
        }
        Err(PipelineError::EmptyQuery) => {
            Err(error_response(StatusCode::BAD_REQUEST, "No query provided"))
        }
        Err(e) => {
            error!(error = %e, "Pipeline failed");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
            ))
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

const PORTAL_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Chain-of-Thought Visualizer</title>
    <script src="https://cdn.plot.ly/plotly-latest.min.js"></script>
    <style>
        :root {
            --bg: #1a1a2e;
            --card: #16213e;
            --accent: #0f3460;
            --highlight: #e94560;
            --text: #eee;
            --muted: #888;
            --error: #f87171;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: 'SF Mono', 'Consolas', monospace;
            background: var(--bg);
            color: var(--text);
            min-height: 100vh;
            padding: 20px;
        }
        .container { max-width: 1400px; margin: 0 auto; }
        h1 {
            font-size: 1.5rem;
            margin-bottom: 6px;
            color: var(--highlight);
        }
        .subtitle { color: var(--muted); margin-bottom: 20px; font-size: 0.85rem; }
        .input-section {
            background: var(--card);
            padding: 20px;
            border-radius: 12px;
            margin-bottom: 20px;
        }
        label {
            font-size: 0.85rem;
            color: var(--muted);
            margin-bottom: 5px;
            display: block;
        }
        input {
            width: 100%;
            background: var(--bg);
            border: 1px solid var(--accent);
            border-radius: 8px;
            padding: 12px;
            color: var(--text);
            font-family: inherit;
            font-size: 0.9rem;
            margin-bottom: 15px;
        }
        input:focus { outline: none; border-color: var(--highlight); }
        button {
            background: var(--highlight);
            color: white;
            border: none;
            padding: 12px 30px;
            border-radius: 8px;
            font-size: 1rem;
            cursor: pointer;
            font-weight: 600;
        }
        button:hover { opacity: 0.9; }
        button:disabled { opacity: 0.5; cursor: not-allowed; }
        .loading { display: none; color: var(--muted); margin-top: 12px; }
        .results { display: none; }
        .panel {
            background: var(--card);
            border-radius: 12px;
            padding: 20px;
            margin-bottom: 20px;
        }
        .panel h2 {
            font-size: 0.9rem;
            color: var(--highlight);
            margin-bottom: 12px;
            text-transform: uppercase;
            letter-spacing: 1px;
        }
        .thinking-text {
            background: var(--bg);
            border-radius: 8px;
            padding: 15px;
            white-space: pre-wrap;
            font-size: 0.85rem;
            line-height: 1.5;
        }
        .answer-text { font-size: 0.95rem; line-height: 1.6; }
        .chart-panel { min-height: 700px; }
        .error-box {
            display: none;
            background: #450a0a;
            color: var(--error);
            border-radius: 8px;
            padding: 15px;
            margin-bottom: 20px;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>Chain-of-Thought Visualizer</h1>
        <p class="subtitle">Enter a query to see how the model thinks, stage by stage</p>

        <div class="input-section">
            <label for="queryInput">Query</label>
            <input type="text" id="queryInput"
                   placeholder="e.g. 'Explain quantum computing'" />
            <button id="analyzeBtn" onclick="analyzeQuery()">Analyze Chain of Thought</button>
            <div class="loading" id="loading">Model is thinking... this may take a while</div>
        </div>

        <div class="error-box" id="errorBox"></div>

        <div class="results" id="results">
            <div class="panel">
                <h2>Chain of Thought</h2>
                <div class="thinking-text" id="thinkingText"></div>
            </div>
            <div class="panel">
                <h2>Final Answer</h2>
                <div class="answer-text" id="answerText"></div>
            </div>
            <div class="panel chart-panel">
                <div id="visualization"></div>
            </div>
        </div>
    </div>

    <script>
        const queryInput = document.getElementById('queryInput');
        const analyzeBtn = document.getElementById('analyzeBtn');
        const loading = document.getElementById('loading');
        const results = document.getElementById('results');
        const errorBox = document.getElementById('errorBox');

        async function analyzeQuery() {
            const query = queryInput.value.trim();
            if (!query) {
                showError('Please enter a query');
                return;
            }

            analyzeBtn.disabled = true;
            loading.style.display = 'block';
            results.style.display = 'none';
            errorBox.style.display = 'none';

            try {
                const response = await fetch('/analyze', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ query })
                });

                const data = await response.json();
                if (!response.ok) {
                    throw new Error(data.error || 'Analysis failed');
                }

                document.getElementById('thinkingText').textContent = data.thinking;
                document.getElementById('answerText').textContent = data.answer;

                const figure = JSON.parse(data.visualization);
                Plotly.newPlot('visualization', figure.data, figure.layout);

                results.style.display = 'block';
            } catch (err) {
                showError(err.message);
            } finally {
                analyzeBtn.disabled = false;
                loading.style.display = 'none';
            }
        }

        function showError(message) {
            errorBox.textContent = message;
            errorBox.style.display = 'block';
        }

        queryInput.addEventListener('keypress', function(e) {
            if (e.key === 'Enter') analyzeQuery();
        });
    </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{
        HealthStatus, LlmProvider, LlmRequest, LlmResponse, ProviderError,
    };
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct ScriptedProvider {
        response: String,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted:test"
        }

        async fn generate(&self, _request: &LlmRequest) -> Result<LlmResponse, ProviderError> {
            Ok(LlmResponse {
                content: self.response.clone(),
                duration_ms: Some(1),
            })
        }

        async fn health_check(&self) -> HealthStatus {
            HealthStatus {
                healthy: true,
                latency_ms: Some(0),
                error: None,
            }
        }
    }

    fn test_router(response: &str) -> Router {
        let pipeline = Arc::new(CotPipeline::new(Arc::new(ScriptedProvider {
            response: response.to_string(),
        })));
        create_router(Arc::new(ApiState { pipeline }))
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_blank_query_returns_400_with_error_field() {
        let router = test_router("unused");
        let response = router
            .oneshot(json_post("/analyze", r#"{"query": ""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn test_missing_query_field_returns_400() {
        let router = test_router("unused");
        let response = router.oneshot(json_post("/analyze", "{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_returns_figure_and_counts() {
        let router = test_router(
            "THINKING: I will analyze the problem. Then I will plan.\nANSWER: All done.",
        );
        let response = router
            .oneshot(json_post("/analyze", r#"{"query": "why?"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["answer"], "All done.");
        assert_eq!(json["stages_count"], 2);

        // The visualization field is a JSON string that parses into a figure
        let figure: serde_json::Value =
            serde_json::from_str(json["visualization"].as_str().unwrap()).unwrap();
        assert!(figure["data"].is_array());
        assert!(figure["layout"]["title"]["text"]
            .as_str()
            .unwrap()
            .contains("Chain-of-Thought"));
    }

    #[tokio::test]
    async fn test_portal_page_served() {
        let router = test_router("unused");
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("/analyze"));
        assert!(page.contains("plotly"));
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let router = test_router("unused");
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["model"], "scripted:test");
    }
}

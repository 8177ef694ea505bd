//! Common test utilities

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nichepulse::llm::{LlmClient, LlmConfig};

pub const TEST_API_KEY: &str = "sk-test-0123456789";

/// A complete analysis document as the model would return it
pub fn analysis_document() -> Value {
    json!({
        "niches": [
            {"name": "AI Video Editing", "growthRate": 31.0, "competition": "Medium", "revenuePotential": 15.2, "trend": "up"},
            {"name": "Prompt Engineering", "growthRate": 27.4, "competition": "Low", "revenuePotential": 19.8, "trend": "up"},
            {"name": "Vlogging", "growthRate": -4.1, "competition": "Very High", "revenuePotential": 10.5, "trend": "down"}
        ],
        "insights": {
            "leastCompetitive": "Prompt Engineering",
            "mostCompetitive": "Vlogging",
            "bestEntryPoint": "AI Video Editing",
            "fastestGrowing": "AI Video Editing"
        },
        "monetization": {
            "highestCPM": "Prompt Engineering ($19.80)",
            "lowestCPM": "Vlogging ($10.50)",
            "bestSponsorship": "AI Video Editing",
            "bestLongTerm": "Courses on prompt design"
        },
        "recommendations": [
            {"title": "AI Editing + Tutorials", "description": "Teach editing with AI tools."},
            {"title": "Prompt Engineering + Coding", "description": "Pair prompts with code walkthroughs."}
        ],
        "metrics": {
            "topGrowingNiche": "AI Video Editing",
            "topGrowingPercentage": 31.0,
            "mostProfitableNiche": "Prompt Engineering",
            "mostProfitableCPM": 19.8,
            "lowestCompetitionNiche": "Prompt Engineering",
            "lowestCompetitionPercentage": 72.0
        }
    })
}

/// A trending document with matching lengths
pub fn trending_document() -> Value {
    json!({
        "categories": ["AI Video Editing", "Prompt Engineering", "AI Music"],
        "percentages": [88, 74, 61]
    })
}

/// Chat completion body whose first choice carries `content`
pub fn chat_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ]
    })
}

/// Client pointed at a mock server
pub fn client_for(server: &MockServer, api_key: Option<&str>) -> LlmClient {
    LlmClient::with_config(LlmConfig {
        base_url: server.uri(),
        api_key: api_key.map(str::to_string),
        timeout_secs: 5,
        ..LlmConfig::default()
    })
    .expect("client should build")
}

/// Mount both prompts, answering each with the given document
pub async fn mount_analysis(server: &MockServer, analysis: &Value, trending: &Value) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("leastCompetitive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(&analysis.to_string())))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("popularity scores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(&trending.to_string())))
        .mount(server)
        .await;
}

/// Mount a provider error for every chat completion request
pub async fn mount_error(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

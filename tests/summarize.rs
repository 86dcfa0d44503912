//! OpenAI-compatible summarizer against a local chat completions stand-in.

use api_catalog::config::SummarizerConfig;
use api_catalog::summarize::create_summarizer;
use axum::{http::HeaderMap, routing::post, Json, Router};
use serde_json::{json, Value};

async fn completions(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let user = body["messages"][1]["content"].as_str().unwrap_or_default();
    Json(json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": format!("model={} auth={} user={}", body["model"].as_str().unwrap_or_default(), auth, user),
            }
        }]
    }))
}

#[tokio::test]
async fn test_openai_summarizer_round_trip() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Router::new().route("/v1/chat/completions", post(completions));
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    std::env::set_var("OPENAI_API_KEY", "sk-test");
    let summarizer = create_summarizer(&SummarizerConfig {
        provider: "openai".to_string(),
        model: Some("gpt-4o-mini".to_string()),
        url: format!("http://{}/v1/chat/completions", addr),
        timeout_secs: 5,
    })
    .unwrap();

    assert_eq!(summarizer.name(), "gpt-4o-mini");
    let summary = summarizer.summarize("openapi: 3.0.0").await.unwrap();
    assert_eq!(
        summary,
        "model=gpt-4o-mini auth=Bearer sk-test user=API Specification: openapi: 3.0.0"
    );
}

#[test]
fn test_unknown_provider_rejected() {
    let config = SummarizerConfig {
        provider: "bard".to_string(),
        ..SummarizerConfig::default()
    };
    assert!(create_summarizer(&config).is_err());
}

#![cfg(feature = "ssr")]

use math_tutor::config::TutorConfig;
use math_tutor::gemini::{GeminiClient, GeminiError};
use math_tutor::model::{Difficulty, MissionId};
use serde_json::json;
use url::Url;
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

// ============================================================================
// Helper Functions
// ============================================================================

const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn client_for(server: &MockServer) -> GeminiClient {
    let base = Url::parse(&server.uri()).expect("mock server uri");
    GeminiClient::new(TutorConfig::for_endpoint("test-key", base))
}

/// Wraps `text` the way the service returns a single candidate.
fn candidate(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

// ureq is blocking; keep it off the runtime that drives the mock server.
async fn blocking<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    tokio::task::spawn_blocking(f).await.expect("blocking task")
}

// ============================================================================
// Problem Generation
// ============================================================================

#[tokio::test]
async fn test_generate_problem_success() {
    let server = MockServer::start().await;

    let problem = json!({
        "question": "What is the next term?",
        "sequenceData": "4, 9, 14, 19, ?",
        "correctAnswer": 24,
        "explanationSteps": ["The terms go up by 5", "19 + 5 = 24"],
        "variableUnit": ""
    });

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("responseSchema"))
        .and(body_string_contains("number sequences"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(&problem.to_string())))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = blocking(move || client.generate_problem(MissionId::Sequences, Difficulty::Easy))
        .await
        .expect("problem");

    assert_eq!(result.question, "What is the next term?");
    assert_eq!(result.sequence_data.as_deref(), Some("4, 9, 14, 19, ?"));
    assert_eq!(result.correct_answer, 24.0);
    assert_eq!(result.explanation_steps.len(), 2);
    assert_eq!(result.variable_unit, None);
}

#[tokio::test]
async fn test_generate_problem_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = blocking(move || client.generate_problem(MissionId::Geometry, Difficulty::Hard))
        .await
        .unwrap_err();

    match err {
        GeminiError::Status { code, body } => {
            assert_eq!(code, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_problem_rejects_non_json_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate("Here is a fun problem for you!")),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = blocking(move || client.generate_problem(MissionId::Equations, Difficulty::Medium))
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiError::MalformedProblem(_)), "{err:?}");
}

#[tokio::test]
async fn test_generate_problem_without_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = blocking(move || client.generate_problem(MissionId::Statistics, Difficulty::Easy))
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiError::EmptyResponse), "{err:?}");
}

// ============================================================================
// Tutor
// ============================================================================

#[tokio::test]
async fn test_ask_tutor_returns_reply_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("Student: Can I have a hint?"))
        .and(body_string_contains("Correct Answer: 24"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate("  Look at how much each term grows.  ")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = blocking(move || {
        client.ask_tutor(
            "Can I have a hint?",
            "Problem: What is the next term?. Correct Answer: 24. User's input so far: 23",
        )
    })
    .await
    .expect("reply");

    assert_eq!(reply, "Look at how much each term grows.");
}

#[tokio::test]
async fn test_ask_tutor_connection_refused() {
    // Grab a free port, then close it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    let base = Url::parse(&format!("http://127.0.0.1:{port}")).expect("base url");

    let client = GeminiClient::new(TutorConfig::for_endpoint("test-key", base));
    let err = blocking(move || client.ask_tutor("hello", "Problem: 1 + 1"))
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiError::Transport(_)), "{err:?}");
}

use std::time::Duration;
use trustloop_core::{TrustError, TrustScorer};
use trustloop_model::RetryConfig;
use trustloop_tlm::{QualityPreset, TlmClient, TlmConfig};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scorer_for(server: &MockServer) -> TlmClient {
    TlmClient::new(
        TlmConfig::new("tlm-test-key")
            .with_base_url(server.uri())
            .with_prompt("Where is the Eiffel Tower?"),
    )
    .unwrap()
}

fn trust_score(score: f64) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(serde_json::json!({ "trustworthiness_score": score }))
}

fn instant_retries(max_retries: u32) -> RetryConfig {
    RetryConfig::default()
        .with_max_retries(max_retries)
        .with_initial_delay(Duration::ZERO)
        .with_max_delay(Duration::ZERO)
}

#[tokio::test]
async fn posts_prompt_and_response_and_returns_score() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/score"))
        .and(header("authorization", "Bearer tlm-test-key"))
        .and(body_json(serde_json::json!({
            "prompt": "Where is the Eiffel Tower?",
            "response": "The Eiffel Tower is in Paris.",
            "quality_preset": "medium"
        })))
        .respond_with(trust_score(0.909))
        .expect(1)
        .mount(&server)
        .await;

    let score = scorer_for(&server).score("The Eiffel Tower is in Paris.").await.unwrap();
    assert!((score - 0.909).abs() < 1e-9);
}

#[tokio::test]
async fn quality_preset_is_forwarded_and_prompt_is_optional() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/score"))
        .and(body_json(serde_json::json!({
            "response": "text",
            "quality_preset": "best"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "trustworthiness_score": 0.5,
                "explanation": "uncertain"
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let scorer = TlmClient::new(
        TlmConfig::new("k").with_base_url(server.uri()).with_quality_preset(QualityPreset::Best),
    )
    .unwrap();
    assert_eq!(scorer.score("text").await.unwrap(), 0.5);
}

#[tokio::test]
async fn rate_limit_propagates_without_retry_policy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/score"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(1)
        .mount(&server)
        .await;

    let err = scorer_for(&server).score("text").await.unwrap_err();
    match err {
        TrustError::Service(message) => {
            assert!(message.contains("429"));
            assert!(message.contains("slow down"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn rate_limit_is_retried_with_retry_policy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/score"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/score"))
        .respond_with(trust_score(0.88))
        .expect(1)
        .mount(&server)
        .await;

    let scorer = scorer_for(&server).with_retry_config(instant_retries(3));
    assert_eq!(scorer.score("text").await.unwrap(), 0.88);
}

#[tokio::test]
async fn out_of_range_score_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/score"))
        .respond_with(trust_score(1.7))
        .mount(&server)
        .await;

    let err = scorer_for(&server).score("text").await.unwrap_err();
    assert!(matches!(err, TrustError::InvalidScore(_)));
}

#[tokio::test]
async fn malformed_body_is_service_error_and_not_retried() {
    let server = MockServer::start().await;
    // Decode errors quote positions such as "column 500"; none of that is a status.
    Mock::given(method("POST"))
        .and(path("/score"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("{}!", " ".repeat(499))))
        .expect(1)
        .mount(&server)
        .await;

    let err = scorer_for(&server)
        .with_retry_config(instant_retries(3))
        .score("text")
        .await
        .unwrap_err();
    assert!(matches!(err, TrustError::Service(_)));
}

#[test]
fn empty_api_key_is_config_error() {
    let err = TlmClient::new(TlmConfig::new("  ")).err().unwrap();
    assert!(matches!(err, TrustError::Config(_)));
}

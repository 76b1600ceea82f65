//! HTTP-level tests for the generation backends against a mock server.

#[cfg(feature = "ollama")]
mod ollama {
    use jot_core::GenerationBackend;
    use jot_inference::OllamaBackend;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_chat_roundtrip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({"model": "llama3.2", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3.2",
                "message": {"role": "assistant", "content": "[{\"type\":\"search\",\"payload\":{\"query\":\"milk\"}}]"},
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = OllamaBackend::with_config(server.uri(), "llama3.2".to_string());
        let reply = backend
            .generate_with_system("You are an action planner.", "find milk")
            .await
            .unwrap();
        assert!(reply.contains("\"type\":\"search\""));
    }

    #[tokio::test]
    async fn test_system_message_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": {"role": "assistant", "content": "ok"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = OllamaBackend::with_config(server.uri(), "llama3.2".to_string());
        assert_eq!(
            backend.generate_with_system("be brief", "hello").await.unwrap(),
            "ok"
        );
    }

    #[tokio::test]
    async fn test_http_error_maps_to_inference_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let backend = OllamaBackend::with_config(server.uri(), "llama3.2".to_string());
        let err = backend.generate("hello").await.unwrap_err();
        assert!(matches!(err, jot_core::Error::Inference(_)));
        assert!(err.to_string().contains("model not loaded"));
    }
}

#[cfg(feature = "openai")]
mod openai {
    use jot_core::GenerationBackend;
    use jot_inference::config::OpenAIConfig;
    use jot_inference::OpenAIBackend;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> OpenAIConfig {
        OpenAIConfig {
            base_url,
            api_key: Some("sk-test".to_string()),
            generation_model: "gpt-4o-mini".to_string(),
        }
    }

    #[tokio::test]
    async fn test_chat_completions_roundtrip_with_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "[]"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = OpenAIBackend::new(test_config(server.uri())).unwrap();
        assert_eq!(backend.generate("organize my notes").await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_config_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let backend = OpenAIBackend::new(test_config(server.uri())).unwrap();
        let err = backend.generate("hello").await.unwrap_err();
        assert!(matches!(err, jot_core::Error::Config(_)));
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use kigo::error::{KigoError, Result};
use kigo::generation::{
    collect, HaikuGenerator, LocalGenerator, RemoteGenerator, TextGenBackend,
    MISSING_CREDENTIAL_WARNING,
};
use kigo::prompt::{build_prompt, flatten_prompt};
use kigo::types::{ChunkKind, DecodingParams, GenerationMode};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::sse_body;

/// Continuation backend that echoes the prompt and appends a fixed tail.
struct EchoBackend {
    tail: String,
    calls: Arc<AtomicUsize>,
}

impl TextGenBackend for EchoBackend {
    fn generate(&self, prompt_text: &str, _params: &DecodingParams) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{prompt_text}{}", self.tail))
    }
}

#[tokio::test]
async fn remote_without_credential_yields_one_warning_chunk() {
    let server = MockServer::start().await;

    // The short-circuit must not touch the backend at all.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let generator = RemoteGenerator::new(None, server.uri(), "openai/gpt-oss-20b");
    let messages = build_prompt("spring rain", &[]);
    let mut stream = generator
        .generate_stream(&messages, &DecodingParams::default())
        .await
        .unwrap();

    let chunk = stream.next().await.unwrap().unwrap();
    assert_eq!(chunk.text, MISSING_CREDENTIAL_WARNING);
    assert_eq!(chunk.kind, ChunkKind::Warning);
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn remote_with_blank_credential_also_short_circuits() {
    let generator =
        RemoteGenerator::new(Some("   ".into()), "http://localhost:1", "openai/gpt-oss-20b");
    let stream = generator
        .generate_stream(&build_prompt("x", &[]), &DecodingParams::default())
        .await
        .unwrap();

    let chunks: Vec<_> = stream.collect().await;
    assert_eq!(chunks.len(), 1);
    assert_eq!(
        chunks[0].as_ref().unwrap().text,
        MISSING_CREDENTIAL_WARNING
    );
}

#[tokio::test]
async fn remote_streams_cumulative_chunks() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer hf-token"))
        .and(body_partial_json(serde_json::json!({
            "model": "openai/gpt-oss-20b",
            "stream": true,
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                sse_body(&["Spring ", "rain falls ", "softly"]),
                "text/event-stream",
            ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let generator =
        RemoteGenerator::new(Some("hf-token".into()), server.uri(), "openai/gpt-oss-20b");
    let stream = generator
        .generate_stream(&build_prompt("a poem about rain", &[]), &DecodingParams::default())
        .await
        .unwrap();

    let texts: Vec<String> = stream
        .map(|chunk| chunk.unwrap().text)
        .collect()
        .await;

    assert_eq!(
        texts,
        vec![
            "Spring ".to_string(),
            "Spring rain falls ".to_string(),
            "Spring rain falls softly".to_string(),
        ]
    );
}

#[tokio::test]
async fn remote_forwards_decoding_params_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "max_tokens": 64,
            "temperature": 0.7,
            "top_p": 0.95,
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["ok"]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let generator =
        RemoteGenerator::new(Some("hf-token".into()), server.uri(), "openai/gpt-oss-20b");
    let params = DecodingParams::builder()
        .max_tokens(64)
        .temperature(0.7)
        .top_p(0.95)
        .build();

    let stream = generator
        .generate_stream(&build_prompt("x", &[]), &params)
        .await
        .unwrap();
    assert_eq!(collect(stream).await.unwrap(), "ok");
}

#[tokio::test]
async fn remote_surfaces_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token rejected"))
        .expect(1)
        .mount(&server)
        .await;

    let generator =
        RemoteGenerator::new(Some("stale".into()), server.uri(), "openai/gpt-oss-20b");
    let err = generator
        .generate_stream(&build_prompt("x", &[]), &DecodingParams::default())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, KigoError::Authentication(_)));
}

#[tokio::test]
async fn local_yields_one_trimmed_continuation_chunk() {
    let calls = Arc::new(AtomicUsize::new(0));
    let generator = LocalGenerator::with_backend(Arc::new(EchoBackend {
        tail: "\n  Plum blossoms open  ".to_string(),
        calls: calls.clone(),
    }));

    let messages = build_prompt("a poem about plums", &[]);
    let mut stream = generator
        .generate_stream(&messages, &DecodingParams::default())
        .await
        .unwrap();

    let chunk = stream.next().await.unwrap().unwrap();
    assert_eq!(chunk.text, "Plum blossoms open");
    assert_eq!(chunk.kind, ChunkKind::Text);
    assert!(stream.next().await.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn local_backend_sees_the_flattened_prompt() {
    struct CaptureBackend {
        seen: std::sync::Mutex<Option<String>>,
    }
    impl TextGenBackend for CaptureBackend {
        fn generate(&self, prompt_text: &str, _params: &DecodingParams) -> Result<String> {
            *self.seen.lock().unwrap() = Some(prompt_text.to_string());
            Ok(format!("{prompt_text}continuation"))
        }
    }

    let backend = Arc::new(CaptureBackend {
        seen: std::sync::Mutex::new(None),
    });
    let generator = LocalGenerator::with_backend(backend.clone());

    let messages = build_prompt("still water", &[]);
    let stream = generator
        .generate_stream(&messages, &DecodingParams::default())
        .await
        .unwrap();
    assert_eq!(collect(stream).await.unwrap(), "continuation");

    let seen = backend.seen.lock().unwrap().clone().unwrap();
    assert_eq!(seen, flatten_prompt(&messages));
    assert!(seen.ends_with("user: still water"));
}

#[tokio::test]
async fn local_backend_loads_at_most_once() {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = loads.clone();
    let generator = LocalGenerator::new(Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(EchoBackend {
            tail: "haiku".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }) as Arc<dyn TextGenBackend>)
    }));

    assert!(!generator.is_loaded());
    for _ in 0..3 {
        let stream = generator
            .generate_stream(&build_prompt("x", &[]), &DecodingParams::default())
            .await
            .unwrap();
        assert_eq!(collect(stream).await.unwrap(), "haiku");
    }
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn mode_dispatch_picks_the_right_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["hosted"]), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let generator = HaikuGenerator::new(
        RemoteGenerator::new(Some("hf-token".into()), server.uri(), "openai/gpt-oss-20b"),
        LocalGenerator::with_backend(Arc::new(EchoBackend {
            tail: "resident".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        })),
    );

    let messages = build_prompt("x", &[]);
    let params = DecodingParams::default();

    let remote = generator
        .generate_stream(&messages, GenerationMode::Remote, &params)
        .await
        .unwrap();
    assert_eq!(collect(remote).await.unwrap(), "hosted");

    let local = generator
        .generate_stream(&messages, GenerationMode::Local, &params)
        .await
        .unwrap();
    assert_eq!(collect(local).await.unwrap(), "resident");
}

#[tokio::test]
async fn collect_returns_the_last_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                sse_body(&["Winter ", "moonlight"]),
                "text/event-stream",
            ),
        )
        .mount(&server)
        .await;

    let generator =
        RemoteGenerator::new(Some("hf-token".into()), server.uri(), "openai/gpt-oss-20b");
    let stream = generator
        .generate_stream(&build_prompt("x", &[]), &DecodingParams::default())
        .await
        .unwrap();

    assert_eq!(collect(stream).await.unwrap(), "Winter moonlight");
}

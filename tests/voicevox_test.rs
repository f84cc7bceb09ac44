use lesson_tts::config::{Config, VoicevoxConfig};
use lesson_tts::tts::voicevox::Voicevox;
use lesson_tts::tts::{AudioFormat, SpeechSynthesizer, SynthesisError, SynthesisRequest};
use mockito::Matcher;
use serde_json::json;

fn engine(url: String) -> Voicevox {
    let config = VoicevoxConfig {
        url,
        ..VoicevoxConfig::default()
    };
    Voicevox::new(&config, 5).unwrap()
}

fn request(text: &str) -> SynthesisRequest {
    SynthesisRequest::new(text, &Config::default().voice()).unwrap()
}

#[test]
fn queries_then_synthesizes_with_slower_speed() {
    let mut server = mockito::Server::new();
    let query = server
        .mock("POST", "/audio_query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("text".into(), "こんにちは".into()),
            Matcher::UrlEncoded("speaker".into(), "2".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(json!({"accent_phrases": [], "speedScale": 1.0, "pitchScale": 0.0}).to_string())
        .create();
    let synthesis = server
        .mock("POST", "/synthesis")
        .match_query(Matcher::UrlEncoded("speaker".into(), "2".into()))
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(
            json!({"accent_phrases": [], "speedScale": 0.85, "pitchScale": 0.0}),
        ))
        .with_header("content-type", "audio/wav")
        .with_body(b"RIFFfake-wav")
        .create();

    let tts = engine(server.url());
    assert_eq!(tts.format(), AudioFormat::Wav);
    let audio = tts.synthesize(&request("こんにちは")).unwrap();

    assert_eq!(audio, b"RIFFfake-wav".to_vec());
    query.assert();
    synthesis.assert();
}

#[test]
fn audio_query_failure_skips_synthesis() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/audio_query")
        .match_query(Matcher::Any)
        .with_status(422)
        .with_body(r#"{"detail":"speaker not found"}"#)
        .create();
    let synthesis = server
        .mock("POST", "/synthesis")
        .match_query(Matcher::Any)
        .expect(0)
        .create();

    let err = engine(server.url()).synthesize(&request("はい")).unwrap_err();
    match err {
        SynthesisError::Api { status, message, .. } => {
            assert_eq!(status, 422);
            assert!(message.contains("speaker not found"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    synthesis.assert();
}

#[test]
fn non_object_query_is_malformed() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/audio_query")
        .match_query(Matcher::Any)
        .with_body("[1,2,3]")
        .create();

    let err = engine(server.url()).synthesize(&request("はい")).unwrap_err();
    assert!(matches!(err, SynthesisError::MalformedResponse { .. }));
}

#[test]
fn unreachable_engine_is_network_error() {
    // Port 9 (discard) is not served by anything in the test environment.
    let err = engine("http://127.0.0.1:9".to_string())
        .synthesize(&request("はい"))
        .unwrap_err();
    assert!(matches!(err, SynthesisError::Network { .. }));
}

fn mock_query(server: &mut mockito::Server) {
    server
        .mock("POST", "/audio_query")
        .match_query(Matcher::Any)
        .with_body("{}")
        .create();
}

#[test]
fn synthesis_error_status_is_reported() {
    let mut server = mockito::Server::new();
    mock_query(&mut server);
    server
        .mock("POST", "/synthesis")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create();

    let err = engine(server.url()).synthesize(&request("はい")).unwrap_err();
    match err {
        SynthesisError::Api { status, message, .. } => {
            assert_eq!(status, 500);
            assert_eq!(message, "synthesis: boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_synthesis_body_is_malformed() {
    let mut server = mockito::Server::new();
    mock_query(&mut server);
    server
        .mock("POST", "/synthesis")
        .match_query(Matcher::Any)
        .with_body("")
        .create();

    let err = engine(server.url()).synthesize(&request("はい")).unwrap_err();
    match err {
        SynthesisError::MalformedResponse { message, .. } => {
            assert_eq!(message, "synthesis returned no audio");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

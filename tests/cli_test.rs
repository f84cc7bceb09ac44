use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;

fn lesson_tts(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lesson-tts").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("GOOGLE_TTS_API_KEY")
        .env_remove("GOOGLE_OAUTH_ACCESS_TOKEN");
    cmd
}

fn write_project(home: &Path, voicevox_url: &str) {
    let config = json!({
        "backend": "voicevox",
        "output_dir": "out",
        "lessons_path": "lessons.json",
        "voicevox": { "url": voicevox_url, "speaker": 2 }
    });
    std::fs::write(home.join("lesson-tts.json"), config.to_string()).unwrap();
    let lessons = json!([
        { "id": "morning", "text": "おはよう" },
        { "id": "broken", "text": "壊れる" },
        { "id": "night", "text": "おやすみ" }
    ]);
    std::fs::write(home.join("lessons.json"), lessons.to_string()).unwrap();
}

fn mock_engine(server: &mut mockito::Server) {
    for text in ["おはよう", "おやすみ"] {
        server
            .mock("POST", "/audio_query")
            .match_query(Matcher::UrlEncoded("text".into(), text.into()))
            .with_body("{}")
            .create();
    }
    server
        .mock("POST", "/audio_query")
        .match_query(Matcher::UrlEncoded("text".into(), "壊れる".into()))
        .with_status(500)
        .with_body("engine crashed")
        .create();
    server
        .mock("POST", "/synthesis")
        .match_query(Matcher::Any)
        .with_body(b"RIFF0000WAVE")
        .create();
}

#[test]
fn lessons_lists_builtin_catalog() {
    let home = tempfile::tempdir().unwrap();
    lesson_tts(home.path())
        .arg("lessons")
        .assert()
        .success()
        .stdout(predicate::str::contains("lesson-001\tおはようございます。"))
        .stdout(predicate::str::contains("10 lessons"));
}

#[test]
fn lessons_json_is_an_array() {
    let home = tempfile::tempdir().unwrap();
    let output = lesson_tts(home.path())
        .args(["lessons", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 10);
    assert_eq!(value[9]["id"], "lesson-010");
}

#[test]
fn generate_continues_past_failed_lesson() {
    let mut server = mockito::Server::new();
    mock_engine(&mut server);
    let home = tempfile::tempdir().unwrap();
    write_project(home.path(), &server.url());

    lesson_tts(home.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("[2/3] broken"))
        .stdout(predicate::str::contains("error:"))
        .stdout(predicate::str::contains("ffmpeg -i"))
        .stdout(predicate::str::contains("Generated: 2/3 files"));

    let out = home.path().join("out");
    assert!(out.join("morning.wav").exists());
    assert!(out.join("night.wav").exists());
    assert!(!out.join("broken.wav").exists());
}

#[test]
fn fail_on_error_sets_exit_status() {
    let mut server = mockito::Server::new();
    mock_engine(&mut server);
    let home = tempfile::tempdir().unwrap();
    write_project(home.path(), &server.url());

    lesson_tts(home.path())
        .args(["generate", "--fail-on-error"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken"));

    assert!(home.path().join("out").join("night.wav").exists());
}

#[test]
fn generate_json_report_with_only_filter() {
    let mut server = mockito::Server::new();
    mock_engine(&mut server);
    let home = tempfile::tempdir().unwrap();
    write_project(home.path(), &server.url());

    let output = lesson_tts(home.path())
        .args(["generate", "--json", "--only", "night"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["backend"], "voicevox");
    assert_eq!(report["successes"], 1);
    assert_eq!(report["total"], 1);
    assert_eq!(report["items"][0]["id"], "night");
}

#[test]
fn unknown_only_id_is_an_error() {
    let home = tempfile::tempdir().unwrap();
    lesson_tts(home.path())
        .args(["generate", "--backend", "voicevox", "--only", "lesson-404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lesson-404"));
}

#[test]
fn google_backend_requires_credentials() {
    let home = tempfile::tempdir().unwrap();
    lesson_tts(home.path())
        .args(["generate", "--backend", "google"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOOGLE_TTS_API_KEY"));

    assert!(!home.path().join("public").exists());
}

#[test]
fn generate_rejects_invalid_config_before_synthesis() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("lesson-tts.json"),
        r#"{"backend":"voicevox","output_dir":"out","google":{"speaking_rate":5.0}}"#,
    )
    .unwrap();

    lesson_tts(home.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("speaking_rate"));

    assert!(!home.path().join("out").exists());
}

#[test]
fn config_validate_accepts_defaults() {
    let home = tempfile::tempdir().unwrap();
    lesson_tts(home.path())
        .args(["config", "--validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config OK"));
}

#[test]
fn config_show_reflects_project_file() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("lesson-tts.json"),
        r#"{"backend":"voicevox","voicevox":{"speaker":8}}"#,
    )
    .unwrap();

    let output = lesson_tts(home.path())
        .args(["config", "--show"])
        .output()
        .unwrap();
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["backend"], "voicevox");
    assert_eq!(config["voicevox"]["speaker"], 8);
    assert_eq!(config["voicevox"]["url"], "http://localhost:50021");
    assert_eq!(config["google"]["voice_name"], "ja-JP-Neural2-B");
}

use serde_json::Value;

use crate::config::VoicevoxConfig;

use super::provider::SpeechSynthesizer;
use super::{http_client, AudioFormat, SynthesisError, SynthesisRequest};

const BACKEND: &str = "voicevox";

/// Local VOICEVOX engine: `audio_query` then `synthesis`, returning WAV.
pub struct Voicevox {
    client: reqwest::blocking::Client,
    base_url: String,
    speaker: u32,
    speed_scale: f64,
}

impl Voicevox {
    pub fn new(config: &VoicevoxConfig, timeout_seconds: u64) -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client(timeout_seconds)?,
            base_url: config.url.trim_end_matches('/').to_string(),
            speaker: config.speaker,
            speed_scale: config.speed_scale,
        })
    }

    fn audio_query(&self, text: &str) -> Result<Value, SynthesisError> {
        let speaker = self.speaker.to_string();
        let response = self
            .client
            .post(format!("{}/audio_query", self.base_url))
            .query(&[("text", text), ("speaker", speaker.as_str())])
            .send()
            .map_err(network)?;

        let status = response.status();
        let body = response.text().map_err(network)?;
        if !status.is_success() {
            return Err(SynthesisError::from_status(
                BACKEND,
                status,
                format!("audio_query: {}", body.trim()),
            ));
        }

        let query: Value = serde_json::from_str(&body).map_err(|err| SynthesisError::MalformedResponse {
            backend: BACKEND,
            message: format!("audio_query is not JSON: {err}"),
        })?;
        if !query.is_object() {
            return Err(SynthesisError::MalformedResponse {
                backend: BACKEND,
                message: "audio_query is not a JSON object".to_string(),
            });
        }
        Ok(query)
    }
}

impl SpeechSynthesizer for Voicevox {
    fn name(&self) -> &str {
        BACKEND
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::Wav
    }

    // The engine ignores SSML; speaking rate is applied through speedScale.
    fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        let mut query = self.audio_query(&request.text)?;
        query["speedScale"] = serde_json::json!(self.speed_scale);

        let speaker = self.speaker.to_string();
        let response = self
            .client
            .post(format!("{}/synthesis", self.base_url))
            .query(&[("speaker", speaker.as_str())])
            .json(&query)
            .send()
            .map_err(network)?;

        let status = response.status();
        let bytes = response.bytes().map_err(network)?;
        if !status.is_success() {
            return Err(SynthesisError::from_status(
                BACKEND,
                status,
                format!("synthesis: {}", String::from_utf8_lossy(&bytes).trim()),
            ));
        }
        if bytes.is_empty() {
            return Err(SynthesisError::MalformedResponse {
                backend: BACKEND,
                message: "synthesis returned no audio".to_string(),
            });
        }

        Ok(bytes.to_vec())
    }
}

fn network(source: reqwest::Error) -> SynthesisError {
    SynthesisError::Network {
        backend: BACKEND,
        source,
    }
}

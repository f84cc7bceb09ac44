use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::GoogleTtsConfig;

use super::provider::SpeechSynthesizer;
use super::{http_client, AudioFormat, SynthesisError, SynthesisRequest};

const BACKEND: &str = "google";

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiKey(String),
    AccessToken(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("ApiKey(..)"),
            Credentials::AccessToken(_) => f.write_str("AccessToken(..)"),
        }
    }
}

impl Credentials {
    /// Reads the API key variable first, then the access token variable.
    pub fn from_env(config: &GoogleTtsConfig) -> Result<Self, SynthesisError> {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        config: &GoogleTtsConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SynthesisError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(&config.api_key_env) {
            return Ok(Credentials::ApiKey(key));
        }
        if let Some(token) = non_empty(&config.access_token_env) {
            return Ok(Credentials::AccessToken(token));
        }

        Err(SynthesisError::Credentials(format!(
            "set {} or {} (for a service account, export the output of `gcloud auth print-access-token`)",
            config.api_key_env, config.access_token_env
        )))
    }
}

/// Google Cloud Text-to-Speech over its v1 REST surface.
pub struct GoogleTts {
    client: reqwest::blocking::Client,
    url: String,
    credentials: Credentials,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeBody<'a> {
    input: Input<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Serialize)]
struct Input<'a> {
    ssml: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
    ssml_gender: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f64,
    pitch: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GoogleTts {
    pub fn new(endpoint: &str, credentials: Credentials, timeout_seconds: u64) -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client(timeout_seconds)?,
            url: format!("{}/v1/text:synthesize", endpoint.trim_end_matches('/')),
            credentials,
        })
    }

    fn error_message(body: &str) -> String {
        serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .ok()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| body.trim().to_string())
    }
}

impl SpeechSynthesizer for GoogleTts {
    fn name(&self) -> &str {
        BACKEND
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        let body = SynthesizeBody {
            input: Input { ssml: &request.ssml },
            voice: VoiceSelection {
                language_code: &request.voice.language_code,
                name: &request.voice.voice_name,
                ssml_gender: request.voice.gender.as_api_str(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: request.voice.speaking_rate,
                pitch: request.voice.pitch,
            },
        };

        let builder = self.client.post(&self.url).json(&body);
        let builder = match &self.credentials {
            Credentials::ApiKey(key) => builder.query(&[("key", key.as_str())]),
            Credentials::AccessToken(token) => builder.bearer_auth(token),
        };

        let response = builder.send().map_err(|source| SynthesisError::Network {
            backend: BACKEND,
            source,
        })?;
        let status = response.status();
        let text = response.text().map_err(|source| SynthesisError::Network {
            backend: BACKEND,
            source,
        })?;

        if !status.is_success() {
            return Err(SynthesisError::from_status(BACKEND, status, Self::error_message(&text)));
        }

        let parsed: SynthesizeResponse =
            serde_json::from_str(&text).map_err(|err| SynthesisError::MalformedResponse {
                backend: BACKEND,
                message: err.to_string(),
            })?;
        if parsed.audio_content.is_empty() {
            return Err(SynthesisError::MalformedResponse {
                backend: BACKEND,
                message: "audioContent is missing".to_string(),
            });
        }

        STANDARD
            .decode(parsed.audio_content.as_bytes())
            .map_err(|err| SynthesisError::MalformedResponse {
                backend: BACKEND,
                message: format!("audioContent is not base64: {err}"),
            })
    }
}

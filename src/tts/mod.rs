pub mod google;
pub mod provider;
pub mod ssml;
pub mod voicevox;

pub use provider::{select_backend, SpeechSynthesizer};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    #[default]
    Female,
    Male,
    Neutral,
}

impl Gender {
    pub fn as_api_str(self) -> &'static str {
        match self {
            Gender::Female => "FEMALE",
            Gender::Male => "MALE",
            Gender::Neutral => "NEUTRAL",
        }
    }
}

/// Voice settings held constant across a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub language_code: String,
    pub voice_name: String,
    pub gender: Gender,
    pub speaking_rate: f64,
    pub pitch: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }
}

/// Text for one item plus its SSML envelope and the run's voice.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub ssml: String,
    pub voice: VoiceConfig,
}

impl SynthesisRequest {
    pub fn new(text: &str, voice: &VoiceConfig) -> Result<Self, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }
        Ok(Self {
            text: text.to_string(),
            ssml: ssml::wrap_slow(text),
            voice: voice.clone(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("text to synthesize is empty")]
    EmptyText,
    #[error("credentials unavailable: {0}")]
    Credentials(String),
    #[error("request to {backend} failed: {source}")]
    Network {
        backend: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{backend} rejected credentials ({status}): {message}")]
    Auth {
        backend: &'static str,
        status: u16,
        message: String,
    },
    #[error("{backend} quota exceeded: {message}")]
    Quota {
        backend: &'static str,
        message: String,
    },
    #[error("{backend} returned {status}: {message}")]
    Api {
        backend: &'static str,
        status: u16,
        message: String,
    },
    #[error("malformed response from {backend}: {message}")]
    MalformedResponse {
        backend: &'static str,
        message: String,
    },
}

impl SynthesisError {
    /// Maps a non-success HTTP status to the matching error kind.
    pub fn from_status(backend: &'static str, status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 | 403 => SynthesisError::Auth {
                backend,
                status: status.as_u16(),
                message,
            },
            429 => SynthesisError::Quota { backend, message },
            code => SynthesisError::Api {
                backend,
                status: code,
                message,
            },
        }
    }
}

pub(crate) fn http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::blocking::Client> {
    let mut builder = reqwest::blocking::Client::builder();
    if timeout_seconds > 0 {
        builder = builder.timeout(std::time::Duration::from_secs(timeout_seconds));
    }
    Ok(builder.build()?)
}

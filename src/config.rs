use anyhow::{bail, Context};
use clap::ValueEnum;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tts::{Gender, VoiceConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    #[value(alias = "google-tts")]
    Google,
    Voicevox,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Google => "google",
            Backend::Voicevox => "voicevox",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub lessons_path: Option<PathBuf>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub google: GoogleTtsConfig,
    #[serde(default)]
    pub voicevox: VoicevoxConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleTtsConfig {
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_language_code")]
    pub language_code: String,
    #[serde(default = "default_voice_name")]
    pub voice_name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default = "default_speaking_rate")]
    pub speaking_rate: f64,
    #[serde(default)]
    pub pitch: f64,
    /// Environment variable holding an API key, sent as `?key=`.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Environment variable holding an OAuth access token, sent as a bearer token.
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoicevoxConfig {
    #[serde(default = "default_voicevox_url")]
    pub url: String,
    #[serde(default = "default_voicevox_speaker")]
    pub speaker: u32,
    #[serde(default = "default_speaking_rate")]
    pub speed_scale: f64,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let project = Self::project_path();
        if project.exists() {
            return Self::load_from_path(&project);
        }

        if let Ok(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("parse config at {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn init_default() -> anyhow::Result<PathBuf> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(&Self::default())?)?;
        Ok(path)
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        let base = BaseDirs::new().context("unable to resolve home directory")?;
        Ok(base.config_dir().join("lesson-tts").join("config.json"))
    }

    /// Voice settings shared by every item of a run.
    pub fn voice(&self) -> VoiceConfig {
        VoiceConfig {
            language_code: self.google.language_code.clone(),
            voice_name: self.google.voice_name.clone(),
            gender: self.google.gender,
            speaking_rate: self.google.speaking_rate,
            pitch: self.google.pitch,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            bail!("output_dir must not be empty");
        }

        // Accepted ranges of the Cloud Text-to-Speech v1 API.
        if !(0.25..=4.0).contains(&self.google.speaking_rate) {
            bail!("google.speaking_rate must be between 0.25 and 4.0");
        }
        if !(-20.0..=20.0).contains(&self.google.pitch) {
            bail!("google.pitch must be between -20.0 and 20.0");
        }
        if self.google.language_code.trim().is_empty() {
            bail!("google.language_code must not be empty");
        }
        if self.google.voice_name.trim().is_empty() {
            bail!("google.voice_name must not be empty");
        }

        if !(0.5..=2.0).contains(&self.voicevox.speed_scale) {
            bail!("voicevox.speed_scale must be between 0.5 and 2.0");
        }
        if !self.voicevox.url.starts_with("http://") && !self.voicevox.url.starts_with("https://") {
            bail!("voicevox.url must be an http(s) URL: {}", self.voicevox.url);
        }

        if let Some(path) = &self.lessons_path {
            if !path.exists() {
                bail!("lessons file not found: {}", path.display());
            }
        }

        Ok(())
    }

    fn project_path() -> PathBuf {
        PathBuf::from("lesson-tts.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            output_dir: default_output_dir(),
            lessons_path: None,
            timeout_seconds: default_timeout_seconds(),
            google: GoogleTtsConfig::default(),
            voicevox: VoicevoxConfig::default(),
        }
    }
}

impl Default for GoogleTtsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_google_endpoint(),
            language_code: default_language_code(),
            voice_name: default_voice_name(),
            gender: Gender::default(),
            speaking_rate: default_speaking_rate(),
            pitch: 0.0,
            api_key_env: default_api_key_env(),
            access_token_env: default_access_token_env(),
        }
    }
}

impl Default for VoicevoxConfig {
    fn default() -> Self {
        Self {
            url: default_voicevox_url(),
            speaker: default_voicevox_speaker(),
            speed_scale: default_speaking_rate(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public").join("audio")
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_google_endpoint() -> String {
    "https://texttospeech.googleapis.com".to_string()
}

fn default_language_code() -> String {
    "ja-JP".to_string()
}

fn default_voice_name() -> String {
    "ja-JP-Neural2-B".to_string()
}

fn default_speaking_rate() -> f64 {
    0.85
}

fn default_api_key_env() -> String {
    "GOOGLE_TTS_API_KEY".to_string()
}

fn default_access_token_env() -> String {
    "GOOGLE_OAUTH_ACCESS_TOKEN".to_string()
}

fn default_voicevox_url() -> String {
    "http://localhost:50021".to_string()
}

fn default_voicevox_speaker() -> u32 {
    2
}

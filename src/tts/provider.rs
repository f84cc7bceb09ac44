use crate::config::{Backend, Config};

use super::google::{Credentials, GoogleTts};
use super::voicevox::Voicevox;
use super::{AudioFormat, SynthesisError, SynthesisRequest};

pub trait SpeechSynthesizer {
    fn name(&self) -> &str;
    fn format(&self) -> AudioFormat;
    fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError>;
}

impl<S: SpeechSynthesizer + ?Sized> SpeechSynthesizer for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn format(&self) -> AudioFormat {
        (**self).format()
    }

    fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        (**self).synthesize(request)
    }
}

impl<S: SpeechSynthesizer + ?Sized> SpeechSynthesizer for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn format(&self) -> AudioFormat {
        (**self).format()
    }

    fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        (**self).synthesize(request)
    }
}

pub fn select_backend(config: &Config, backend: Backend) -> anyhow::Result<Box<dyn SpeechSynthesizer>> {
    tracing::debug!(backend = backend.as_str(), "selecting tts backend");
    match backend {
        Backend::Google => {
            let credentials = Credentials::from_env(&config.google)?;
            Ok(Box::new(GoogleTts::new(
                &config.google.endpoint,
                credentials,
                config.timeout_seconds,
            )?))
        }
        Backend::Voicevox => Ok(Box::new(Voicevox::new(&config.voicevox, config.timeout_seconds)?)),
    }
}

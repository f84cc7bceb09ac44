use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::audio::output::{OutputDir, WriteError};
use crate::audio::{ffmpeg_hint, wav_duration_secs};
use crate::catalog::{Catalog, LessonItem};
use crate::tts::{AudioFormat, SpeechSynthesizer, SynthesisError, SynthesisRequest, VoiceConfig};

#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemStatus {
    Written {
        path: PathBuf,
        bytes: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_secs: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        transcode_hint: Option<String>,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemOutcome {
    pub id: String,
    #[serde(flatten)]
    pub status: ItemStatus,
}

impl ItemOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self.status, ItemStatus::Written { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub backend: String,
    pub format: AudioFormat,
    pub output_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub successes: usize,
    pub total: usize,
    pub items: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn failures(&self) -> usize {
        self.total - self.successes
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| !item.is_written())
            .map(|item| item.id.as_str())
            .collect()
    }
}

/// Observer for per-item progress, called in catalog order.
pub trait Progress {
    fn started(&mut self, _index: usize, _total: usize, _item: &LessonItem) {}
    fn finished(&mut self, _index: usize, _total: usize, _outcome: &ItemOutcome) {}
}

pub struct NoProgress;

impl Progress for NoProgress {}

/// Prints progress lines to stdout.
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn started(&mut self, index: usize, total: usize, item: &LessonItem) {
        println!("[{}/{}] {}", index + 1, total, item.id);
        println!("  text: {}", item.text);
    }

    fn finished(&mut self, _index: usize, _total: usize, outcome: &ItemOutcome) {
        match &outcome.status {
            ItemStatus::Written {
                path,
                bytes,
                duration_secs,
                transcode_hint,
            } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                match duration_secs {
                    Some(secs) => println!(
                        "  done: {} ({:.1} KB, {:.1}s)",
                        name,
                        *bytes as f64 / 1024.0,
                        secs
                    ),
                    None => println!("  done: {} ({:.1} KB)", name, *bytes as f64 / 1024.0),
                }
                if let Some(hint) = transcode_hint {
                    println!("  to convert to MP3: {hint}");
                }
            }
            ItemStatus::Failed { error } => println!("  error: {error}"),
        }
        println!();
    }
}

/// Drives a catalog through one synthesizer, one item at a time.
pub struct BatchRunner<S> {
    synth: S,
    voice: VoiceConfig,
    output_dir: PathBuf,
}

impl<S: SpeechSynthesizer> BatchRunner<S> {
    pub fn new(synth: S, voice: VoiceConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            synth,
            voice,
            output_dir: output_dir.into(),
        }
    }

    /// Only a failure to create the output directory aborts the run; item
    /// failures are logged and recorded in the report.
    pub fn run(&self, catalog: &Catalog, progress: &mut dyn Progress) -> Result<BatchReport, WriteError> {
        let out = OutputDir::create(&self.output_dir)?;
        let started_at = Utc::now();
        let total = catalog.len();
        let format = self.synth.format();

        tracing::info!(
            backend = self.synth.name(),
            total,
            output_dir = %out.root().display(),
            "starting batch"
        );

        let mut successes = 0;
        let mut items = Vec::with_capacity(total);
        for (index, item) in catalog.iter().enumerate() {
            progress.started(index, total, item);

            let status = match self.process(item, &out, format) {
                Ok(status) => {
                    successes += 1;
                    status
                }
                Err(err) => {
                    tracing::warn!(lesson = %item.id, error = %err, "lesson failed; continuing");
                    ItemStatus::Failed {
                        error: err.to_string(),
                    }
                }
            };

            let outcome = ItemOutcome {
                id: item.id.clone(),
                status,
            };
            progress.finished(index, total, &outcome);
            items.push(outcome);
        }

        tracing::info!(successes, total, "batch finished");

        Ok(BatchReport {
            backend: self.synth.name().to_string(),
            format,
            output_dir: out.root().to_path_buf(),
            started_at,
            finished_at: Utc::now(),
            successes,
            total,
            items,
        })
    }

    fn process(&self, item: &LessonItem, out: &OutputDir, format: AudioFormat) -> Result<ItemStatus, ItemError> {
        let request = SynthesisRequest::new(&item.text, &self.voice)?;
        let audio = self.synth.synthesize(&request)?;
        tracing::debug!(lesson = %item.id, bytes = audio.len(), "synthesized");

        let path = out.write(&item.id, format, &audio)?;

        let (duration_secs, transcode_hint) = match format {
            AudioFormat::Wav => (
                wav_duration_secs(&audio),
                Some(ffmpeg_hint(&path, &out.path_for(&item.id, AudioFormat::Mp3))),
            ),
            AudioFormat::Mp3 => (None, None),
        };

        Ok(ItemStatus::Written {
            path,
            bytes: audio.len(),
            duration_secs,
            transcode_hint,
        })
    }
}

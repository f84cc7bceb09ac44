pub mod output;

use std::io::Cursor;
use std::path::Path;

/// Clip length of an encoded WAV buffer, if it parses.
pub fn wav_duration_secs(bytes: &[u8]) -> Option<f64> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).ok()?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }
    Some(reader.duration() as f64 / spec.sample_rate as f64)
}

/// The command that converts a WAV output to MP3. Printed, never run.
pub fn ffmpeg_hint(wav: &Path, mp3: &Path) -> String {
    format!(
        "ffmpeg -i {} -codec:a libmp3lame -qscale:a 2 {}",
        wav.display(),
        mp3.display()
    )
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::tts::AudioFormat;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("create output dir {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Directory receiving `{id}.{ext}` files.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, WriteError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| WriteError::CreateDir {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &str, format: AudioFormat) -> PathBuf {
        self.root.join(format!("{}.{}", id, format.extension()))
    }

    /// Replaces any existing file for `id`; a reader never sees a partial file.
    pub fn write(&self, id: &str, format: AudioFormat, audio: &[u8]) -> Result<PathBuf, WriteError> {
        let path = self.path_for(id, format);
        let tmp = self.root.join(format!(".{}.{}.tmp", id, format.extension()));

        let result = fs::write(&tmp, audio).and_then(|_| fs::rename(&tmp, &path));
        if let Err(source) = result {
            let _ = fs::remove_file(&tmp);
            return Err(WriteError::Write { path, source });
        }
        Ok(path)
    }
}

//! Scoped temporary audio artifacts
//!
//! Synthesized speech headed for local playback is staged in a temp file
//! that is removed when the artifact drops, including on early return.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// A playable audio file that deletes itself when dropped
pub struct AudioArtifact {
    file: NamedTempFile,
    len: usize,
}

impl AudioArtifact {
    /// Stage MP3 bytes into a temp file
    ///
    /// # Errors
    ///
    /// Returns error if the temp file cannot be created or written
    pub fn from_mp3(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::Audio("empty audio artifact".to_string()));
        }

        let mut file = tempfile::Builder::new()
            .prefix("polyglot-reply-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        tracing::debug!(path = %file.path().display(), bytes = bytes.len(), "staged audio artifact");

        Ok(Self {
            file,
            len: bytes.len(),
        })
    }

    /// Path to the staged file, valid until the artifact drops
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Size of the staged audio in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the artifact holds no audio (never true for a constructed one)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_is_removed_on_drop() {
        let artifact = AudioArtifact::from_mp3(&[0xff, 0xfb, 0x90, 0x00]).unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(artifact.len(), 4);

        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn empty_audio_is_rejected() {
        assert!(AudioArtifact::from_mp3(&[]).is_err());
    }
}

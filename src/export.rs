//! Export actions for the generated resume
//!
//! Copy puts the raw markdown on the system clipboard. Download packages it
//! as an [`Artifact`] and saves it into the download directory, replacing the
//! browser's blob-and-hidden-link dance with a plain file write.

use anyhow::{Context, Result};
use arboard::Clipboard;
use std::path::{Path, PathBuf};

/// Fixed name of the downloaded file
pub const DOWNLOAD_FILENAME: &str = "optimized-resume.md";

/// Content type of the downloaded file
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

/// A downloadable file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Package the raw result text exactly as-is
    pub fn markdown(text: &str) -> Self {
        Self {
            filename: DOWNLOAD_FILENAME,
            content_type: MARKDOWN_CONTENT_TYPE,
            bytes: text.as_bytes().to_vec(),
        }
    }

    /// Write the artifact into `dir`, creating it if needed
    ///
    /// Overwrites a previous download of the same name.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create download directory {}", dir.display()))?;

        let path = dir.join(self.filename);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Save `result` as `optimized-resume.md` in `dir`
pub fn download(result: &str, dir: &Path) -> Result<PathBuf> {
    let artifact = Artifact::markdown(result);
    let path = artifact.save(dir)?;
    tracing::info!(
        "Downloaded {} ({} bytes, {})",
        path.display(),
        artifact.bytes.len(),
        artifact.content_type
    );
    Ok(path)
}

/// Destination for copied text
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard via `arboard`
///
/// A fresh handle is opened on every copy to avoid holding resources.
/// Common failure cases: no display server (headless Linux), permission denied.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to set clipboard text")?;
        Ok(())
    }
}

/// Copy `result` to `sink`
///
/// Failures are logged and swallowed. The return value only drives
/// transient UI feedback.
pub fn copy(result: &str, sink: &mut impl ClipboardSink) -> bool {
    match sink.set_text(result) {
        Ok(()) => {
            tracing::debug!("Copied {} bytes to clipboard", result.len());
            true
        }
        Err(e) => {
            tracing::error!("Failed to copy text: {:#}", e);
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Clipboard double that records writes or always fails
    #[derive(Default)]
    pub(crate) struct FakeClipboard {
        pub contents: Option<String>,
        pub fail: bool,
    }

    impl ClipboardSink for FakeClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("no display server");
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_artifact_is_exact_markdown() {
        let artifact = Artifact::markdown("X");
        assert_eq!(artifact.filename, "optimized-resume.md");
        assert_eq!(artifact.content_type, "text/markdown");
        assert_eq!(artifact.bytes, b"X");
    }

    #[test]
    fn test_download_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");

        let path = download("# Jane Doe\n\n- Rust", &target).unwrap();
        assert_eq!(path, target.join(DOWNLOAD_FILENAME));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Jane Doe\n\n- Rust");
    }

    #[test]
    fn test_download_overwrites_previous() {
        let dir = tempfile::tempdir().unwrap();
        download("first", dir.path()).unwrap();
        let path = download("second", dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_copy_writes_raw_text() {
        let mut clipboard = FakeClipboard::default();
        assert!(copy("**raw** markdown", &mut clipboard));
        assert_eq!(clipboard.contents.as_deref(), Some("**raw** markdown"));
    }

    #[test]
    fn test_copy_failure_is_swallowed() {
        let mut clipboard = FakeClipboard {
            fail: true,
            ..Default::default()
        };
        assert!(!copy("text", &mut clipboard));
        assert!(clipboard.contents.is_none());
    }
}

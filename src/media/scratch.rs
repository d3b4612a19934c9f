// src/media/scratch.rs
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static SEQ: AtomicU64 = AtomicU64::new(0);

/// A media file in the scratch directory. The file is removed when the value
/// is dropped, so every exit path of a run cleans up after itself.
#[derive(Debug)]
pub struct ScratchMedia {
    path: PathBuf,
}

impl ScratchMedia {
    /// Take ownership of an existing file; it will be deleted on drop.
    pub fn adopt(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write `bytes` to a fresh file named `{prefix}_{unix_millis}_{seq}.{ext}`.
    pub fn create(dir: &Path, prefix: &str, ext: &str, bytes: &[u8]) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(unique_name(prefix, ext));
        std::fs::write(&path, bytes)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media.png".to_string())
    }

    /// Delete now instead of waiting for drop.
    pub fn discard(self) {}
}

impl Drop for ScratchMedia {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "scratch media removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "failed to remove scratch media")
            }
        }
    }
}

pub fn unique_name(prefix: &str, ext: &str) -> String {
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{}_{seq}.{ext}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let media = ScratchMedia::create(dir.path(), "news", "png", b"png-bytes").unwrap();
        let path = media.path().to_path_buf();
        assert!(path.is_file());
        drop(media);
        assert!(!path.exists());
    }

    #[test]
    fn adopting_a_missing_file_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let media = ScratchMedia::adopt(dir.path().join("ghost.png"));
        assert!(!media.exists());
        media.discard();
    }

    #[test]
    fn names_never_collide() {
        let a = unique_name("chart", "png");
        let b = unique_name("chart", "png");
        assert_ne!(a, b);
        assert!(a.starts_with("chart_") && a.ends_with(".png"));
    }
}

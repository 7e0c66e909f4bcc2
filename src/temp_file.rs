use std::{fs, path::PathBuf};

/// Owns the downloaded file for the duration of one request and removes it
/// on drop. Cleanup is best-effort: a file that is already gone or cannot be
/// removed is ignored.
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_file_on_drop() {
        let path = std::env::temp_dir().join(format!("tg-grabber-{}", uuid::Uuid::new_v4()));
        fs::write(&path, b"payload").unwrap();
        {
            let _guard = TempFile::new(&path);
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn missing_file_is_tolerated() {
        let path = std::env::temp_dir().join("tg-grabber-never-created.mp4");
        let _guard = TempFile::new(path);
    }
}

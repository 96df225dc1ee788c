//! Filesystem adapters for mentionkit.
//!
//! Resolves the data directory and implements `UploadStore` from
//! `mentionkit-core` over a local upload directory. Uploads are stored as
//! `{attachment_id}.{ext}` and located by file stem.

use std::path::{Path, PathBuf};

use mentionkit_core::storage::upload_store::UploadStore;
use tracing::{debug, warn};

/// Local directory holding uploaded attachment bytes.
#[derive(Debug, Clone)]
pub struct LocalUploadDir {
    root: PathBuf,
}

impl LocalUploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Copy bytes into the upload directory as `{attachment_id}.{ext}`,
    /// taking the extension from the original file name.
    pub async fn store(
        &self,
        attachment_id: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, std::io::Error> {
        tokio::fs::create_dir_all(&self.root).await?;
        let file_name = match Path::new(original_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{attachment_id}.{ext}"),
            None => attachment_id.to_string(),
        };
        let path = self.root.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    async fn find_by_stem(&self, attachment_id: &str) -> Result<Option<PathBuf>, std::io::Error> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let matches = path.file_stem().and_then(|s| s.to_str()) == Some(attachment_id);
            if matches && entry.file_type().await?.is_file() {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

impl UploadStore for LocalUploadDir {
    async fn read_upload(&self, attachment_id: &str) -> Option<Vec<u8>> {
        let path = match self.find_by_stem(attachment_id).await {
            Ok(Some(path)) => path,
            Ok(None) => {
                debug!(attachment_id, "no upload found");
                return None;
            }
            Err(err) => {
                warn!(attachment_id, "failed to scan upload dir: {err}");
                return None;
            }
        };

        match tokio::fs::read(&path).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!(path = %path.display(), "failed to read upload: {err}");
                None
            }
        }
    }
}

/// Guess a mime type from a file name's extension.
pub fn guess_mime_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("txt" | "log") => "text/plain",
        Some("md") => "text/markdown",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("toml") => "application/toml",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `MENTIONKIT_DATA_DIR` environment variable
/// 2. `~/.mentionkit`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MENTIONKIT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".mentionkit");
    }

    // Last resort: current directory
    PathBuf::from(".mentionkit")
}

/// Resolve a configured path: absolute paths are kept, relative ones are
/// joined onto the data directory.
pub fn resolve_in_data_dir(data_dir: &Path, configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}

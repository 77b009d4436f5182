use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("invalid file name: {0:?}")]
    InvalidName(String),
    #[error("failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadKind {
    Pdf,
    ProfileHeader,
    ProfileIcon,
}

impl UploadKind {
    /// Folder under the www root, with trailing slash.
    pub fn folder(self) -> &'static str {
        match self {
            UploadKind::Pdf => "pdf/",
            UploadKind::ProfileHeader => "img/profile-headers/",
            UploadKind::ProfileIcon => "img/profile-icons/",
        }
    }
}

/// Reduces a client supplied name to its last path component.
pub fn sanitize_file_name(name: &str) -> Result<String, UploadError> {
    let base = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or("")
        .trim();
    if base.is_empty() || base == "." || base == ".." || base.contains('\0') {
        return Err(UploadError::InvalidName(name.to_string()));
    }
    Ok(base.to_string())
}

pub struct UploadService {
    www_root: PathBuf,
}

impl UploadService {
    pub fn new(www_root: impl Into<PathBuf>) -> Self {
        Self {
            www_root: www_root.into(),
        }
    }

    pub fn www_root(&self) -> &Path {
        &self.www_root
    }

    /// Writes the file and returns its path relative to the www root.
    pub async fn save(
        &self,
        kind: UploadKind,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        let name = sanitize_file_name(file_name)?;
        let relative = format!("{}{}", kind.folder(), name);

        let dir = self.www_root.join(kind.folder());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&name), bytes).await?;

        tracing::info!("Uploaded {:?}: {} ({} bytes)", kind, relative, bytes.len());
        Ok(relative)
    }
}

//! Resume and photo attachments, stored inline as base64 data URLs.

use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::STANDARD as B64};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Failed to read attachment {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Attachment path {0:?} has no file name")]
    NoFileName(PathBuf),
    #[error("Attachment {0} is not a base64 data URL")]
    Malformed(String),
    #[error("Attachment payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub file_name: String,
    /// `data:<media type>;base64,<payload>`
    pub data: String,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl Attachment {
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Self {
        let file_name = file_name.into();
        let data = format!(
            "data:{};base64,{}",
            media_type_for(&file_name),
            B64.encode(bytes)
        );
        Self { file_name, data }
    }

    pub fn media_type(&self) -> Option<&str> {
        let (header, _) = self.data.strip_prefix("data:")?.split_once(',')?;
        header.strip_suffix(";base64")
    }

    /// Decode the stored payload back to the original file contents.
    pub fn decode(&self) -> Result<Vec<u8>, AttachmentError> {
        let payload = self
            .data
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, payload)| payload)
            .ok_or_else(|| AttachmentError::Malformed(self.file_name.clone()))?;
        Ok(B64.decode(payload)?)
    }

    /// Display form of the file name, see [`truncate_file_name`].
    pub fn display_name(&self) -> String {
        truncate_file_name(&self.file_name, DISPLAY_NAME_LEN)
    }
}

pub const DISPLAY_NAME_LEN: usize = 15;

/// Read a file fully and encode it as an attachment.
pub async fn encode_file(path: &Path) -> Result<Attachment, AttachmentError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AttachmentError::NoFileName(path.to_path_buf()))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| AttachmentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(file = %file_name, bytes = bytes.len(), "attachment encoded");
    Ok(Attachment::from_bytes(file_name, &bytes))
}

fn media_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Shorten a file name to `max_len` characters, keeping its extension and
/// marking the cut with `...`.
pub fn truncate_file_name(file_name: &str, max_len: usize) -> String {
    if file_name.chars().count() <= max_len {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, extension)) => {
            let keep = max_len.saturating_sub(3 + extension.chars().count());
            let stem: String = stem.chars().take(keep).collect();
            format!("{}...{}", stem, extension)
        }
        None => {
            let keep = max_len.saturating_sub(3);
            format!("{}...", file_name.chars().take(keep).collect::<String>())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_survive_encoding() {
        let attachment = Attachment::from_bytes("resume.pdf", b"%PDF-1.4 body");
        assert!(attachment.data.starts_with("data:application/pdf;base64,"));
        assert_eq!(attachment.media_type(), Some("application/pdf"));
        assert_eq!(attachment.decode().unwrap(), b"%PDF-1.4 body");
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        let attachment = Attachment::from_bytes("notes", b"x");
        assert_eq!(attachment.media_type(), Some("application/octet-stream"));
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let attachment = Attachment {
            file_name: "photo.png".into(),
            data: "not a data url".into(),
        };
        assert!(matches!(
            attachment.decode(),
            Err(AttachmentError::Malformed(_))
        ));
    }

    #[test]
    fn long_names_keep_their_extension() {
        assert_eq!(
            truncate_file_name("my_resume_final_version.pdf", 15),
            "my_resume...pdf"
        );
        assert_eq!(truncate_file_name("photo.png", 15), "photo.png");
        assert_eq!(truncate_file_name("averyveryverylongname", 10), "averyve...");
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = encode_file(&dir.path().join("absent.pdf")).await;
        assert!(matches!(result, Err(AttachmentError::Read { .. })));
    }
}

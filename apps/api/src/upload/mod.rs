//! Upload validation and storage.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Multipart field the resume arrives in.
pub const RESUME_FIELD: &str = "resume";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedExtension {
    Pdf,
    Docx,
    Txt,
}

impl AllowedExtension {
    fn parse(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("No file was uploaded in the 'resume' field")]
    MissingFile,

    #[error("The uploaded file has no name")]
    EmptyFilename,

    #[error("Unsupported file type '{0}'; upload a PDF, DOCX or TXT file")]
    UnsupportedExtension(String),

    #[error("The uploaded file is empty")]
    EmptyFile,
}

impl UploadRejection {
    pub fn code(&self) -> &'static str {
        match self {
            UploadRejection::MissingFile => "MISSING_FILE",
            UploadRejection::EmptyFilename => "EMPTY_FILENAME",
            UploadRejection::UnsupportedExtension(_) => "UNSUPPORTED_EXTENSION",
            UploadRejection::EmptyFile => "EMPTY_FILE",
        }
    }
}

/// Checks the filename of an upload. `filename` is `None` when the form had
/// no `resume` field at all.
pub fn validate_upload(filename: Option<&str>) -> Result<AllowedExtension, UploadRejection> {
    let name = filename.ok_or(UploadRejection::MissingFile)?;
    if name.trim().is_empty() {
        return Err(UploadRejection::EmptyFilename);
    }
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or_default();
    AllowedExtension::parse(ext).ok_or_else(|| UploadRejection::UnsupportedExtension(ext.to_string()))
}

pub fn validate_contents(bytes: &[u8]) -> Result<(), UploadRejection> {
    if bytes.is_empty() {
        return Err(UploadRejection::EmptyFile);
    }
    Ok(())
}

/// Reduces a client-supplied name to a safe basename.
pub fn secure_filename(name: &str) -> String {
    let basename = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = basename
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Saves uploads under randomized names. Files are never removed.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Creates the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        info!("Upload directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `<dir>/<uuid>_<secure name>` and returns its path.
    pub async fn save(&self, original: &str, bytes: &Bytes) -> std::io::Result<PathBuf> {
        let path = self.path_for(original);
        tokio::fs::write(&path, bytes).await?;
        debug!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    fn path_for(&self, original: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{}", Uuid::new_v4(), secure_filename(original)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions_are_case_insensitive() {
        assert_eq!(validate_upload(Some("cv.PDF")), Ok(AllowedExtension::Pdf));
        assert_eq!(validate_upload(Some("my.cv.docx")), Ok(AllowedExtension::Docx));
        assert_eq!(validate_upload(Some("notes.txt")), Ok(AllowedExtension::Txt));
        assert_eq!(validate_upload(Some("CV.Docx")).map(|e| e.as_str()), Ok("docx"));
    }

    #[test]
    fn test_rejections_carry_reason_codes() {
        let cases = [
            (None, "MISSING_FILE"),
            (Some(""), "EMPTY_FILENAME"),
            (Some("resume.exe"), "UNSUPPORTED_EXTENSION"),
            (Some("resume"), "UNSUPPORTED_EXTENSION"),
            (Some("archive.pdf.zip"), "UNSUPPORTED_EXTENSION"),
        ];
        for (name, code) in cases {
            assert_eq!(validate_upload(name).unwrap_err().code(), code, "{name:?}");
        }
        assert_eq!(validate_contents(b"").unwrap_err().code(), "EMPTY_FILE");
        assert!(validate_contents(b"x").is_ok());
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\My Resume (v2).pdf"), "My_Resume_v2.pdf");
        assert_eq!(secure_filename(".hidden.txt"), "hidden.txt");
        assert_eq!(secure_filename("résumé.pdf"), "rsum.pdf");
    }

    #[tokio::test]
    async fn test_same_name_saves_two_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads")).unwrap();
        let bytes = Bytes::from_static(b"Jane Doe");

        let first = store.save("resume.txt", &bytes).await.unwrap();
        let second = store.save("resume.txt", &bytes).await.unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with(store.dir()));
        assert!(first.file_name().unwrap().to_string_lossy().ends_with("_resume.txt"));
        assert_eq!(std::fs::read(&second).unwrap(), b"Jane Doe");
    }
}

use std::path::{Path, PathBuf};

use crate::error::AttachError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A résumé file selected for the next submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Load a file from disk, accepting only PDFs.
    ///
    /// The content type is guessed from the file name, so a rejected file is
    /// never read.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AttachError> {
        let path = path.as_ref();
        let content_type = guess_content_type(path);
        if content_type != PDF_CONTENT_TYPE {
            return Err(AttachError::NotPdf {
                path: path.to_path_buf(),
                content_type,
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(|source| AttachError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::debug!(name = %name, size = bytes.len(), "loaded attachment");

        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }

    /// Build an attachment from bytes already in memory
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AttachError> {
        let name = name.into();
        let content_type = guess_content_type(Path::new(&name));
        if content_type != PDF_CONTENT_TYPE {
            return Err(AttachError::NotPdf {
                path: PathBuf::from(name),
                content_type,
            });
        }
        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }
}

fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.7 fake").unwrap();

        let attachment = Attachment::load(&path).await.unwrap();
        assert_eq!(attachment.name, "resume.pdf");
        assert_eq!(attachment.content_type, PDF_CONTENT_TYPE);
        assert_eq!(attachment.bytes, b"%PDF-1.7 fake");
    }

    #[tokio::test]
    async fn test_load_uppercase_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CV.PDF");
        std::fs::write(&path, b"%PDF").unwrap();

        assert!(Attachment::load(&path).await.is_ok());
    }

    #[tokio::test]
    async fn test_load_rejects_non_pdf_without_reading() {
        // The file does not exist; a rejection by type must win over the I/O error
        let err = Attachment::load("/nonexistent/resume.docx").await.unwrap_err();
        assert!(matches!(err, AttachError::NotPdf { .. }));
        assert_eq!(err.to_string(), "Please upload a PDF file only");
    }

    #[tokio::test]
    async fn test_load_missing_pdf_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Attachment::load(dir.path().join("missing.pdf")).await.unwrap_err();
        assert!(matches!(err, AttachError::Io { .. }));
    }

    #[test]
    fn test_from_bytes_validates_name() {
        assert!(Attachment::from_bytes("resume.pdf", vec![1, 2, 3]).is_ok());
        assert!(matches!(
            Attachment::from_bytes("notes.txt", vec![]),
            Err(AttachError::NotPdf { .. })
        ));
    }
}

//! File attachments for multipart requests

use std::path::Path;

use crate::error::{HttpError, Result};

/// One file part of a multipart request
///
/// Contents are held in memory so the request can be re-issued on retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
    field: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

impl MultipartFile {
    /// Attach an in-memory buffer under `field`
    pub fn from_bytes(
        field: impl Into<String>,
        data: impl Into<Vec<u8>>,
        filename: Option<impl Into<String>>,
    ) -> Self {
        Self {
            field: field.into(),
            filename: filename.map(Into::into),
            content_type: None,
            data: data.into(),
        }
    }

    /// Read the file at `path` and attach it under `field`
    ///
    /// The filename defaults to the last component of `path`.
    pub async fn from_path(field: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(HttpError::InvalidRequest(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        Ok(Self {
            field: field.into(),
            filename,
            content_type: None,
            data,
        })
    }

    /// Override the part's MIME type (reqwest defaults to octet-stream)
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn to_part(&self) -> Result<reqwest::multipart::Part> {
        let mut part = reqwest::multipart::Part::bytes(self.data.clone());
        if let Some(filename) = &self.filename {
            part = part.file_name(filename.clone());
        }
        if let Some(content_type) = &self.content_type {
            part = part.mime_str(content_type)?;
        }
        Ok(part)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_from_bytes() {
        let file = MultipartFile::from_bytes("file", b"hello".to_vec(), Some("test.txt"));
        assert_eq!(file.field(), "file");
        assert_eq!(file.filename(), Some("test.txt"));
        assert_eq!(file.len(), 5);
        assert_eq!(file.data(), b"hello");
    }

    #[test]
    fn test_from_bytes_without_filename() {
        let file = MultipartFile::from_bytes("blob", vec![0u8; 3], None::<String>);
        assert_eq!(file.filename(), None);
        assert!(!file.is_empty());
    }

    #[tokio::test]
    async fn test_from_path_reads_contents_and_name() {
        let mut tmp = tempfile::Builder::new()
            .prefix("report")
            .suffix(".csv")
            .tempfile()
            .unwrap();
        tmp.write_all(b"a,b\n1,2\n").unwrap();

        let file = MultipartFile::from_path("upload", tmp.path()).await.unwrap();
        let expected_name = tmp.path().file_name().unwrap().to_string_lossy().into_owned();

        assert_eq!(file.field(), "upload");
        assert_eq!(file.filename(), Some(expected_name.as_str()));
        assert_eq!(file.len(), 8);
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = MultipartFile::from_path("upload", dir.path().join("nope.bin")).await;
        assert!(matches!(result, Err(HttpError::Io(_))));
    }

    #[tokio::test]
    async fn test_from_path_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = MultipartFile::from_path("upload", dir.path()).await;
        assert!(matches!(result, Err(HttpError::InvalidRequest(_))));
    }

    #[test]
    fn test_invalid_content_type_is_rejected() {
        let file = MultipartFile::from_bytes("f", vec![1], Some("a.bin"))
            .with_content_type("not a mime type");
        assert!(file.to_part().is_err());
    }
}

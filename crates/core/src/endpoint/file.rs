//! Endpoint backed by a file on disk.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::TextEndpoint;
use crate::errors::EndpointError;

/// A text file that a human (or another tool) edits in place.
///
/// A missing file reads as empty text when `create_if_missing` is set.
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct FileEndpoint {
    path: PathBuf,
    create_if_missing: bool,
}

impl FileEndpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            create_if_missing: true,
        }
    }

    /// Fail reads with [`EndpointError::NotFound`] instead of treating a
    /// missing file as empty.
    pub fn require_existing(mut self) -> Self {
        self.create_if_missing = false;
        self
    }

    pub fn with_create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, text: &str) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl TextEndpoint for FileEndpoint {
    fn get_text(&mut self) -> Result<String, EndpointError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound && self.create_if_missing => {
                debug!(path = %self.path.display(), "endpoint file missing, reading as empty");
                Ok(String::new())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(EndpointError::NotFound(self.path.display().to_string()))
            }
            Err(source) => Err(EndpointError::Read {
                endpoint: self.describe(),
                source,
            }),
        }
    }

    fn set_text(&mut self, text: &str) -> Result<(), EndpointError> {
        debug!(path = %self.path.display(), bytes = text.len(), "writing endpoint file");
        self.write_atomic(text).map_err(|source| EndpointError::Write {
            endpoint: self.describe(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut endpoint = FileEndpoint::new(dir.path().join("custom_data.ini"));
        assert_eq!(endpoint.get_text().unwrap(), "");
    }

    #[test]
    fn test_missing_file_required() {
        let dir = tempfile::tempdir().unwrap();
        let mut endpoint = FileEndpoint::new(dir.path().join("absent.ini")).require_existing();
        assert!(matches!(endpoint.get_text(), Err(EndpointError::NotFound(_))));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom_data.ini");
        let mut endpoint = FileEndpoint::new(&path);

        endpoint.set_text("[States]\nText=hi\n").unwrap();
        assert_eq!(endpoint.get_text().unwrap(), "[States]\nText=hi\n");

        endpoint.set_text("[States]\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[States]\n");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut endpoint = FileEndpoint::new(dir.path().join("nope").join("data.ini"));
        assert!(matches!(
            endpoint.set_text("x"),
            Err(EndpointError::Write { .. })
        ));
    }
}

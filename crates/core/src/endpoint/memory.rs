//! In-process endpoint that records every write.

use super::TextEndpoint;
use crate::errors::EndpointError;

/// A text buffer held in memory.
///
/// Keeps a log of every `set_text` call so callers can see exactly what was
/// pushed and how often.
#[derive(Debug, Clone, Default)]
pub struct MemoryEndpoint {
    text: String,
    writes: Vec<String>,
    reads: usize,
}

impl MemoryEndpoint {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            writes: Vec::new(),
            reads: 0,
        }
    }

    /// Current buffer contents.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Simulate an outside edit. Not recorded as a write.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Every text written through [`TextEndpoint::set_text`], oldest first.
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    /// Number of [`TextEndpoint::get_text`] calls.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl TextEndpoint for MemoryEndpoint {
    fn get_text(&mut self) -> Result<String, EndpointError> {
        self.reads += 1;
        Ok(self.text.clone())
    }

    fn set_text(&mut self, text: &str) -> Result<(), EndpointError> {
        self.text = text.to_string();
        self.writes.push(text.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

//! External text sources and sinks.
//!
//! An endpoint is anything that can hand over its current text and accept a
//! replacement. The sync layer reads it once per tick and writes it at most
//! once per tick.

pub mod file;
pub mod memory;

pub use file::FileEndpoint;
pub use memory::MemoryEndpoint;

use crate::errors::EndpointError;

/// A text buffer that another actor may edit between ticks.
pub trait TextEndpoint {
    /// Snapshot the current external text.
    fn get_text(&mut self) -> Result<String, EndpointError>;

    /// Replace the external text.
    fn set_text(&mut self, text: &str) -> Result<(), EndpointError>;

    /// Short human-readable name used in logs.
    fn describe(&self) -> String;
}

impl<T: TextEndpoint + ?Sized> TextEndpoint for &mut T {
    fn get_text(&mut self) -> Result<String, EndpointError> {
        (**self).get_text()
    }

    fn set_text(&mut self, text: &str) -> Result<(), EndpointError> {
        (**self).set_text(text)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

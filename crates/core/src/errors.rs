//! Error types for the terminal-sync core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them for callers that want a single
//! error type.
//!
//! Field-level decode problems (a malformed number or vector inside a value)
//! are deliberately absent here: typed accessors fall back to zero defaults
//! instead of failing.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors from direct key/value store lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The key was never set in the given section.
    #[error("missing key '{key}' in section '{section}'")]
    MissingKey { section: String, key: String },
}

// ---------------------------------------------------------------------------
// Document parse errors
// ---------------------------------------------------------------------------

/// Document-level failures when parsing canonical text.
///
/// Every variant carries the 1-based line number of the offending line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A `Key=Value` line appeared before any `[Section]` header.
    #[error("line {line}: key outside of any section")]
    KeyOutsideSection { line: usize },

    /// A line starting with `[` is not a well-formed header.
    #[error("line {line}: malformed section header")]
    MalformedHeader { line: usize },

    /// A header with nothing between the brackets.
    #[error("line {line}: empty section name")]
    EmptySectionName { line: usize },

    /// The same section header appeared twice.
    #[error("line {line}: duplicate section '{section}'")]
    DuplicateSection { line: usize, section: String },

    /// A `=` with nothing before it.
    #[error("line {line}: empty key")]
    EmptyKey { line: usize },

    /// The same key appeared twice within one section.
    #[error("line {line}: duplicate key '{key}' in section '{section}'")]
    DuplicateKey {
        line: usize,
        section: String,
        key: String,
    },

    /// A `|` continuation line that does not follow an empty `Key=` line.
    #[error("line {line}: continuation line without a value to continue")]
    OrphanContinuation { line: usize },

    /// A line that is neither a header, a key, a comment, nor blank.
    #[error("line {line}: expected '[Section]' or 'Key=Value'")]
    MalformedLine { line: usize },
}

impl ParseError {
    /// The 1-based line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::KeyOutsideSection { line }
            | Self::MalformedHeader { line }
            | Self::EmptySectionName { line }
            | Self::DuplicateSection { line, .. }
            | Self::EmptyKey { line }
            | Self::DuplicateKey { line, .. }
            | Self::OrphanContinuation { line }
            | Self::MalformedLine { line } => *line,
        }
    }
}

// ---------------------------------------------------------------------------
// Endpoint errors
// ---------------------------------------------------------------------------

/// Errors from reading or writing an external text endpoint.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// Reading the external text failed.
    #[error("failed to read endpoint '{endpoint}': {source}")]
    Read {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the external text failed.
    #[error("failed to write endpoint '{endpoint}': {source}")]
    Write {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The endpoint does not exist and may not be created.
    #[error("endpoint not found: {0}")]
    NotFound(String),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = StoreError::MissingKey {
            section: "UI".into(),
            key: "Alpha".into(),
        };
        assert_eq!(err.to_string(), "missing key 'Alpha' in section 'UI'");

        let err = ParseError::DuplicateKey {
            line: 7,
            section: "States".into(),
            key: "Text".into(),
        };
        assert_eq!(
            err.to_string(),
            "line 7: duplicate key 'Text' in section 'States'"
        );

        let err = ConfigError::InvalidValue {
            field: "endpoint.path".into(),
            detail: "must not be empty".into(),
        };
        assert!(err.to_string().contains("endpoint.path"));
    }

    #[test]
    fn test_parse_error_line() {
        assert_eq!(ParseError::MalformedLine { line: 3 }.line(), 3);
        assert_eq!(
            ParseError::DuplicateSection {
                line: 12,
                section: "UI".into()
            }
            .line(),
            12
        );
    }

    #[test]
    fn test_core_error_from_subsystem() {
        let parse_err = ParseError::EmptyKey { line: 1 };
        let core_err: CoreError = parse_err.into();
        assert!(matches!(core_err, CoreError::Parse(_)));

        let endpoint_err = EndpointError::NotFound("/tmp/none".into());
        let core_err: CoreError = endpoint_err.into();
        assert!(matches!(core_err, CoreError::Endpoint(_)));
    }
}

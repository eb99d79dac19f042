//! # Structured Config
//!
//! Parsing of TOML-like project files (`pyproject.toml`) is an injected capability. A
//! [`Snapshot`](super::snapshot::Snapshot) built without a parser reports
//! [`StructuredConfig::Unsupported`], and rules fall back to raw-text heuristics instead of
//! treating the file as empty.

use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Errors raised by a [`StructuredParser`]. They never leave the snapshot: a file that fails
/// to parse reads as an empty table.
#[derive(Error, Debug)]
pub enum StructuredParseError {
    /// The content is not valid TOML.
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Turns the text of a structured config file into a table.
pub trait StructuredParser: fmt::Debug {
    /// Parses `text` into its top-level table.
    fn parse(&self, text: &str) -> Result<toml::Table, StructuredParseError>;
}

/// The default parser, backed by the `toml` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlParser;

impl StructuredParser for TomlParser {
    fn parse(&self, text: &str) -> Result<toml::Table, StructuredParseError> {
        Ok(toml::from_str(text)?)
    }
}

/// The outcome of reading a structured config file.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredConfig {
    /// The file's top-level table. Empty when the file is absent or malformed.
    Parsed(Rc<toml::Table>),
    /// No parser is available, so the caller has to fall back to the raw text.
    Unsupported,
}

impl StructuredConfig {
    /// Returns the table if one was parsed and it has at least one key.
    pub fn non_empty(&self) -> Option<&toml::Table> {
        match self {
            Self::Parsed(table) if !table.is_empty() => Some(table),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_parser_reads_nested_tables() {
        let table = TomlParser
            .parse("[tool.pytest.ini_options]\nminversion = \"6.0\"")
            .unwrap();
        assert!(table.contains_key("tool"));
    }

    #[test]
    fn test_toml_parser_rejects_garbage() {
        assert!(TomlParser.parse("[tool\nthis is = = not toml").is_err());
    }

    #[test]
    fn test_non_empty() {
        let empty = StructuredConfig::Parsed(Rc::new(toml::Table::new()));
        assert!(empty.non_empty().is_none());
        assert!(StructuredConfig::Unsupported.non_empty().is_none());

        let parsed = StructuredConfig::Parsed(Rc::new(TomlParser.parse("a = 1").unwrap()));
        assert!(parsed.non_empty().is_some());
    }
}

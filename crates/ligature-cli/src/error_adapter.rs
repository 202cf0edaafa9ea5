//! Error adapter for converting LigatureError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use ligature::LigatureError;

/// Adapter that renders a [`LigatureError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a LigatureError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            LigatureError::Io(_) => "ligature::io",
            LigatureError::Config(_) => "ligature::config",
            LigatureError::DuplicateId(_) => "ligature::duplicate_id",
            LigatureError::UnknownShape(_) => "ligature::unknown_shape",
            LigatureError::Document(_) => "ligature::document",
            LigatureError::DrawTool(_) => "ligature::draw_tool",
            LigatureError::Export(_) => "ligature::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            LigatureError::DuplicateId(_) => "every shape, helper and connector needs its own id",
            LigatureError::UnknownShape(_) => {
                "connectors and moves can only reference shapes listed under [[shapes]]"
            }
            LigatureError::Document(_) => {
                "connector ends need a shape (`from`/`to`) or a point (`start`/`end`)"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use ligature::identifier::Id;

    use super::*;

    #[test]
    fn test_codes_and_help() {
        let err = LigatureError::UnknownShape(Id::new("adapter-missing"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.to_string(), "Unknown shape `adapter-missing`");
        assert_eq!(
            adapter.code().map(|c| c.to_string()),
            Some("ligature::unknown_shape".to_string())
        );
        assert!(adapter.help().is_some());
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = LigatureError::Io(std::io::Error::other("disk full"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.to_string(), "I/O error: disk full");
        assert!(adapter.help().is_none());
        assert!(std::error::Error::source(&adapter).is_some());
    }
}

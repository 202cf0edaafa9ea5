//! Error types for Ligature operations.
//!
//! This module provides the main error type [`LigatureError`] which wraps
//! the error conditions that can occur while building scenes, creating
//! connectors and driving the draw tool.
//!
//! Routing itself never fails: routers always return best-effort geometry,
//! and connector sync treats dangling bindings as a silent no-op.

use std::io;

use thiserror::Error;

use ligature_core::identifier::Id;

use crate::tool::DrawToolError;

/// The main error type for Ligature operations.
#[derive(Debug, Error)]
pub enum LigatureError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// An explicit object id is already used in the scene.
    #[error("Object id `{0}` is already used in the scene")]
    DuplicateId(Id),

    /// A scene document references a shape that does not exist.
    #[error("Unknown shape `{0}`")]
    UnknownShape(Id),

    #[error("Invalid scene document: {0}")]
    Document(String),

    #[error("Draw tool error: {0}")]
    DrawTool(#[from] DrawToolError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for LigatureError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

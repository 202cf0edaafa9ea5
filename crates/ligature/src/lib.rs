//! Ligature - Shape-bound connectors for diagram editors
//!
//! This library connects shapes with routed lines and keeps those lines
//! attached while the shapes move. It provides connector creation with
//! straight, curved and obstacle-avoiding orthogonal routing, connector
//! sync, an interactive orthogonal draw tool, scene documents and SVG export.

pub mod config;
pub mod connector;
pub mod document;
pub mod export;
pub mod scene;
pub mod sync;
pub mod tool;

mod error;

pub use ligature_core::{color, geometry, identifier, marker, port, route, shape, stroke};

pub use error::LigatureError;

use std::path::Path;

use log::{debug, info};

use config::AppConfig;
use document::SceneDocument;
use export::Exporter;
use scene::Scene;

/// Builder for turning scene documents into routed scenes and SVG.
///
/// # Examples
///
/// ```
/// use ligature::{SceneBuilder, config::AppConfig};
///
/// let source = r#"
///     [[shapes]]
///     id = "a"
///     left = 0
///     top = 0
///     width = 80
///     height = 40
///
///     [[shapes]]
///     id = "b"
///     left = 200
///     top = 0
///     width = 80
///     height = 40
///
///     [[connectors]]
///     from = "a"
///     to = "b"
/// "#;
///
/// let builder = SceneBuilder::new(AppConfig::default());
/// let document = builder.parse(source).unwrap();
/// let scene = builder.build(&document, true).unwrap();
/// let svg = builder.render_svg(&scene).unwrap();
///
/// assert_eq!(scene.connectors().count(), 1);
/// assert!(svg.contains("<path"));
/// ```
#[derive(Debug, Default)]
pub struct SceneBuilder {
    config: AppConfig,
}

impl SceneBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parses a TOML scene document.
    ///
    /// # Errors
    ///
    /// Returns [`LigatureError::Document`] for malformed documents.
    pub fn parse(&self, source: &str) -> Result<SceneDocument, LigatureError> {
        info!("Parsing scene document");
        let document = SceneDocument::from_toml(source)?;
        debug!(
            shapes = document.shape_count(),
            connectors = document.connector_count();
            "Scene document parsed"
        );
        Ok(document)
    }

    /// Builds the scene, then replays the document's moves when `apply_moves` is set.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while adding objects or applying moves.
    pub fn build(
        &self,
        document: &SceneDocument,
        apply_moves: bool,
    ) -> Result<Scene, LigatureError> {
        let mut scene = document.build_scene(&self.config)?;
        if apply_moves && document.move_count() > 0 {
            let updated = document.apply_moves(&mut scene)?;
            info!(moves = document.move_count(), updated; "Shape moves applied");
        }
        Ok(scene)
    }

    /// Renders a scene to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`LigatureError::Export`] if the style configuration is invalid.
    pub fn render_svg(&self, scene: &Scene) -> Result<String, LigatureError> {
        let svg = export::svg::SvgBuilder::new("")
            .with_style(self.config.style().clone())
            .build()?;
        Ok(svg.render_scene(scene).to_string())
    }

    /// Writes a scene to an SVG file.
    ///
    /// # Errors
    ///
    /// Returns [`LigatureError::Export`] if the style configuration is invalid
    /// or the file cannot be written.
    pub fn write_svg(&self, scene: &Scene, path: impl AsRef<Path>) -> Result<(), LigatureError> {
        let mut svg = export::svg::SvgBuilder::new(path)
            .with_style(self.config.style().clone())
            .build()?;
        svg.export_scene(scene)?;
        Ok(())
    }
}

//! Ligature CLI library
//!
//! This module contains the core CLI logic: load a scene document, route
//! every connector, replay the document's shape moves and write SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use error_adapter::ErrorAdapter;

use std::fs;

use log::info;

use ligature::{LigatureError, SceneBuilder};

/// Run the Ligature CLI application
///
/// # Errors
///
/// Returns `LigatureError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid scene documents
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), LigatureError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scene"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let source = fs::read_to_string(&args.input)?;

    let builder = SceneBuilder::new(app_config);
    let document = builder.parse(&source)?;
    let scene = builder.build(&document, !args.no_moves)?;
    let svg = builder.render_svg(&scene)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

//! Ligature Core Types and Routing
//!
//! This crate provides the scene-independent half of the Ligature connector
//! engine. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, bounds and affine transforms ([`geometry`] module)
//! - **Shapes**: The geometry capability of connectable shapes ([`shape::ShapeGeometry`])
//! - **Ports**: The eight anchor points of a shape ([`port`] module)
//! - **Routing**: Straight, curved and orthogonal path routing ([`route`] module)
//! - **Markers**: Endpoint glyphs and stroke styles ([`marker`], [`stroke`] modules)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod marker;
pub mod port;
pub mod route;
pub mod shape;
pub mod stroke;

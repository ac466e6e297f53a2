//! DrawPad Paint
//!
//! Vector primitives shared by the canvas and its exporters.
//!
//! # Features
//!
//! - SVG path data parsing into lyon paths, arcs and relative commands included
//! - Coordinate formatting for emitted path data
//! - Geometric path length measurement
//! - Colors and linear gradient stop layout

pub mod color;
pub mod gradient;
pub mod measure;
pub mod path;

pub use color::Color;
pub use gradient::{GradientSpec, GradientStop};
pub use measure::{path_length, svg_path_length};
pub use path::{format_number, parse_path, PathParseError, Point};

//! Geometric path length
//!
//! Sums the segment lengths of a lyon path. Quadratics are measured exactly;
//! cubics are flattened within [`DEFAULT_TOLERANCE`].

use crate::path::{parse_path, PathParseError};
use lyon::geom::{CubicBezierSegment, LineSegment, QuadraticBezierSegment};
use lyon::path::{Path, PathEvent};

/// Maximum deviation allowed when flattening curves for measurement
pub const DEFAULT_TOLERANCE: f32 = 0.01;

/// Total length of every segment in `path`
pub fn path_length(path: &Path) -> f32 {
    path_length_with_tolerance(path, DEFAULT_TOLERANCE)
}

pub fn path_length_with_tolerance(path: &Path, tolerance: f32) -> f32 {
    path.iter()
        .map(|event| event_length(&event, tolerance))
        .sum()
}

/// Parse SVG path data and measure it
pub fn svg_path_length(data: &str) -> Result<f32, PathParseError> {
    let path = parse_path(data)?;
    Ok(path_length(&path))
}

fn event_length(event: &PathEvent, tolerance: f32) -> f32 {
    match *event {
        PathEvent::Begin { .. } => 0.0,
        PathEvent::Line { from, to } => LineSegment { from, to }.length(),
        PathEvent::Quadratic { from, ctrl, to } => {
            QuadraticBezierSegment { from, ctrl, to }.length()
        }
        PathEvent::Cubic {
            from,
            ctrl1,
            ctrl2,
            to,
        } => CubicBezierSegment {
            from,
            ctrl1,
            ctrl2,
            to,
        }
        .approximate_length(tolerance),
        PathEvent::End { last, first, close } => {
            if close {
                LineSegment {
                    from: last,
                    to: first,
                }
                .length()
            } else {
                0.0
            }
        }
    }
}

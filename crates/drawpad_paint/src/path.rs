//! Points, SVG path data parsing, and coordinate formatting

use lyon::extra::parser::{ParserOptions, PathParser, Source};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Path data that could not be parsed
#[derive(Clone, Debug, PartialEq, Error)]
#[error("invalid path data: {message}")]
pub struct PathParseError {
    pub message: String,
}

/// Parse SVG path data into a lyon path.
///
/// Every SVG command is accepted, absolute or relative. Arcs become
/// quadratic segments; smooth curves get their reflected control points.
pub fn parse_path(data: &str) -> Result<lyon::path::Path, PathParseError> {
    let mut builder = lyon::path::Path::builder_with_attributes(0);
    let mut source = Source::new(data.chars());
    PathParser::new()
        .parse(&ParserOptions::DEFAULT, &mut source, &mut builder)
        .map_err(|err| {
            let message = format!("{err:?}");
            tracing::debug!(%message, "rejected path data");
            PathParseError { message }
        })?;
    Ok(builder.build())
}

/// Format a coordinate the way path data expects: shortest round-trip form,
/// no trailing `.0`, and never `-0` or `NaN`.
pub fn format_number(value: f32) -> String {
    Num(value).to_string()
}

struct Num(f32);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 || !self.0.is_finite() {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::path::PathEvent;

    fn count_curves(path: &lyon::path::Path) -> usize {
        path.iter()
            .filter(|event| {
                matches!(
                    event,
                    PathEvent::Quadratic { .. } | PathEvent::Cubic { .. }
                )
            })
            .count()
    }

    #[test]
    fn formats_integral_and_fractional_values() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(3.25), "3.25");
    }

    #[test]
    fn negative_zero_and_nan_print_as_zero() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f32::NAN), "0");
    }

    #[test]
    fn parses_recorder_output() {
        let path = parse_path("M 0 0 Q 0 0 5 0 Q 10 0 12.5 2.5").unwrap();
        assert_eq!(count_curves(&path), 2);
    }

    #[test]
    fn relative_and_implicit_commands_resolve_to_absolute() {
        let path = parse_path("m10,10 5,0 v5 h-5 z").unwrap();
        let lines: Vec<(f32, f32)> = path
            .iter()
            .filter_map(|event| match event {
                PathEvent::Line { to, .. } => Some((to.x, to.y)),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec![(15.0, 10.0), (15.0, 15.0), (10.0, 15.0)]);
        assert!(path
            .iter()
            .any(|event| matches!(event, PathEvent::End { close: true, .. })));
    }

    #[test]
    fn arcs_become_curves() {
        let path = parse_path("M 0 0 A 5 5 0 0 1 10 0").unwrap();
        assert!(count_curves(&path) > 0);
        let end = path.iter().find_map(|event| match event {
            PathEvent::End { last, .. } => Some(last),
            _ => None,
        });
        let end = end.unwrap();
        assert!((end.x - 10.0).abs() < 1e-3 && end.y.abs() < 1e-3);
    }

    #[test]
    fn malformed_data_is_rejected() {
        assert!(parse_path("M 0").is_err());
        assert!(parse_path("M 0 0 X 4 4").is_err());
        let err = parse_path("M 0 0 L x").unwrap_err();
        assert!(err.to_string().starts_with("invalid path data"));
    }
}

//! Linear gradient stroke paint

use crate::color::Color;
use crate::path::Point;
use serde::{Deserialize, Serialize};

/// A resolved gradient stop
#[derive(Clone, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, 0.0 to 1.0
    pub offset: f64,
    /// CSS color as given by the caller
    pub color: String,
}

impl GradientStop {
    /// Parsed color, when the CSS string is one [`Color::parse`] understands
    pub fn rgba(&self) -> Option<Color> {
        Color::parse(&self.color)
    }
}

/// Horizontal-by-default linear gradient applied to every stroke
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    /// Stop colors in order
    pub colors: Vec<String>,
    /// Explicit stop offsets; missing entries are spaced evenly
    #[serde(default)]
    pub locations: Option<Vec<f64>>,
    /// Gradient start in fractions of the canvas (default `0,0`)
    #[serde(default)]
    pub start: Option<Point>,
    /// Gradient end in fractions of the canvas (default `1,0`)
    #[serde(default)]
    pub end: Option<Point>,
}

impl GradientSpec {
    pub fn new<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            colors: colors.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_locations(mut self, locations: Vec<f64>) -> Self {
        self.locations = Some(locations);
        self
    }

    pub fn with_direction(mut self, start: Point, end: Point) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Offset of the `index`-th stop
    pub fn offset_at(&self, index: usize) -> f64 {
        if let Some(offset) = self.locations.as_ref().and_then(|l| l.get(index)) {
            return *offset;
        }
        let count = self.colors.len();
        if count <= 1 {
            0.0
        } else {
            index as f64 / (count - 1) as f64
        }
    }

    /// Stops in input order
    pub fn stops(&self) -> Vec<GradientStop> {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, color)| GradientStop {
                offset: self.offset_at(i),
                color: color.clone(),
            })
            .collect()
    }

    pub fn start_point(&self) -> Point {
        self.start.unwrap_or(Point::ZERO)
    }

    pub fn end_point(&self) -> Point {
        self.end.unwrap_or(Point::new(1.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evenly_spaced_without_locations() {
        let gradient = GradientSpec::new(["red", "green", "blue"]);
        let offsets: Vec<f64> = gradient.stops().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn explicit_locations_win_and_missing_fall_back() {
        let gradient = GradientSpec::new(["red", "green", "blue"]).with_locations(vec![0.2, 0.3]);
        let offsets: Vec<f64> = gradient.stops().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.2, 0.3, 1.0]);
    }

    #[test]
    fn single_color_sits_at_zero() {
        let gradient = GradientSpec::new(["#123456"]);
        assert_eq!(gradient.stops()[0].offset, 0.0);
        assert!(gradient.stops()[0].rgba().is_some());
    }

    #[test]
    fn default_direction_is_horizontal() {
        let gradient = GradientSpec::new(["red", "blue"]);
        assert_eq!(gradient.start_point(), Point::ZERO);
        assert_eq!(gradient.end_point(), Point::new(1.0, 0.0));
    }
}

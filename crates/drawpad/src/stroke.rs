//! Committed strokes and their cached lengths

use drawpad_paint::{svg_path_length, PathParseError};

/// One committed stroke: SVG path data and its measured length
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    data: String,
    length: f32,
}

impl Stroke {
    /// Create a stroke, measuring it once.
    ///
    /// Data that does not parse is kept verbatim and measured as zero.
    pub fn new(data: impl Into<String>) -> Self {
        let data = data.into();
        let length = match svg_path_length(&data) {
            Ok(length) => length,
            Err(err) => {
                tracing::warn!("unmeasurable stroke {:?}: {}", data, err);
                0.0
            }
        };
        Self { data, length }
    }

    /// Create a stroke, rejecting data that does not parse
    pub fn parse(data: impl Into<String>) -> Result<Self, PathParseError> {
        let data = data.into();
        let length = svg_path_length(&data)?;
        Ok(Self { data, length })
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn length(&self) -> f32 {
        self.length
    }
}

/// Ordered list of committed strokes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeList {
    strokes: Vec<Stroke>,
}

impl StrokeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn pop(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn replace(&mut self, strokes: Vec<Stroke>) {
        self.strokes = strokes;
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }

    pub fn paths(&self) -> Vec<String> {
        self.strokes.iter().map(|s| s.data.clone()).collect()
    }

    /// Sum of stroke lengths
    pub fn total_length(&self) -> f32 {
        self.strokes.iter().map(Stroke::length).sum()
    }

    /// Each stroke paired with the summed length of the strokes before it
    pub fn with_preceding_length(&self) -> impl Iterator<Item = (f32, &Stroke)> + '_ {
        self.strokes.iter().scan(0.0_f32, |acc, stroke| {
            let preceding = *acc;
            *acc += stroke.length;
            Some((preceding, stroke))
        })
    }
}

impl FromIterator<Stroke> for StrokeList {
    fn from_iter<I: IntoIterator<Item = Stroke>>(iter: I) -> Self {
        Self {
            strokes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a StrokeList {
    type Item = &'a Stroke;
    type IntoIter = std::slice::Iter<'a, Stroke>;

    fn into_iter(self) -> Self::IntoIter {
        self.strokes.iter()
    }
}

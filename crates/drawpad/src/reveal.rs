//! Stroke-by-stroke reveal
//!
//! Playback position `p` in [0, 1] spans the whole drawing. Each stroke owns
//! the slice `[prev / total, (prev + len) / total]` of that range and draws
//! itself in by animating its dash offset from `len` down to zero across it.

use crate::stroke::{Stroke, StrokeList};
use crate::style::StyleConfig;
use drawpad_animation::{interpolate, Extrapolation};
use smallvec::{smallvec, SmallVec};

/// Added to each measured length for the dash array, so the single dash
/// covers round caps at the stroke end
pub const PATH_LENGTH_ADJUSTMENT: f32 = 1.0;

/// How one stroke should be drawn at the current playback position
#[derive(Clone, Debug, PartialEq)]
pub struct RevealFrame {
    pub dash_array: SmallVec<[f32; 2]>,
    /// `None` for brushes with a static dash pattern
    pub dash_offset: Option<f32>,
    pub opacity: f32,
}

impl RevealFrame {
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Reveal computation for one playback position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeReveal {
    total: f32,
    position: f32,
}

impl StrokeReveal {
    /// `total` is the summed length of all strokes
    pub fn new(total: f32, position: f32) -> Self {
        Self { total, position }
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Frame for a solid stroke of `length` preceded by `preceding` units of
    /// drawing
    pub fn frame(&self, preceding: f32, length: f32) -> RevealFrame {
        let len = length + PATH_LENGTH_ADJUSTMENT;
        let dash_array = smallvec![len];

        if !(self.total.is_finite() && self.total > 0.0) {
            return RevealFrame {
                dash_array,
                dash_offset: Some(0.0),
                opacity: 1.0,
            };
        }

        let p = self.position;
        let start = preceding / self.total;
        let end = (preceding + len) / self.total;
        let turn = interpolate(p, [start, end], [0.0, 1.0], Extrapolation::Clamp);
        let offset =
            interpolate(turn, [0.0, 1.0], [len, 0.0], Extrapolation::Extend) - PATH_LENGTH_ADJUSTMENT;
        let opacity = if p >= start && p > 0.0 { 1.0 } else { 0.0 };

        RevealFrame {
            dash_array,
            dash_offset: Some(offset),
            opacity,
        }
    }

    /// Frame for a stroke drawn with a static dash pattern
    pub fn patterned(pattern: [f32; 2]) -> RevealFrame {
        RevealFrame {
            dash_array: SmallVec::from_buf(pattern),
            dash_offset: None,
            opacity: 1.0,
        }
    }

    /// Frames for every stroke, in drawing order
    pub fn frames(&self, strokes: &StrokeList, style: &StyleConfig) -> Vec<RevealFrame> {
        match style.dash_pattern() {
            Some(pattern) => strokes.iter().map(|_| Self::patterned(pattern)).collect(),
            None => strokes
                .with_preceding_length()
                .map(|(preceding, stroke): (f32, &Stroke)| self.frame(preceding, stroke.length()))
                .collect(),
        }
    }
}

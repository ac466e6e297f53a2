//! Stroke styling shared by every committed stroke and the live stroke

use drawpad_paint::{format_number, Color, GradientSpec};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

/// Element id of the gradient definition strokes refer to
pub const GRADIENT_ID: &str = "strokeGradient";

/// Extra per-stroke attributes, keyed camelCase or kebab-case
pub type PathProps = IndexMap<String, String>;

/// Named brush preset: dash pattern and opacity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushType {
    #[default]
    Solid,
    Dotted,
    Dashed,
    Highlighter,
}

impl BrushType {
    /// Repeating dash pattern for decorative brushes
    pub fn dash_pattern(self, stroke_width: f32) -> Option<[f32; 2]> {
        match self {
            BrushType::Dotted => Some([1.0, stroke_width * 2.0]),
            BrushType::Dashed => Some([stroke_width * 4.0, stroke_width * 2.0]),
            BrushType::Solid | BrushType::Highlighter => None,
        }
    }

    pub fn stroke_opacity(self) -> f32 {
        match self {
            BrushType::Highlighter => 0.3,
            _ => 1.0,
        }
    }
}

/// Resolved stroke paint
#[derive(Clone, Debug, PartialEq)]
pub enum StrokePaint {
    /// A CSS color; `rgba` is set when the string is one we can parse
    Solid { css: String, rgba: Option<Color> },
    Gradient(GradientSpec),
}

/// Everything a renderer needs to draw strokes, resolved from [`StyleConfig`]
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeAppearance {
    pub stroke_width: f32,
    pub paint: StrokePaint,
    pub stroke_opacity: f32,
    /// Opacity of the faint underlay drawn beneath each committed stroke
    pub ghost_opacity: f32,
    pub dash_pattern: Option<[f32; 2]>,
}

/// Style applied uniformly to all strokes
#[derive(Clone, Debug, PartialEq)]
pub struct StyleConfig {
    pub stroke_width: f32,
    pub stroke: String,
    pub brush: BrushType,
    pub path_props: PathProps,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            stroke_width: 3.5,
            stroke: "grey".to_string(),
            brush: BrushType::Solid,
            path_props: PathProps::new(),
        }
    }
}

/// Ghost underlay opacity relative to the brush opacity
const GHOST_OPACITY_FACTOR: f32 = 0.2;

impl StyleConfig {
    pub fn stroke_opacity(&self) -> f32 {
        self.brush.stroke_opacity()
    }

    pub fn dash_pattern(&self) -> Option<[f32; 2]> {
        self.brush.dash_pattern(self.stroke_width)
    }

    /// `stroke` attribute value: the color, or a reference to the gradient
    pub fn stroke_paint(&self, gradient: bool) -> String {
        if gradient {
            format!("url(#{GRADIENT_ID})")
        } else {
            self.stroke.clone()
        }
    }

    /// `stroke-dasharray` attribute value
    pub fn dash_array_attr(&self) -> String {
        match self.dash_pattern() {
            Some([dash, gap]) => format!("{},{}", format_number(dash), format_number(gap)),
            None => "0".to_string(),
        }
    }

    pub fn appearance(&self, gradient: Option<&GradientSpec>) -> StrokeAppearance {
        let paint = match gradient {
            Some(gradient) => StrokePaint::Gradient(gradient.clone()),
            None => StrokePaint::Solid {
                css: self.stroke.clone(),
                rgba: Color::parse(&self.stroke),
            },
        };
        StrokeAppearance {
            stroke_width: self.stroke_width,
            paint,
            stroke_opacity: self.stroke_opacity(),
            ghost_opacity: self.stroke_opacity() * GHOST_OPACITY_FACTOR,
            dash_pattern: self.dash_pattern(),
        }
    }

    /// Path element attributes in output order, kebab-case keys.
    ///
    /// User props come first in insertion order. Fixed and brush-derived
    /// attributes follow; a user key that collides with one of them keeps its
    /// position but takes the widget's value.
    pub fn attributes(&self, gradient: bool) -> Vec<(String, String)> {
        let mut attrs: IndexMap<String, String> = self
            .path_props
            .iter()
            .map(|(key, value)| (kebab_case(key), value.clone()))
            .collect();

        let fixed: SmallVec<[(&str, String); 7]> = smallvec![
            ("fill", "none".to_string()),
            ("stroke-linecap", "round".to_string()),
            ("stroke-linejoin", "round".to_string()),
            ("stroke-width", format_number(self.stroke_width)),
            ("stroke", self.stroke_paint(gradient)),
            ("stroke-opacity", format_number(self.stroke_opacity())),
            ("stroke-dasharray", self.dash_array_attr()),
        ];
        for (key, value) in fixed {
            attrs.insert(key.to_string(), value);
        }

        attrs.into_iter().collect()
    }
}

/// `strokeLinecap` -> `stroke-linecap`; already kebab keys pass through
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

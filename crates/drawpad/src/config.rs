//! DrawPad configuration (drawpad.toml)

use crate::error::Result;
use crate::recorder::CurveMode;
use crate::style::{BrushType, PathProps, StyleConfig};
use drawpad_animation::Easing;
use drawpad_paint::GradientSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Widget configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DrawPadConfig {
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    /// CSS stroke color, ignored when `gradient` is set
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default)]
    pub brush: BrushType,
    #[serde(default)]
    pub curve: CurveMode,
    /// Fixed playback duration; defaults to twice the drawing length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_duration_ms: Option<f32>,
    #[serde(default)]
    pub easing: EasingSetting,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<GradientSpec>,
    /// Extra attributes for every exported path
    #[serde(default)]
    pub path_props: PathProps,
}

fn default_stroke_width() -> f32 {
    3.5
}

fn default_stroke() -> String {
    "grey".to_string()
}

impl Default for DrawPadConfig {
    fn default() -> Self {
        Self {
            stroke_width: default_stroke_width(),
            stroke: default_stroke(),
            brush: BrushType::default(),
            curve: CurveMode::default(),
            animation_duration_ms: None,
            easing: EasingSetting::default(),
            gradient: None,
            path_props: PathProps::new(),
        }
    }
}

/// Playback easing as written in configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingSetting {
    /// `cubic-bezier(0.4, 0, 0.5, 1)`
    #[default]
    Draw,
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicBezier([f32; 4]),
}

impl EasingSetting {
    pub fn to_easing(self) -> Easing {
        match self {
            EasingSetting::Draw => Easing::DRAW,
            EasingSetting::Linear => Easing::Linear,
            EasingSetting::EaseIn => Easing::EaseIn,
            EasingSetting::EaseOut => Easing::EaseOut,
            EasingSetting::EaseInOut => Easing::EaseInOut,
            EasingSetting::CubicBezier([x1, y1, x2, y2]) => Easing::bezier(x1, y1, x2, y2),
        }
    }
}

impl DrawPadConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Stroke styling portion of the configuration
    pub fn style(&self) -> StyleConfig {
        StyleConfig {
            stroke_width: self.stroke_width,
            stroke: self.stroke.clone(),
            brush: self.brush,
            path_props: self.path_props.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = DrawPadConfig::from_toml_str("").unwrap();
        assert_eq!(config, DrawPadConfig::default());
        assert_eq!(config.stroke_width, 3.5);
        assert_eq!(config.stroke, "grey");
        assert_eq!(config.curve, CurveMode::Linear);
        assert_eq!(config.easing, EasingSetting::Draw);
    }

    #[test]
    fn parses_full_config() {
        let config = DrawPadConfig::from_toml_str(
            r##"
            stroke_width = 2.0
            brush = "highlighter"
            curve = "smooth"
            animation_duration_ms = 1500.0
            easing = { cubic-bezier = [0.1, 0.2, 0.3, 0.4] }

            [gradient]
            colors = ["red", "#00ff00", "blue"]
            locations = [0.0, 0.4, 1.0]

            [path_props]
            strokeMiterlimit = "4"
            "##,
        )
        .unwrap();

        assert_eq!(config.stroke_width, 2.0);
        assert_eq!(config.brush, BrushType::Highlighter);
        assert_eq!(config.curve, CurveMode::Smooth);
        assert_eq!(config.animation_duration_ms, Some(1500.0));
        assert_eq!(config.easing, EasingSetting::CubicBezier([0.1, 0.2, 0.3, 0.4]));
        let gradient = config.gradient.as_ref().unwrap();
        assert_eq!(gradient.colors.len(), 3);
        assert_eq!(config.style().path_props.get("strokeMiterlimit").map(String::as_str), Some("4"));
    }

    #[test]
    fn rejects_unknown_brush() {
        let err = DrawPadConfig::from_toml_str("brush = \"crayon\"").unwrap_err();
        assert!(matches!(err, crate::DrawPadError::ConfigParse(_)));
    }

    #[test]
    fn default_round_trips_through_toml() {
        let config = DrawPadConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(DrawPadConfig::from_toml_str(&text).unwrap(), config);
    }
}

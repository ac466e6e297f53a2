//! DrawPad
//!
//! A signature/annotation canvas widget. Pointer input is recorded as SVG path
//! strokes; the drawing can be undone, erased, replayed stroke by stroke, and
//! exported as a standalone SVG document.
//!
//! ```rust
//! use drawpad::{DrawPad, DrawPadConfig};
//!
//! let mut pad = DrawPad::new(DrawPadConfig::default());
//! pad.pan_start(0.0, 0.0);
//! pad.pan_update(10.0, 0.0);
//! pad.pan_end();
//!
//! assert_eq!(pad.get_paths(), vec!["M 0 0 L 10 0".to_string()]);
//! assert_eq!(pad.total_length(), 10.0);
//!
//! pad.undo();
//! assert!(pad.get_paths().is_empty());
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod pad;
pub mod playback;
pub mod recorder;
pub mod reveal;
pub mod stroke;
pub mod style;

pub use config::{DrawPadConfig, EasingSetting};
pub use error::{DrawPadError, Result};
pub use export::export;
pub use pad::{DrawCallback, DrawPad, DrawPadOptions, RenderStroke};
pub use playback::{Playback, PlaybackEvent, PlaybackSignals, PlaybackState};
pub use recorder::{CurveMode, PathRecorder};
pub use reveal::{RevealFrame, StrokeReveal, PATH_LENGTH_ADJUSTMENT};
pub use stroke::{Stroke, StrokeList};
pub use style::{BrushType, PathProps, StrokeAppearance, StrokePaint, StyleConfig, GRADIENT_ID};

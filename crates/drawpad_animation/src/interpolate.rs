//! Range remapping

/// How [`interpolate`] treats inputs outside the input range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Extrapolation {
    /// Continue the linear mapping past the range
    #[default]
    Extend,
    /// Pin to the nearest output bound
    Clamp,
}

/// Map `value` from `input` to `output` linearly.
///
/// A degenerate input range maps to `output[1]` at or past its end and to
/// `output[0]` before it, so no NaN ever escapes.
pub fn interpolate(value: f32, input: [f32; 2], output: [f32; 2], extrapolation: Extrapolation) -> f32 {
    let [in_start, in_end] = input;
    let [out_start, out_end] = output;

    let span = in_end - in_start;
    if !span.is_finite() || span.abs() < f32::EPSILON {
        return if value >= in_end { out_end } else { out_start };
    }

    let mut t = (value - in_start) / span;
    if extrapolation == Extrapolation::Clamp {
        t = t.clamp(0.0, 1.0);
    }
    out_start + (out_end - out_start) * t
}

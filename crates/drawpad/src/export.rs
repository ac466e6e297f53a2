//! Standalone SVG export

use crate::style::{StyleConfig, GRADIENT_ID};
use drawpad_paint::{format_number, GradientSpec};
use std::fmt::Write;

/// Serialize strokes into an SVG document.
///
/// Output depends only on the arguments. No strokes still yields a
/// well-formed, empty document.
pub fn export<S: AsRef<str>>(
    paths: &[S],
    style: &StyleConfig,
    gradient: Option<&GradientSpec>,
) -> String {
    let mut svg = String::new();
    svg.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100%\" height=\"100%\">\n");

    if let Some(gradient) = gradient {
        write_gradient_def(&mut svg, gradient);
    }

    let attrs: String = style
        .attributes(gradient.is_some())
        .iter()
        .map(|(key, value)| format!(" {}=\"{}\"", key, escape_attr(value)))
        .collect();

    for path in paths {
        let _ = writeln!(svg, "<path d=\"{}\"{} />", escape_attr(path.as_ref()), attrs);
    }

    svg.push_str("</svg>\n");
    svg
}

fn write_gradient_def(svg: &mut String, gradient: &GradientSpec) {
    let start = gradient.start_point();
    let end = gradient.end_point();
    svg.push_str("<defs>\n");
    let _ = writeln!(
        svg,
        "<linearGradient id=\"{}\" x1=\"{}%\" y1=\"{}%\" x2=\"{}%\" y2=\"{}%\">",
        GRADIENT_ID,
        format_number(start.x * 100.0),
        format_number(start.y * 100.0),
        format_number(end.x * 100.0),
        format_number(end.y * 100.0),
    );
    for stop in gradient.stops() {
        let _ = writeln!(
            svg,
            "<stop offset=\"{}\" stop-color=\"{}\" />",
            stop.offset,
            escape_attr(&stop.color)
        );
    }
    svg.push_str("</linearGradient>\n</defs>\n");
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::BrushType;

    #[test]
    fn empty_document() {
        let svg = export::<&str>(&[], &StyleConfig::default(), None);
        assert_eq!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100%\" height=\"100%\">\n</svg>\n"
        );
    }

    #[test]
    fn one_path_per_stroke() {
        let svg = export(&["M 0 0 L 10 0", "M 5 5 L 6 6"], &StyleConfig::default(), None);
        assert_eq!(svg.matches("<path ").count(), 2);
        assert!(svg.contains(
            "<path d=\"M 0 0 L 10 0\" fill=\"none\" stroke-linecap=\"round\" \
             stroke-linejoin=\"round\" stroke-width=\"3.5\" stroke=\"grey\" \
             stroke-opacity=\"1\" stroke-dasharray=\"0\" />"
        ));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn gradient_stops_and_reference() {
        let gradient = GradientSpec::new(["red", "green", "blue"]);
        let svg = export(&["M 0 0 L 1 1"], &StyleConfig::default(), Some(&gradient));
        assert!(svg.contains(
            "<linearGradient id=\"strokeGradient\" x1=\"0%\" y1=\"0%\" x2=\"100%\" y2=\"0%\">"
        ));
        assert!(svg.contains("<stop offset=\"0\" stop-color=\"red\" />"));
        assert!(svg.contains("<stop offset=\"0.5\" stop-color=\"green\" />"));
        assert!(svg.contains("<stop offset=\"1\" stop-color=\"blue\" />"));
        assert!(svg.contains("stroke=\"url(#strokeGradient)\""));
    }

    #[test]
    fn highlighter_and_escaping() {
        let mut style = StyleConfig {
            brush: BrushType::Highlighter,
            ..Default::default()
        };
        style.path_props.insert("dataLabel".into(), "a\"b".into());
        let svg = export(&["M 0 0"], &style, None);
        assert!(svg.contains("data-label=\"a&quot;b\""));
        assert!(svg.contains("stroke-opacity=\"0.3\""));
    }
}

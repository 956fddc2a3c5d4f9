use std::fmt::Write;

use crate::diagram::ChartData;
use crate::layout::{Geometry, Shape};

/// Render every shape in placement order as one markup string.
///
/// Tooltip lines inside `<title>` are separated by `\n` on every platform;
/// `\r\n` is never emitted.
pub fn render(geometry: &Geometry) -> String {
    let mut svg = String::new();
    for shape in &geometry.shapes {
        match shape {
            Shape::Circle {
                center,
                radius,
                fill,
                label,
                tooltip,
            } => {
                let _ = write!(
                    svg,
                    "<g style=\"fill:{}\" transform=\"translate({},{})\">\
                     <title>{}\n\nFile size (bytes): {}\n# of commits: {}</title>\
                     <circle r=\"{}\" />\
                     <text style=\"fill:black\" font-size=\"6\" alignment-baseline=\"middle\" \
                     text-anchor=\"middle\" >{}</text>\
                     </g>",
                    escape_xml(fill),
                    center.x,
                    center.y,
                    escape_xml(&tooltip.path),
                    tooltip.size,
                    tooltip.commit_count,
                    radius,
                    escape_xml(label),
                );
            }
            Shape::Rectangle {
                origin,
                width,
                height,
                label,
                ..
            } => {
                let _ = write!(
                    svg,
                    "<g transform=\"translate({},{})\">\
                     <rect fill=\"none\" stroke-width=\"0.5\" stroke=\"black\" width=\"{}\" \
                     height=\"{}\" />\
                     <text style=\"fill:black\" font-size=\"6\" transform=\"translate(-1,-1)\" \
                     >{}</text>\
                     </g>",
                    origin.x,
                    origin.y,
                    width,
                    height,
                    escape_xml(label),
                );
            }
        }
    }
    svg
}

/// Wrap chart data in a standalone `<svg>` element sized to the canvas
pub fn document(chart: &ChartData) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">{}</svg>",
        chart.data,
        width = chart.size.width,
        height = chart.size.height,
    )
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

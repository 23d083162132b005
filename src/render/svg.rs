use serde::{Deserialize, Serialize};

use crate::api::{AxisDescriptor, TickRenderRecord, shortest_decimal};

/// Placement of the serialized axis group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgAxisOptions {
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for SvgAxisOptions {
    fn default() -> Self {
        Self {
            translate_x: 50.0,
            translate_y: 50.0,
        }
    }
}

impl SvgAxisOptions {
    #[must_use]
    pub fn with_translate(mut self, x: f64, y: f64) -> Self {
        self.translate_x = x;
        self.translate_y = y;
        self
    }
}

/// Serializes an axis as a single SVG `<g>` element.
///
/// Output is byte-stable for equal inputs: attribute order is fixed and
/// numbers use their shortest decimal form.
#[must_use]
pub fn axis_to_svg(axis: &AxisDescriptor, options: &SvgAxisOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        r#"<g transform="translate({},{})">"#,
        shortest_decimal(options.translate_x),
        shortest_decimal(options.translate_y)
    ));
    out.push_str(&format!(
        r#"<path class="domain" stroke="currentColor" d="{}"></path>"#,
        escape_xml(&axis.domain_path)
    ));
    let horizontal = axis.orientation.is_horizontal();
    for tick in &axis.ticks {
        write_tick(&mut out, tick, horizontal);
    }
    out.push_str("</g>");
    out
}

fn write_tick(out: &mut String, tick: &TickRenderRecord, horizontal: bool) {
    let (cross, cross_end) = if horizontal { ("y", "y2") } else { ("x", "x2") };
    out.push_str(&format!(
        r#"<g class="tick" transform="{}">"#,
        escape_xml(&tick.transform)
    ));
    out.push_str(&format!(
        r#"<line stroke="currentColor" {cross_end}="{}"></line>"#,
        shortest_decimal(tick.mark_length)
    ));
    out.push_str(&format!(
        r#"<text fill="currentColor" {cross}="{}" dy="{}" text-anchor="{}">"#,
        shortest_decimal(tick.text_offset),
        escape_xml(&tick.dy),
        escape_xml(&tick.text_anchor)
    ));
    out.push_str(&escape_xml(&tick.label));
    out.push_str("</text></g>");
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

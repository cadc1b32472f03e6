use std::f64::consts::PI;

use log::warn;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::interaction::HOVER_MARGIN;
use super::state::MindMapState;
use super::types::Node;

const LINK_STROKE: &str = "rgba(255,255,255,0.06)";
const SHADOW_FILL: &str = "rgba(2,6,23,0.6)";
const TEXT_FILL: &str = "#02121a";
const HOVER_STROKE: &str = "rgba(255,255,255,0.14)";
const FONT: &str = "600 14px Inter, system-ui, Arial";
const LINE_HEIGHT: f64 = 16.0;
const MAX_LINES: usize = 3;
/// Label lines may be this many radii wide.
const TEXT_WIDTH_RATIO: f64 = 1.6;

/// Greedy word wrap. A single word wider than `max_width` gets a line of its
/// own; anything past [`MAX_LINES`] is dropped.
pub fn wrap_lines(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
	let mut lines = Vec::new();
	let mut current = String::new();
	for word in text.split_whitespace() {
		let candidate = if current.is_empty() {
			word.to_string()
		} else {
			format!("{current} {word}")
		};
		if measure(&candidate) > max_width && !current.is_empty() {
			lines.push(std::mem::replace(&mut current, word.to_string()));
		} else {
			current = candidate;
		}
	}
	if !current.is_empty() {
		lines.push(current);
	}
	lines.truncate(MAX_LINES);
	lines
}

/// Ratios that are not positive and finite count as 1.
fn pixel_ratio(dpr: f64) -> f64 {
	if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 }
}

/// Backing-store size for `css` pixels at device pixel ratio `dpr`.
pub fn device_pixels(css: f64, dpr: f64) -> u32 {
	(css.max(0.0) * pixel_ratio(dpr)).round() as u32
}

/// Sizes the backing store in device pixels while the element and all
/// drawing stay in CSS pixels.
pub fn fit_canvas(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, width: f64, height: f64, dpr: f64) {
	canvas.set_width(device_pixels(width, dpr));
	canvas.set_height(device_pixels(height, dpr));
	let style = canvas.style();
	let _ = style.set_property("width", &format!("{width}px"));
	let _ = style.set_property("height", &format!("{height}px"));

	let scale = pixel_ratio(dpr);
	if let Err(e) = ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0) {
		warn!("could not scale canvas: {e:?}");
	}
}

pub fn render(state: &MindMapState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.bounds.width, state.bounds.height);
	draw_links(state, ctx);
	for node in &state.graph.nodes {
		draw_node(node, ctx);
	}
	if let Some(node) = state.hovered_node() {
		ctx.begin_path();
		ctx.set_line_width(3.0);
		ctx.set_stroke_style_str(HOVER_STROKE);
		let _ = ctx.arc(node.x, node.y, node.radius() + HOVER_MARGIN, 0.0, 2.0 * PI);
		ctx.stroke();
	}
}

fn draw_links(state: &MindMapState, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(2.0);
	ctx.set_stroke_style_str(LINK_STROKE);
	for (a, b) in state.graph.resolved_links() {
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
}

fn draw_node(node: &Node, ctx: &CanvasRenderingContext2d) {
	let (x, y, r) = (node.x, node.y, node.radius());

	ctx.begin_path();
	ctx.set_fill_style_str(SHADOW_FILL);
	let _ = ctx.arc(x + 2.0, y + 6.0, r + 8.0, 0.0, 2.0 * PI);
	ctx.fill();

	ctx.begin_path();
	ctx.set_fill_style_str(node.color());
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.fill();

	ctx.set_fill_style_str(TEXT_FILL);
	ctx.set_font(FONT);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let lines = wrap_lines(node.text(), r * TEXT_WIDTH_RATIO, |s| {
		ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0)
	});
	let start_y = y - (lines.len() as f64 - 1.0) * (LINE_HEIGHT / 2.0);
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x, start_y + i as f64 * LINE_HEIGHT);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// 10 px per character
	fn mono(s: &str) -> f64 {
		s.chars().count() as f64 * 10.0
	}

	#[test]
	fn short_text_stays_on_one_line() {
		assert_eq!(wrap_lines("Ocean Lab", 100.0, mono), vec!["Ocean Lab"]);
	}

	#[test]
	fn wraps_at_width() {
		assert_eq!(
			wrap_lines("plan the ocean trip", 100.0, mono),
			vec!["plan the", "ocean trip"]
		);
	}

	#[test]
	fn overflow_past_three_lines_is_dropped() {
		let lines = wrap_lines("one two three four five six", 40.0, mono);
		assert_eq!(lines, vec!["one", "two", "three"]);
	}

	#[test]
	fn backing_store_follows_pixel_ratio() {
		assert_eq!(device_pixels(800.0, 1.0), 800);
		assert_eq!(device_pixels(800.0, 2.0), 1600);
		assert_eq!(device_pixels(333.0, 1.5), 500);
	}

	#[test]
	fn odd_pixel_ratios_fall_back_to_one() {
		assert_eq!(device_pixels(640.0, 0.0), 640);
		assert_eq!(device_pixels(640.0, f64::NAN), 640);
		assert_eq!(device_pixels(-5.0, 2.0), 0);
	}

	#[test]
	fn blank_text_has_no_lines() {
		assert!(wrap_lines("   ", 100.0, mono).is_empty());
	}
}

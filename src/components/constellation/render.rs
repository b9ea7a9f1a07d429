use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::camera::Projected;
use super::pulse::ease_out_cubic;
use super::state::ConstellationState;

const STAR_RADIUS: f64 = 0.22;
const FILLER_RADIUS: f64 = 0.08;
const ARC_DASH: (f64, f64) = (6.0, 5.0);

pub fn render(state: &ConstellationState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#05060f");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_connections(state, ctx);
	draw_nodes(state, ctx);
}

/// Fades geometry on the far side of the sphere.
fn depth_alpha(state: &ConstellationState, p: &Projected) -> f64 {
	let near = state.camera.distance - 10.0;
	let far = state.camera.distance + 10.0;
	(1.0 - 0.7 * ((p.depth - near) / (far - near)).clamp(0.0, 1.0)).max(0.2)
}

fn draw_connections(state: &ConstellationState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();

	for (i, c) in state.graph.connections.iter().enumerate() {
		let (Some(p1), Some(p2)) = (state.projected[c.a], state.projected[c.b]) else {
			continue;
		};
		let mut alpha = state.edge_intensity(i) * depth_alpha(state, &p1).min(depth_alpha(state, &p2));
		if has_highlight {
			if state.is_highlighted(c.a) && state.is_highlighted(c.b) {
				alpha += (1.0 - alpha) * 0.6 * t;
			} else {
				alpha *= 1.0 - 0.6 * t;
			}
		}
		let pulsing = state.pulse.is_active(state.clock_ms, c.activated_at);
		let (r, g, b) = if pulsing { (180, 230, 255) } else { (110, 150, 220) };
		ctx.set_stroke_style_str(&format!("rgba({r}, {g}, {b}, {alpha})"));
		ctx.set_line_width(if c.is_core_connection { 1.2 } else { 0.8 });

		let dash = if c.is_arc {
			js_sys::Array::of2(&JsValue::from_f64(ARC_DASH.0), &JsValue::from_f64(ARC_DASH.1))
		} else {
			js_sys::Array::new()
		};
		let _ = ctx.set_line_dash(&dash);
		// arcs flow outward from the hub
		ctx.set_line_dash_offset(-(state.clock_ms * 0.02) % (ARC_DASH.0 + ARC_DASH.1));

		ctx.begin_path();
		ctx.move_to(p1.x, p1.y);
		if c.is_arc {
			// bow hub arcs away from the canvas centre
			let (mx, my) = ((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
			let (cx, cy) = (state.width / 2.0, state.height / 2.0);
			let (ox, oy) = (mx - cx, my - cy);
			ctx.quadratic_curve_to(mx + ox * 0.35, my + oy * 0.35, p2.x, p2.y);
		} else {
			ctx.line_to(p2.x, p2.y);
		}
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &ConstellationState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();

	// back to front
	let mut order: Vec<usize> = (0..state.graph.nodes.len())
		.filter(|&i| state.projected[i].is_some())
		.collect();
	order.sort_by(|&a, &b| {
		let (da, db) = (
			state.projected[a].map_or(0.0, |p| p.depth),
			state.projected[b].map_or(0.0, |p| p.depth),
		);
		db.total_cmp(&da)
	});

	for idx in order {
		let Some(p) = state.projected[idx] else {
			continue;
		};
		let node = &state.graph.nodes[idx];
		let highlighted = has_highlight && state.is_highlighted(idx);
		let base = if node.is_star { STAR_RADIUS } else { FILLER_RADIUS };
		let mut radius = (base * node.size * p.scale).max(0.8);
		let mut alpha = depth_alpha(state, &p);
		if has_highlight {
			if highlighted {
				radius *= 1.0 + 0.3 * t;
			} else {
				alpha *= 1.0 - 0.6 * t;
			}
		}

		let glow = node.glow + if highlighted { 0.6 * t } else { 0.0 };
		if glow > 0.01 {
			let glow_radius = radius * (2.5 + 2.0 * glow);
			if let Ok(gradient) = ctx.create_radial_gradient(p.x, p.y, radius * 0.3, p.x, p.y, glow_radius)
			{
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", 0.35 * glow * alpha));
				let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", 0.1 * glow * alpha));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(p.x, p.y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.system.color());
		ctx.fill();
		ctx.set_global_alpha(1.0);

		if state.focused == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, radius + 4.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * alpha));
			ctx.set_line_width(1.5);
			ctx.stroke();
		}

		if let Some(word) = &node.word {
			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.85));
			ctx.set_font(&format!("{}px sans-serif", (p.scale * 0.45).clamp(10.0, 22.0)));
			let _ = ctx.fill_text(word, p.x + radius + 4.0, p.y + 4.0);
		}
	}
}

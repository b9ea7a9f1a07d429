use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::info;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::ConstellationState;
use super::types::StarEntry;
use crate::config::ConstellationConfig;
use crate::store::{UiMode, use_camera_store, use_ui_store};

/// Largest frame step fed to the simulation, in seconds.
const MAX_FRAME_DT: f64 = 0.1;

#[component]
pub fn ConstellationCanvas(
	#[prop(into)] stars: Signal<Vec<StarEntry>>,
	#[prop(optional)] config: ConstellationConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let ui = use_ui_store();
	let camera_store = use_camera_store();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ConstellationState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));
	let (state_init, animate_init, resize_cb_init, alive_init) =
		(state.clone(), animate.clone(), resize_cb.clone(), alive.clone());

	on_cleanup(move || alive.store(false, Ordering::Relaxed));

	Effect::new(move |_| {
		let stars = stars.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		info!("building constellation from {} stars", stars.len());
		*state_init.borrow_mut() = Some(ConstellationState::new(&stars, &config, w, h));
		camera_store.release();

		// the frame loop survives star-set rebuilds
		if animate_init.borrow().is_some() {
			return;
		}

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		if fullscreen {
			let (state_resize, canvas_resize, alive_resize) =
				(state_init.clone(), canvas.clone(), alive_init.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				if !alive_resize.load(Ordering::Relaxed) {
					return;
				}
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, alive_anim, resize_anim) = (
			state_init.clone(),
			animate_init.clone(),
			alive_init.clone(),
			resize_cb_init.clone(),
		);
		let mut last_frame: Option<f64> = None;
		*animate_init.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			if !alive_anim.load(Ordering::Relaxed) {
				// unmounted: detach the resize listener before dropping it
				if let Some(cb) = resize_anim.borrow_mut().take() {
					if let Some(win) = web_sys::window() {
						let _ = win
							.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
					}
				}
				return;
			}
			let dt = last_frame
				.map(|prev| ((timestamp - prev) / 1000.0).clamp(0.0, MAX_FRAME_DT))
				.unwrap_or(0.016);
			last_frame = Some(timestamp);

			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.auto_rotate = ui.mode.get_untracked().auto_rotates();
				let target = camera_store.target.get_untracked();
				s.tick(dt, target.as_ref());
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let pointer = move |ev: &MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = pointer(&ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.drag.active = true;
			s.drag.moved = false;
			s.drag.last_x = x;
			s.drag.last_y = y;
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = pointer(&ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				let (dx, dy) = (x - s.drag.last_x, y - s.drag.last_y);
				// small jitter still counts as a click
				if dx.abs() + dy.abs() > 2.0 {
					s.drag.moved = true;
				}
				if s.drag.moved {
					s.camera.rotate_by(dx, dy);
					s.drag.last_x = x;
					s.drag.last_y = y;
				}
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let (x, y) = pointer(&ev);
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			let clicked = s.drag.active && !s.drag.moved;
			s.drag.active = false;
			s.drag.moved = false;
			if !clicked {
				return;
			}
			match s.node_at_position(x, y) {
				Some(idx) if s.graph.nodes[idx].is_star => {
					let node = &s.graph.nodes[idx];
					let caption = format!(
						"[emphasis]{}[/emphasis][pause:200] [soft]held by {:?}[/soft]",
						node.word.as_deref().unwrap_or_default(),
						node.system
					);
					if let Some(target) = s.target_for(idx) {
						camera_store.focus(target);
					}
					ui.show_caption(caption);
					ui.set_mode(UiMode::Explore);
				}
				_ => {
					camera_store.release();
					ui.clear_caption();
				}
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.moved = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 1.1 } else { 0.9 };
			s.camera.zoom(factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="constellation-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

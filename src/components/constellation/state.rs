use std::collections::HashSet;

use super::camera::{Camera, CameraTarget, Projected};
use super::generator::generate;
use super::pulse::{PulseConfig, PulseDriver};
use super::types::{Graph, StarEntry};
use crate::config::ConstellationConfig;

pub const HIT_RADIUS: f64 = 10.0;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub last_x: f64,
	pub last_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
}

pub struct ConstellationState {
	pub graph: Graph,
	pub camera: Camera,
	pub pulse: PulseConfig,
	pub drag: DragState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub auto_rotate: bool,
	/// Node the camera is currently focused on.
	pub focused: Option<usize>,
	/// Animation clock in milliseconds.
	pub clock_ms: f64,
	pub projected: Vec<Option<Projected>>,
	driver: PulseDriver,
}

impl ConstellationState {
	pub fn new(stars: &[StarEntry], config: &ConstellationConfig, width: f64, height: f64) -> Self {
		let graph = generate(stars, &config.generator);
		let mut state = Self {
			projected: vec![None; graph.nodes.len()],
			graph,
			camera: Camera::new(config.camera.clone()),
			pulse: config.pulse.clone(),
			drag: DragState::default(),
			hover: HoverState::default(),
			width,
			height,
			auto_rotate: true,
			focused: None,
			clock_ms: 0.0,
			driver: PulseDriver::new(config.driver.clone(), config.pulse.clone()),
		};
		state.reproject();
		state
	}

	pub fn reproject(&mut self) {
		let (camera, w, h) = (&self.camera, self.width, self.height);
		self.projected = self
			.graph
			.nodes
			.iter()
			.map(|node| camera.project(&node.position, w, h))
			.collect();
	}

	/// Nearest node under the cursor, stars win ties within the hit radius.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let mut found: Option<(usize, f64)> = None;
		for (idx, p) in self.projected.iter().enumerate() {
			let Some(p) = p else { continue };
			let node = &self.graph.nodes[idx];
			let reach = HIT_RADIUS * if node.is_star { 1.5 } else { 0.6 };
			let (dx, dy) = (p.x - sx, p.y - sy);
			let d = (dx * dx + dy * dy).sqrt();
			if d >= reach {
				continue;
			}
			let better = match found {
				None => true,
				Some((prev, prev_d)) => {
					let prev_star = self.graph.nodes[prev].is_star;
					(node.is_star && !prev_star) || (node.is_star == prev_star && d < prev_d)
				}
			};
			if better {
				found = Some((idx, d));
			}
		}
		found.map(|(idx, _)| idx)
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors = match node {
			Some(idx) => self.graph.neighbors(idx).collect(),
			None => HashSet::new(),
		};
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn target_for(&self, idx: usize) -> Option<CameraTarget> {
		self.graph.nodes.get(idx).map(|node| CameraTarget {
			node: idx,
			position: node.position,
		})
	}

	pub fn edge_intensity(&self, connection: usize) -> f64 {
		self.pulse
			.intensity(self.clock_ms, self.graph.connections[connection].activated_at)
	}

	pub fn tick(&mut self, dt: f64, target: Option<&CameraTarget>) {
		self.clock_ms += dt * 1000.0;
		self.focused = target.map(|t| t.node);
		self.driver.tick(self.clock_ms, &mut self.graph.connections);
		self.camera
			.update(dt, target, self.auto_rotate && !self.drag.active);

		let (goal, speed) = if self.hover.node.is_some() {
			(1.0, 4.0)
		} else {
			(0.0, 2.5)
		};
		self.hover.highlight_t += (goal - self.hover.highlight_t) * (speed * dt).min(1.0);
		if self.hover.node.is_none() && self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}
		self.reproject();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.reproject();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::constellation::types::HUB_INDEX;

	fn state() -> ConstellationState {
		let stars = vec![StarEntry {
			id: "hub".into(),
			position: [0.0, 0.0, 0.0],
			word: "Unity".into(),
			size: 1.5,
			glow: 1.0,
			system: None,
		}];
		ConstellationState::new(&stars, &ConstellationConfig::default(), 800.0, 600.0)
	}

	#[test]
	fn hub_is_picked_at_canvas_center() {
		let s = state();
		assert_eq!(s.node_at_position(400.0, 300.0), Some(HUB_INDEX));
		assert_eq!(s.node_at_position(-500.0, -500.0), None);
	}

	#[test]
	fn hover_collects_neighbors_and_fades_out() {
		let mut s = state();
		s.set_hover(Some(HUB_INDEX));
		let expected: HashSet<usize> = s.graph.neighbors(HUB_INDEX).collect();
		assert_eq!(s.hover.neighbors, expected);
		assert!(s.is_highlighted(HUB_INDEX));

		for _ in 0..60 {
			s.tick(0.016, None);
		}
		assert!(s.hover.highlight_t > 0.5);

		s.set_hover(None);
		assert_eq!(s.hover.prev_node, Some(HUB_INDEX));
		assert!(s.has_active_highlight());
		for _ in 0..300 {
			s.tick(0.016, None);
		}
		assert!(!s.has_active_highlight());
	}

	#[test]
	fn ticking_fires_pulses() {
		let mut s = state();
		s.tick(0.016, None);
		assert!(s.graph.connections.iter().any(|c| c.activated_at.is_some()));
		assert!(s.projected.iter().all(|p| p.is_some()));
	}

	#[test]
	fn tick_tracks_the_camera_target() {
		let mut s = state();
		let target = s.target_for(HUB_INDEX).unwrap();
		s.tick(0.016, Some(&target));
		assert_eq!(s.focused, Some(HUB_INDEX));
		s.tick(0.016, None);
		assert_eq!(s.focused, None);
		assert!(s.target_for(usize::MAX).is_none());
	}
}

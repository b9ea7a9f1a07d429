use serde::Deserialize;

use super::types::Vec3;

const NEAR_PLANE: f64 = 0.5;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
	pub distance: f64,
	pub min_distance: f64,
	pub max_distance: f64,
	/// Viewing distance while a target is focused.
	pub target_distance: f64,
	/// Focal length as a fraction of the canvas height.
	pub focal_factor: f64,
	pub auto_rotate_speed: f64,
	pub ease_speed: f64,
	pub max_pitch: f64,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			distance: 30.0,
			min_distance: 8.0,
			max_distance: 60.0,
			target_distance: 14.0,
			focal_factor: 1.1,
			auto_rotate_speed: 0.08,
			ease_speed: 3.0,
			max_pitch: 1.2,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTarget {
	pub node: usize,
	pub position: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	pub depth: f64,
	pub scale: f64,
}

#[derive(Clone, Debug)]
pub struct Camera {
	pub yaw: f64,
	pub pitch: f64,
	pub distance: f64,
	pub focus: Vec3,
	/// User zoom, applied to both the resting and the focused distance.
	zoom_scale: f64,
	config: CameraConfig,
}

impl Camera {
	pub fn new(config: CameraConfig) -> Self {
		Self {
			yaw: 0.0,
			pitch: 0.25,
			distance: config.distance,
			focus: [0.0; 3],
			zoom_scale: 1.0,
			config,
		}
	}

	pub fn project(&self, p: &Vec3, width: f64, height: f64) -> Option<Projected> {
		let q = [p[0] - self.focus[0], p[1] - self.focus[1], p[2] - self.focus[2]];
		let (sy, cy) = self.yaw.sin_cos();
		let (x1, z1) = (q[0] * cy - q[2] * sy, q[0] * sy + q[2] * cy);
		let (sp, cp) = self.pitch.sin_cos();
		let (y2, z2) = (q[1] * cp - z1 * sp, q[1] * sp + z1 * cp);

		let depth = z2 + self.distance;
		if depth <= NEAR_PLANE {
			return None;
		}
		let scale = self.config.focal_factor * height / depth;
		Some(Projected {
			x: width / 2.0 + x1 * scale,
			y: height / 2.0 - y2 * scale,
			depth,
			scale,
		})
	}

	/// Eases focus and distance toward `target` (or back to rest).
	pub fn update(&mut self, dt: f64, target: Option<&CameraTarget>, auto_rotate: bool) {
		if auto_rotate {
			self.yaw += self.config.auto_rotate_speed * dt;
		}
		let k = 1.0 - (-self.config.ease_speed * dt).exp();
		let (goal, base_distance) = match target {
			Some(t) => (t.position, self.config.target_distance),
			None => ([0.0; 3], self.config.distance),
		};
		let goal_distance = (base_distance * self.zoom_scale)
			.clamp(self.config.min_distance, self.config.max_distance);
		for (f, g) in self.focus.iter_mut().zip(goal) {
			*f += (g - *f) * k;
		}
		self.distance += (goal_distance - self.distance) * k;
	}

	pub fn rotate_by(&mut self, dx: f64, dy: f64) {
		self.yaw += dx * 0.005;
		self.pitch = (self.pitch + dy * 0.005).clamp(-self.config.max_pitch, self.config.max_pitch);
	}

	pub fn zoom(&mut self, factor: f64) {
		let c = &self.config;
		let (near, far) = (
			c.distance.min(c.target_distance),
			c.distance.max(c.target_distance),
		);
		// no further than needed to pin both goals at the limits
		self.zoom_scale =
			(self.zoom_scale * factor).clamp(c.min_distance / far, c.max_distance / near);
	}
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::types::Connection;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
	pub rise_ms: f64,
	pub fade_ms: f64,
	pub min_opacity: f64,
	pub peak_opacity: f64,
}

impl Default for PulseConfig {
	fn default() -> Self {
		Self {
			rise_ms: 80.0,
			fade_ms: 170.0,
			min_opacity: 0.12,
			peak_opacity: 0.9,
		}
	}
}

impl PulseConfig {
	pub fn duration_ms(&self) -> f64 {
		self.rise_ms + self.fade_ms
	}

	/// Edge opacity at `now` for a pulse that started at `activated_at`.
	pub fn intensity(&self, now: f64, activated_at: Option<f64>) -> f64 {
		let Some(start) = activated_at else {
			return self.min_opacity;
		};
		let elapsed = now - start;
		if elapsed < 0.0 || elapsed >= self.duration_ms() {
			return self.min_opacity;
		}
		let span = self.peak_opacity - self.min_opacity;
		if elapsed < self.rise_ms {
			self.min_opacity + span * (elapsed / self.rise_ms)
		} else if self.fade_ms > 0.0 {
			let t = (elapsed - self.rise_ms) / self.fade_ms;
			self.peak_opacity - span * ease_out_cubic(t)
		} else {
			self.peak_opacity
		}
	}

	pub fn is_active(&self, now: f64, activated_at: Option<f64>) -> bool {
		activated_at.is_some_and(|start| now >= start && now - start < self.duration_ms())
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
	pub interval_ms: f64,
	pub cascade_delay_ms: f64,
	/// Probability that a fired pulse starts on a hub connection.
	pub core_bias: f64,
	pub seed: u64,
}

impl Default for DriverConfig {
	fn default() -> Self {
		Self {
			interval_ms: 140.0,
			cascade_delay_ms: 120.0,
			core_bias: 0.25,
			seed: 7,
		}
	}
}

/// Fires pulses on random connections at a fixed cadence.
pub struct PulseDriver {
	config: DriverConfig,
	pulse: PulseConfig,
	rng: StdRng,
	next_at: f64,
}

impl PulseDriver {
	pub fn new(config: DriverConfig, pulse: PulseConfig) -> Self {
		Self {
			rng: StdRng::seed_from_u64(config.seed),
			next_at: 0.0,
			config,
			pulse,
		}
	}

	/// Returns the index of the connection that fired, if any.
	pub fn tick(&mut self, now: f64, connections: &mut [Connection]) -> Option<usize> {
		if connections.is_empty() || now < self.next_at {
			return None;
		}
		self.next_at = now + self.config.interval_ms;

		let core: Vec<usize> = (0..connections.len())
			.filter(|&i| connections[i].is_core_connection)
			.collect();
		let picked = if !core.is_empty() && self.rng.random_bool(self.config.core_bias.clamp(0.0, 1.0))
		{
			core[self.rng.random_range(0..core.len())]
		} else {
			self.rng.random_range(0..connections.len())
		};
		activate(connections, picked, now, self.config.cascade_delay_ms, &self.pulse);
		Some(picked)
	}
}

/// Activates `idx` at `now` and the connections leaving its far endpoint one
/// cascade step later.
///
/// A connection that is mid-pulse is left alone, and a pending activation is
/// only ever pushed later.
pub fn activate(
	connections: &mut [Connection],
	idx: usize,
	now: f64,
	cascade_delay_ms: f64,
	pulse: &PulseConfig,
) {
	let far = connections[idx].b;
	schedule(&mut connections[idx], now, now, pulse);
	for (i, c) in connections.iter_mut().enumerate() {
		if i != idx && c.touches(far) {
			schedule(c, now, now + cascade_delay_ms, pulse);
		}
	}
}

fn schedule(connection: &mut Connection, now: f64, at: f64, pulse: &PulseConfig) {
	if pulse.is_active(now, connection.activated_at) {
		return;
	}
	connection.activated_at = match connection.activated_at {
		Some(pending) if pending > now => Some(pending.max(at)),
		_ => Some(at),
	};
}

#[cfg(test)]
mod tests {
	use approx::assert_relative_eq;

	use super::*;

	#[test]
	fn intensity_follows_the_pulse_window() {
		let pulse = PulseConfig::default();
		let start = 1_000.0;

		assert_relative_eq!(pulse.intensity(start, Some(start)), pulse.min_opacity, epsilon = 1e-12);
		assert_relative_eq!(
			pulse.intensity(start + pulse.rise_ms, Some(start)),
			pulse.peak_opacity,
			epsilon = 1e-12
		);
		assert_relative_eq!(
			pulse.intensity(start + 10.0 * pulse.duration_ms(), Some(start)),
			pulse.min_opacity,
			epsilon = 1e-12
		);
	}

	#[test]
	fn baseline_outside_the_window() {
		let pulse = PulseConfig::default();
		assert_relative_eq!(pulse.intensity(50.0, None), pulse.min_opacity, epsilon = 1e-12);
		assert_relative_eq!(pulse.intensity(50.0, Some(100.0)), pulse.min_opacity, epsilon = 1e-12);
		assert!(!pulse.is_active(50.0, Some(100.0)));
		assert!(pulse.is_active(150.0, Some(100.0)));
	}

	#[test]
	fn rise_is_linear_and_fade_is_monotonic() {
		let pulse = PulseConfig::default();
		let half = pulse.intensity(pulse.rise_ms / 2.0, Some(0.0));
		assert_relative_eq!(half, (pulse.min_opacity + pulse.peak_opacity) / 2.0, epsilon = 1e-12);

		let mut last = pulse.peak_opacity;
		let mut t = pulse.rise_ms;
		while t < pulse.duration_ms() {
			let value = pulse.intensity(t, Some(0.0));
			assert!(value <= last + 1e-12);
			assert!(value >= pulse.min_opacity - 1e-12);
			last = value;
			t += 5.0;
		}
	}

	fn chain() -> Vec<Connection> {
		vec![
			Connection::new(0, 1),
			Connection::new(1, 2),
			Connection::new(2, 3),
			Connection::new(2, 4),
		]
	}

	#[test]
	fn activation_cascades_from_the_far_endpoint() {
		let mut connections = chain();
		activate(&mut connections, 1, 500.0, 120.0, &PulseConfig::default());

		assert_eq!(connections[1].activated_at, Some(500.0));
		assert_eq!(connections[2].activated_at, Some(620.0));
		assert_eq!(connections[3].activated_at, Some(620.0));
		assert_eq!(connections[0].activated_at, None);
	}

	#[test]
	fn cascade_does_not_cut_a_running_pulse_short() {
		let pulse = PulseConfig::default();
		let mut connections = chain();
		activate(&mut connections, 2, 1_000.0, 120.0, &pulse);
		let before = pulse.intensity(1_080.0, connections[2].activated_at);

		activate(&mut connections, 1, 1_080.0, 120.0, &pulse);
		assert_eq!(connections[2].activated_at, Some(1_000.0));
		assert_relative_eq!(
			pulse.intensity(1_080.0, connections[2].activated_at),
			before,
			epsilon = 1e-12
		);
		assert_relative_eq!(before, pulse.peak_opacity, epsilon = 1e-12);
		// the idle sibling still picks up the cascade
		assert_eq!(connections[3].activated_at, Some(1_200.0));
	}

	#[test]
	fn pending_activation_is_only_pushed_later() {
		let pulse = PulseConfig::default();
		let mut connections = chain();
		connections[2].activated_at = Some(900.0);
		connections[3].activated_at = Some(500.0);

		activate(&mut connections, 1, 400.0, 120.0, &pulse);
		assert_eq!(connections[2].activated_at, Some(900.0));
		assert_eq!(connections[3].activated_at, Some(520.0));
	}

	#[test]
	fn full_core_bias_always_picks_a_hub_connection() {
		let mut connections = chain();
		let config = DriverConfig {
			core_bias: 1.0,
			..DriverConfig::default()
		};
		let mut driver = PulseDriver::new(config.clone(), PulseConfig::default());
		for step in 0..50 {
			let now = step as f64 * config.interval_ms;
			let picked = driver.tick(now, &mut connections).unwrap();
			assert!(connections[picked].is_core_connection);
		}
	}

	#[test]
	fn driver_fires_once_per_interval() {
		let mut connections = chain();
		let mut driver = PulseDriver::new(DriverConfig::default(), PulseConfig::default());

		assert!(driver.tick(0.0, &mut connections).is_some());
		assert!(driver.tick(50.0, &mut connections).is_none());
		assert!(driver.tick(140.0, &mut connections).is_some());
		assert!(driver.tick(200.0, &mut []).is_none());
	}
}

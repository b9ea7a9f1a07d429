//! Tunables and the embedded star set.

use std::collections::HashSet;

use log::warn;
use serde::Deserialize;

use crate::components::constellation::{CameraConfig, DriverConfig, GeneratorConfig, PulseConfig, StarEntry};
use crate::components::expressive::Cadence;
use crate::error::{ConstellationError, Result};

const DEFAULT_STARS: &str = include_str!("../assets/stars.json");

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConstellationConfig {
	pub generator: GeneratorConfig,
	pub pulse: PulseConfig,
	pub driver: DriverConfig,
	pub camera: CameraConfig,
	pub cadence: Cadence,
}

impl ConstellationConfig {
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Parses `json`, falling back to defaults on any error.
	pub fn from_json_or_default(json: &str) -> Self {
		Self::from_json(json).unwrap_or_else(|e| {
			warn!("using default constellation config: {e}");
			Self::default()
		})
	}

	pub fn validate(&self) -> Result<()> {
		let invalid = |msg: &str| Err(ConstellationError::InvalidConfig(msg.into()));
		if self.generator.max_connections == 0 {
			return invalid("generator.max_connections must be at least 1");
		}
		if !(self.generator.sphere_radius > 0.0) {
			return invalid("generator.sphere_radius must be positive");
		}
		if !(0.0..=1.0).contains(&self.generator.arc_fraction) {
			return invalid("generator.arc_fraction must be within 0..=1");
		}
		if self.pulse.rise_ms <= 0.0 || self.pulse.fade_ms < 0.0 {
			return invalid("pulse.rise_ms must be positive and pulse.fade_ms non-negative");
		}
		if self.pulse.min_opacity > self.pulse.peak_opacity {
			return invalid("pulse.min_opacity exceeds pulse.peak_opacity");
		}
		if self.driver.interval_ms <= 0.0 {
			return invalid("driver.interval_ms must be positive");
		}
		if self.camera.min_distance > self.camera.max_distance {
			return invalid("camera.min_distance exceeds camera.max_distance");
		}
		Ok(())
	}
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StarSet {
	#[serde(default)]
	pub greeting: String,
	pub stars: Vec<StarEntry>,
}

pub fn load_stars(json: &str) -> Result<StarSet> {
	let set: StarSet = serde_json::from_str(json)?;
	let mut seen = HashSet::new();
	for star in &set.stars {
		if !star.position.iter().all(|c| c.is_finite()) {
			return Err(ConstellationError::NonFinitePosition { id: star.id.clone() });
		}
		if star.word.trim().is_empty() {
			return Err(ConstellationError::EmptyWord { id: star.id.clone() });
		}
		if !seen.insert(star.id.as_str()) {
			return Err(ConstellationError::DuplicateStar(star.id.clone()));
		}
	}
	Ok(set)
}

pub fn default_star_set() -> Result<StarSet> {
	load_stars(DEFAULT_STARS)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn embedded_star_set_loads() {
		let set = default_star_set().unwrap();
		assert!(!set.greeting.is_empty());
		assert_eq!(set.stars[0].id, "unity");
		assert!(set.stars.len() < GeneratorConfig::default().node_count);
	}

	#[test]
	fn shipped_config_is_valid() {
		let config = ConstellationConfig::from_json(include_str!("../assets/constellation.json")).unwrap();
		assert_eq!(config.generator.node_count, 400);
		assert_eq!(config.driver, DriverConfig::default());
	}

	#[test]
	fn partial_config_keeps_defaults() {
		let config = ConstellationConfig::from_json(r#"{ "generator": { "node_count": 120 } }"#).unwrap();
		assert_eq!(config.generator.node_count, 120);
		assert_eq!(config.generator.max_connections, 3);
		assert_eq!(config.pulse, PulseConfig::default());
	}

	#[test]
	fn rejects_inverted_opacity() {
		let err = ConstellationConfig::from_json(
			r#"{ "pulse": { "min_opacity": 0.9, "peak_opacity": 0.1 } }"#,
		)
		.unwrap_err();
		assert!(matches!(err, ConstellationError::InvalidConfig(_)));
	}

	#[test]
	fn malformed_config_falls_back() {
		let config = ConstellationConfig::from_json_or_default("not json");
		assert_eq!(config, ConstellationConfig::default());
	}

	#[test]
	fn rejects_bad_star_input() {
		let not_array = r#"{ "stars": { "id": "a" } }"#;
		assert!(matches!(
			load_stars(not_array),
			Err(ConstellationError::InvalidStarData(_))
		));

		let empty_word = r#"{ "stars": [ { "id": "a", "position": [0, 0, 0], "word": " " } ] }"#;
		assert!(matches!(
			load_stars(empty_word),
			Err(ConstellationError::EmptyWord { .. })
		));

		let duplicate = r#"{ "stars": [
			{ "id": "a", "position": [0, 0, 0], "word": "x" },
			{ "id": "a", "position": [1, 0, 0], "word": "y" }
		] }"#;
		assert!(matches!(
			load_stars(duplicate),
			Err(ConstellationError::DuplicateStar(id)) if id == "a"
		));
	}

	#[test]
	fn star_defaults_apply() {
		let set = load_stars(r#"{ "stars": [ { "id": "a", "position": [1, 2, 3], "word": "Hi" } ] }"#)
			.unwrap();
		let star = &set.stars[0];
		assert_eq!(star.size, 1.0);
		assert_eq!(star.glow, 0.0);
		assert!(star.system.is_none());
		assert!(set.greeting.is_empty());
	}
}

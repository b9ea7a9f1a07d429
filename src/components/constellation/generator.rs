use std::collections::HashSet;
use std::f64::consts::PI;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::types::{Connection, Graph, HUB_INDEX, Node, StarEntry, SystemKind, distance};

pub const MAX_CONNECTIONS: usize = 3;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
	pub node_count: usize,
	pub sphere_radius: f64,
	pub connection_distance: f64,
	/// Distance multiplier applied when both endpoints are stars.
	pub star_distance_boost: f64,
	pub max_connections: usize,
	/// Share of `node_count` used for each of the top and bottom arc sets.
	pub arc_fraction: f64,
	pub seed: u64,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			node_count: 400,
			sphere_radius: 10.0,
			connection_distance: 2.4,
			star_distance_boost: 1.8,
			max_connections: MAX_CONNECTIONS,
			arc_fraction: 0.1,
			seed: 0xEC0D_1A05,
		}
	}
}

impl GeneratorConfig {
	pub fn arc_count(&self) -> usize {
		((self.node_count as f64 * self.arc_fraction).floor() as usize).max(1)
	}
}

/// Builds the constellation: stars first, filler nodes on the sphere shell,
/// then proximity edges and the forced hub arcs.
pub fn generate(stars: &[StarEntry], config: &GeneratorConfig) -> Graph {
	let mut rng = StdRng::seed_from_u64(config.seed);
	let mut nodes: Vec<Node> = stars
		.iter()
		.enumerate()
		.map(|(i, star)| Node {
			position: star.position,
			system: star
				.system
				.unwrap_or(SystemKind::ALL[i % SystemKind::ALL.len()]),
			is_star: true,
			is_outer: false,
			word: Some(star.word.clone()),
			size: star.size,
			glow: star.glow,
		})
		.collect();

	let filler = config.node_count.saturating_sub(nodes.len());
	nodes.extend((0..filler).map(|_| filler_node(&mut rng, config.sphere_radius)));

	let mut connections = proximity_connections(&nodes, config);
	let proximity = connections.len();
	connections.retain(|c| !(nodes[c.a].is_star && nodes[c.b].is_star));
	add_hub_arcs(&nodes, &mut connections, config.arc_count());

	debug!(
		"constellation built: {} nodes ({} stars), {} proximity edges, {} arcs",
		nodes.len(),
		stars.len(),
		proximity,
		connections.iter().filter(|c| c.is_arc).count()
	);

	Graph { nodes, connections }
}

fn filler_node(rng: &mut StdRng, radius: f64) -> Node {
	let theta = 2.0 * PI * rng.random::<f64>();
	let phi = (2.0 * rng.random::<f64>() - 1.0).acos();
	Node {
		position: [
			radius * phi.sin() * theta.cos(),
			radius * phi.cos(),
			radius * phi.sin() * theta.sin(),
		],
		system: SystemKind::ALL[rng.random_range(0..SystemKind::ALL.len())],
		is_star: false,
		is_outer: true,
		word: None,
		size: rng.random_range(0.4..1.0),
		glow: 0.0,
	}
}

fn proximity_connections(nodes: &[Node], config: &GeneratorConfig) -> Vec<Connection> {
	let mut degree = vec![0usize; nodes.len()];
	let mut connections = Vec::new();

	for i in 0..nodes.len() {
		for j in (i + 1)..nodes.len() {
			if degree[i] >= config.max_connections || degree[j] >= config.max_connections {
				continue;
			}
			let threshold = if nodes[i].is_star && nodes[j].is_star {
				config.connection_distance * config.star_distance_boost
			} else {
				config.connection_distance
			};
			if distance(&nodes[i].position, &nodes[j].position) < threshold {
				connections.push(Connection::new(i, j));
				degree[i] += 1;
				degree[j] += 1;
			}
		}
	}
	connections
}

fn add_hub_arcs(nodes: &[Node], connections: &mut Vec<Connection>, arc_count: usize) {
	let mut outer: Vec<usize> = (0..nodes.len())
		.filter(|&i| i != HUB_INDEX && nodes[i].is_outer)
		.collect();
	if outer.is_empty() {
		return;
	}
	outer.sort_by(|&a, &b| nodes[b].position[1].total_cmp(&nodes[a].position[1]));

	let take = arc_count.min(outer.len());
	let top = outer.iter().take(take);
	let bottom = outer.iter().rev().take(take);

	let mut existing: HashSet<(usize, usize)> =
		connections.iter().map(|c| (c.a, c.b)).collect();
	for &idx in top.chain(bottom) {
		if existing.insert((HUB_INDEX, idx)) {
			let mut arc = Connection::new(HUB_INDEX, idx);
			arc.is_arc = true;
			connections.push(arc);
		}
	}
}

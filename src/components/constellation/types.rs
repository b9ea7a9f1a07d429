use serde::{Deserialize, Serialize};

pub type Vec3 = [f64; 3];

/// The EcodiaOS systems a node can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
	Atune,
	Axon,
	Equor,
	Evo,
	Nova,
	Simula,
	Synapse,
	Unity,
	Voxis,
}

impl SystemKind {
	pub const ALL: [SystemKind; 9] = [
		SystemKind::Atune,
		SystemKind::Axon,
		SystemKind::Equor,
		SystemKind::Evo,
		SystemKind::Nova,
		SystemKind::Simula,
		SystemKind::Synapse,
		SystemKind::Unity,
		SystemKind::Voxis,
	];

	pub fn color(self) -> &'static str {
		match self {
			SystemKind::Atune => "#7fd1ff",
			SystemKind::Axon => "#ff9f6b",
			SystemKind::Equor => "#b8f28c",
			SystemKind::Evo => "#f2d06b",
			SystemKind::Nova => "#ff6bb5",
			SystemKind::Simula => "#9d8cff",
			SystemKind::Synapse => "#6bffd8",
			SystemKind::Unity => "#ffffff",
			SystemKind::Voxis => "#ffc2e0",
		}
	}
}

fn default_size() -> f64 {
	1.0
}

/// A word-bearing star as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StarEntry {
	pub id: String,
	pub position: Vec3,
	pub word: String,
	#[serde(default = "default_size")]
	pub size: f64,
	#[serde(default)]
	pub glow: f64,
	#[serde(default)]
	pub system: Option<SystemKind>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub position: Vec3,
	pub system: SystemKind,
	pub is_star: bool,
	pub is_outer: bool,
	pub word: Option<String>,
	pub size: f64,
	pub glow: f64,
}

/// Edge between two nodes, stored with `a < b`.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	pub a: usize,
	pub b: usize,
	pub is_core_connection: bool,
	pub is_arc: bool,
	/// Animation clock time (ms) of the latest activation.
	pub activated_at: Option<f64>,
}

impl Connection {
	pub fn new(i: usize, j: usize) -> Self {
		let (a, b) = if i < j { (i, j) } else { (j, i) };
		Self {
			a,
			b,
			is_core_connection: a == HUB_INDEX,
			is_arc: false,
			activated_at: None,
		}
	}

	pub fn touches(&self, idx: usize) -> bool {
		self.a == idx || self.b == idx
	}

	pub fn other(&self, idx: usize) -> Option<usize> {
		if self.a == idx {
			Some(self.b)
		} else if self.b == idx {
			Some(self.a)
		} else {
			None
		}
	}
}

pub const HUB_INDEX: usize = 0;

#[derive(Clone, Debug, Default)]
pub struct Graph {
	pub nodes: Vec<Node>,
	pub connections: Vec<Connection>,
}

impl Graph {
	pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
		self.connections.iter().filter_map(move |c| c.other(idx))
	}
}

pub fn distance(p: &Vec3, q: &Vec3) -> f64 {
	let (dx, dy, dz) = (p[0] - q[0], p[1] - q[1], p[2] - q[2]);
	(dx * dx + dy * dy + dz * dz).sqrt()
}

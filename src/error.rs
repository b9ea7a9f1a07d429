use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConstellationError {
	#[error("invalid star data: {0}")]
	InvalidStarData(#[from] serde_json::Error),

	#[error("star `{id}` has a non-finite position")]
	NonFinitePosition { id: String },

	#[error("star `{id}` has an empty word")]
	EmptyWord { id: String },

	#[error("duplicate star id `{0}`")]
	DuplicateStar(String),

	#[error("invalid config: {0}")]
	InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ConstellationError>;

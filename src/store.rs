//! App-wide UI state shared through context.

use leptos::prelude::*;
use log::info;

use crate::components::constellation::CameraTarget;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UiMode {
	/// Auto-rotating intro with the greeting caption.
	#[default]
	Landing,
	/// Free navigation; clicking a star focuses it.
	Explore,
}

impl UiMode {
	pub fn toggled(self) -> Self {
		match self {
			UiMode::Landing => UiMode::Explore,
			UiMode::Explore => UiMode::Landing,
		}
	}

	pub fn auto_rotates(self) -> bool {
		self == UiMode::Landing
	}

	pub fn label(self) -> &'static str {
		match self {
			UiMode::Landing => "Explore",
			UiMode::Explore => "Back",
		}
	}
}

#[derive(Clone, Copy)]
pub struct UiStore {
	pub mode: RwSignal<UiMode>,
	pub caption: RwSignal<Option<String>>,
}

impl UiStore {
	pub fn new() -> Self {
		Self {
			mode: RwSignal::new(UiMode::default()),
			caption: RwSignal::new(None),
		}
	}

	pub fn set_mode(&self, mode: UiMode) {
		if self.mode.get_untracked() != mode {
			info!("ui mode -> {mode:?}");
			self.mode.set(mode);
		}
	}

	pub fn toggle_mode(&self) {
		self.set_mode(self.mode.get_untracked().toggled());
	}

	pub fn show_caption(&self, text: impl Into<String>) {
		self.caption.set(Some(text.into()));
	}

	pub fn clear_caption(&self) {
		self.caption.set(None);
	}
}

#[derive(Clone, Copy)]
pub struct CameraStore {
	pub target: RwSignal<Option<CameraTarget>>,
}

impl CameraStore {
	pub fn new() -> Self {
		Self {
			target: RwSignal::new(None),
		}
	}

	pub fn focus(&self, target: CameraTarget) {
		self.target.set(Some(target));
	}

	pub fn release(&self) {
		self.target.set(None);
	}
}

pub fn provide_stores() {
	provide_context(UiStore::new());
	provide_context(CameraStore::new());
}

pub fn use_ui_store() -> UiStore {
	expect_context::<UiStore>()
}

pub fn use_camera_store() -> CameraStore {
	expect_context::<CameraStore>()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mode_toggles_between_landing_and_explore() {
		assert_eq!(UiMode::default(), UiMode::Landing);
		assert_eq!(UiMode::Landing.toggled(), UiMode::Explore);
		assert_eq!(UiMode::Explore.toggled(), UiMode::Landing);
		assert!(UiMode::Landing.auto_rotates());
		assert!(!UiMode::Explore.auto_rotates());
	}

	#[test]
	fn stores_apply_setters() {
		let owner = Owner::new();
		owner.with(|| {
			let ui = UiStore::new();
			ui.toggle_mode();
			assert_eq!(ui.mode.get_untracked(), UiMode::Explore);
			ui.show_caption("Care");
			assert_eq!(ui.caption.get_untracked().as_deref(), Some("Care"));
			ui.clear_caption();
			assert!(ui.caption.get_untracked().is_none());

			let camera = CameraStore::new();
			camera.focus(CameraTarget {
				node: 2,
				position: [1.0, 2.0, 3.0],
			});
			assert_eq!(camera.target.get_untracked().map(|t| t.node), Some(2));
			camera.release();
			assert!(camera.target.get_untracked().is_none());
		});
	}
}

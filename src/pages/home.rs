use leptos::prelude::*;
use log::error;
use web_sys::MouseEvent;

use crate::components::constellation::ConstellationCanvas;
use crate::components::expressive::ExpressiveText;
use crate::config::{ConstellationConfig, StarSet, default_star_set};
use crate::store::{UiMode, use_camera_store, use_ui_store};

const CONFIG_JSON: &str = include_str!("../../assets/constellation.json");

/// Landing page: the constellation with its caption overlay.
#[component]
pub fn Home() -> impl IntoView {
	let ui = use_ui_store();
	let camera = use_camera_store();
	let config = ConstellationConfig::from_json_or_default(CONFIG_JSON);
	let cadence = config.cadence.clone();

	let StarSet { greeting, stars } = default_star_set().unwrap_or_else(|e| {
		error!("failed to load star set: {e}");
		StarSet::default()
	});
	let stars = Signal::derive(move || stars.clone());
	let caption = Signal::derive(move || match ui.mode.get() {
		UiMode::Landing => greeting.clone(),
		UiMode::Explore => ui.caption.get().unwrap_or_default(),
	});

	let on_toggle = move |_: MouseEvent| {
		ui.toggle_mode();
		if ui.mode.get_untracked() == UiMode::Landing {
			camera.release();
			ui.clear_caption();
		}
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-constellation">
				<ConstellationCanvas
					stars=stars
					config=config
					fullscreen=true
				/>
				<div class="constellation-overlay">
					<h1>"EcodiaOS"</h1>
					<ExpressiveText text=caption cadence=cadence />
					<button class="mode-toggle" on:click=on_toggle>
						{move || ui.mode.get().label()}
					</button>
				</div>
			</div>
		</ErrorBoundary>
	}
}

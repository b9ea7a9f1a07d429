use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use log::{debug, warn};
use web_sys::MouseEvent;

use super::tags::{Style, parse, plain_text};
use super::timing::Cadence;
use super::typewriter::Typewriter;

const TICK_MS: u64 = 16;

/// Types out tagged text character by character; clicking reveals the rest.
#[component]
pub fn ExpressiveText(
	#[prop(into)] text: Signal<String>,
	#[prop(optional)] cadence: Cadence,
	#[prop(default = true)] show_cursor: bool,
) -> impl IntoView {
	let spans = RwSignal::new(Vec::<(String, Style)>::new());
	let volume = RwSignal::new(1.0f32);
	let done = RwSignal::new(true);
	let label = RwSignal::new(String::new());
	let typewriter = Rc::new(RefCell::new(Typewriter::default()));

	let tw_reset = typewriter.clone();
	Effect::new(move |_| {
		let text = text.get();
		debug!("typing caption of {} chars", text.chars().count());
		*tw_reset.borrow_mut() = Typewriter::from_tagged(&text, &cadence);
		label.set(plain_text(&parse(&text)));
		spans.set(Vec::new());
		done.set(false);
	});

	let tw_tick = typewriter.clone();
	let interval = set_interval_with_handle(
		move || {
			let mut tw = tw_tick.borrow_mut();
			if done.get_untracked() {
				return;
			}
			tw.advance_to(js_sys::Date::now());
			spans.set(tw.visible_spans());
			if let Some(cue) = tw.active_cue() {
				volume.set(cue.volume);
			}
			done.set(tw.is_done());
		},
		Duration::from_millis(TICK_MS),
	);
	match interval {
		Ok(handle) => on_cleanup(move || handle.clear()),
		Err(e) => warn!("typewriter interval unavailable: {e:?}"),
	}

	let tw_skip = typewriter.clone();
	let on_click = move |_: MouseEvent| {
		let mut tw = tw_skip.borrow_mut();
		tw.skip();
		spans.set(tw.visible_spans());
		done.set(true);
	};

	view! {
		<p class="expressive-text" aria-label=move || label.get() on:click=on_click>
			{move || {
				spans
					.get()
					.into_iter()
					.map(|(text, style)| view! { <span class=style.class()>{text}</span> })
					.collect_view()
			}}
			<Show when=move || show_cursor && !done.get()>
				<span class="expr-cursor" style=move || format!("opacity: {}", volume.get())>
					"▌"
				</span>
			</Show>
		</p>
	}
}

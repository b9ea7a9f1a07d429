use super::tags::{Style, parse};
use super::timing::{Cadence, Script, VoiceCue, compile};

/// Longest wall-clock gap credited in one step, so a throttled or hidden tab
/// does not dump the whole caption at once.
pub const MAX_STEP_MS: f64 = 250.0;

/// Replays a compiled script against an elapsed-time clock.
#[derive(Clone, Debug, Default)]
pub struct Typewriter {
	script: Script,
	elapsed_ms: f64,
	last_seen_ms: Option<f64>,
}

impl Typewriter {
	pub fn new(script: Script) -> Self {
		Self {
			script,
			elapsed_ms: 0.0,
			last_seen_ms: None,
		}
	}

	pub fn from_tagged(text: &str, cadence: &Cadence) -> Self {
		Self::new(compile(&parse(text), cadence))
	}

	pub fn advance(&mut self, dt_ms: f64) {
		self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.script.duration_ms);
	}

	/// Advances by the wall-clock time since the previous call, capped at
	/// [`MAX_STEP_MS`]. The first call only starts the clock.
	pub fn advance_to(&mut self, now_ms: f64) {
		if let Some(prev) = self.last_seen_ms {
			self.advance((now_ms - prev).min(MAX_STEP_MS));
		}
		self.last_seen_ms = Some(now_ms);
	}

	pub fn skip(&mut self) {
		self.elapsed_ms = self.script.duration_ms;
	}

	pub fn is_done(&self) -> bool {
		self.elapsed_ms >= self.script.duration_ms
	}

	pub fn revealed(&self) -> usize {
		if self.is_done() {
			return self.script.steps.len();
		}
		self.script
			.steps
			.partition_point(|s| s.at_ms <= self.elapsed_ms)
	}

	/// Revealed characters grouped into runs of the same style.
	pub fn visible_spans(&self) -> Vec<(String, Style)> {
		let mut spans: Vec<(String, Style)> = Vec::new();
		for step in &self.script.steps[..self.revealed()] {
			match spans.last_mut() {
				Some((text, style)) if *style == step.style => text.push(step.ch),
				_ => spans.push((step.ch.to_string(), step.style)),
			}
		}
		spans
	}

	/// The latest voice cue that has started.
	pub fn active_cue(&self) -> Option<&VoiceCue> {
		self.script
			.cues
			.iter()
			.rev()
			.find(|c| c.at_ms <= self.elapsed_ms)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn typewriter() -> Typewriter {
		Typewriter::from_tagged("ab[emphasis]cd[/emphasis]", &Cadence::default())
	}

	#[test]
	fn reveals_characters_over_time() {
		let mut tw = typewriter();
		assert_eq!(tw.revealed(), 1);
		tw.advance(40.0);
		assert_eq!(tw.visible_spans(), vec![("ab".to_string(), Style::Plain)]);
		tw.advance(30.0);
		assert_eq!(
			tw.visible_spans(),
			vec![
				("ab".to_string(), Style::Plain),
				("c".to_string(), Style::Emphasis)
			]
		);
		assert!(!tw.is_done());
	}

	#[test]
	fn wall_clock_drives_the_reveal() {
		let mut tw = typewriter();
		tw.advance_to(5_000.0);
		assert_eq!(tw.revealed(), 1);
		tw.advance_to(5_040.0);
		assert_eq!(tw.visible_spans(), vec![("ab".to_string(), Style::Plain)]);
		// a clock that steps backwards does not rewind
		tw.advance_to(5_000.0);
		assert_eq!(tw.revealed(), 2);
	}

	#[test]
	fn long_wall_clock_gaps_are_capped() {
		let text = "a fairly long caption that takes a while to type";
		let mut tw = Typewriter::from_tagged(text, &Cadence::default());
		tw.advance_to(0.0);
		tw.advance_to(60_000.0);
		assert!(!tw.is_done());
		let mut capped = Typewriter::from_tagged(text, &Cadence::default());
		capped.advance(MAX_STEP_MS);
		assert_eq!(tw.revealed(), capped.revealed());
	}

	#[test]
	fn skip_reveals_everything() {
		let mut tw = typewriter();
		tw.skip();
		assert!(tw.is_done());
		assert_eq!(tw.revealed(), 4);
		assert_eq!(tw.active_cue().map(|c| c.text.as_str()), Some("cd"));
	}

	#[test]
	fn clock_never_runs_past_the_script() {
		let mut tw = typewriter();
		tw.advance(1e9);
		tw.advance(-50.0);
		assert!(tw.is_done());
		assert_eq!(tw.visible_spans().len(), 2);
	}

	#[test]
	fn empty_script_is_done_immediately() {
		let tw = Typewriter::from_tagged("", &Cadence::default());
		assert!(tw.is_done());
		assert!(tw.visible_spans().is_empty());
		assert!(tw.active_cue().is_none());
	}
}

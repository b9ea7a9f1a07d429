use serde::Deserialize;

use super::tags::{Style, Token};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Cadence {
	pub char_ms: f64,
	pub comma_ms: f64,
	/// Extra hold after `.`, `!`, `?` and line breaks.
	pub stop_ms: f64,
}

impl Default for Cadence {
	fn default() -> Self {
		Self {
			char_ms: 32.0,
			comma_ms: 140.0,
			stop_ms: 320.0,
		}
	}
}

impl Style {
	pub fn delay_factor(self) -> f64 {
		match self {
			Style::Plain => 1.0,
			Style::Soft => 1.1,
			Style::Emphasis => 1.2,
			Style::Whisper => 1.3,
			Style::Excited => 0.6,
			Style::Slow => 1.8,
		}
	}

	/// Speech rate, pitch and volume for a run in this style.
	pub fn voice(self) -> (f32, f32, f32) {
		match self {
			Style::Plain => (1.0, 1.0, 1.0),
			Style::Soft => (0.95, 0.95, 0.7),
			Style::Emphasis => (0.9, 1.1, 1.0),
			Style::Whisper => (0.85, 0.9, 0.4),
			Style::Excited => (1.2, 1.2, 1.0),
			Style::Slow => (0.7, 0.95, 0.9),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypingStep {
	pub ch: char,
	pub at_ms: f64,
	pub style: Style,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VoiceCue {
	pub text: String,
	pub at_ms: f64,
	pub rate: f32,
	pub pitch: f32,
	pub volume: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
	pub steps: Vec<TypingStep>,
	pub cues: Vec<VoiceCue>,
	pub duration_ms: f64,
}

/// Lays tokens out on a timeline: each character is revealed at `at_ms`,
/// and every text run gets a voice cue starting with its first character.
pub fn compile(tokens: &[Token], cadence: &Cadence) -> Script {
	let mut script = Script::default();
	let mut clock = 0.0;

	for token in tokens {
		match token {
			Token::Pause(ms) => clock += f64::from(*ms),
			Token::Text { text, style } => {
				let (rate, pitch, volume) = style.voice();
				script.cues.push(VoiceCue {
					text: text.clone(),
					at_ms: clock,
					rate,
					pitch,
					volume,
				});
				for ch in text.chars() {
					script.steps.push(TypingStep {
						ch,
						at_ms: clock,
						style: *style,
					});
					clock += hold_after(ch, cadence) * style.delay_factor();
				}
			}
		}
	}
	script.duration_ms = clock;
	script
}

fn hold_after(ch: char, cadence: &Cadence) -> f64 {
	match ch {
		',' | ';' | ':' => cadence.comma_ms,
		'.' | '!' | '?' | '\n' => cadence.stop_ms,
		_ => cadence.char_ms,
	}
}

#[cfg(test)]
mod tests {
	use approx::assert_relative_eq;

	use super::*;
	use crate::components::expressive::tags::parse;

	#[test]
	fn characters_are_spaced_by_cadence() {
		let script = compile(&parse("ab, c."), &Cadence::default());
		let times: Vec<f64> = script.steps.iter().map(|s| s.at_ms).collect();
		assert_eq!(times, vec![0.0, 32.0, 64.0, 204.0, 236.0, 268.0]);
		assert_relative_eq!(script.duration_ms, 588.0);
	}

	#[test]
	fn pauses_and_styles_stretch_the_timeline() {
		let cadence = Cadence::default();
		let script = compile(&parse("a[pause:100][slow]b[/slow]c"), &cadence);
		let times: Vec<f64> = script.steps.iter().map(|s| s.at_ms).collect();
		assert_relative_eq!(times[1], 132.0);
		assert_relative_eq!(times[2], 132.0 + 32.0 * 1.8, epsilon = 1e-9);
		assert_eq!(script.steps[1].style, Style::Slow);
	}

	#[test]
	fn one_voice_cue_per_run() {
		let script = compile(&parse("hi [whisper]there[/whisper]"), &Cadence::default());
		assert_eq!(script.cues.len(), 2);
		assert_eq!(script.cues[1].text, "there");
		assert_relative_eq!(script.cues[1].at_ms, 96.0);
		assert_relative_eq!(script.cues[1].volume, 0.4);
	}

	#[test]
	fn empty_input_has_no_duration() {
		let script = compile(&[], &Cadence::default());
		assert!(script.steps.is_empty());
		assert_eq!(script.duration_ms, 0.0);
	}
}

pub const DEFAULT_PAUSE_MS: u32 = 400;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Style {
	#[default]
	Plain,
	Soft,
	Emphasis,
	Whisper,
	Excited,
	Slow,
}

impl Style {
	fn from_tag(name: &str) -> Option<Self> {
		match name {
			"soft" => Some(Style::Soft),
			"emphasis" => Some(Style::Emphasis),
			"whisper" => Some(Style::Whisper),
			"excited" => Some(Style::Excited),
			"slow" => Some(Style::Slow),
			_ => None,
		}
	}

	pub fn class(self) -> &'static str {
		match self {
			Style::Plain => "expr-plain",
			Style::Soft => "expr-soft",
			Style::Emphasis => "expr-emphasis",
			Style::Whisper => "expr-whisper",
			Style::Excited => "expr-excited",
			Style::Slow => "expr-slow",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
	Text { text: String, style: Style },
	Pause(u32),
}

enum Tag {
	Open(Style),
	Close(Style),
	Pause(u32),
}

fn parse_tag(inner: &str) -> Option<Tag> {
	let inner = inner.trim();
	if let Some(name) = inner.strip_prefix('/') {
		return Style::from_tag(name.trim()).map(Tag::Close);
	}
	match inner.split_once(':') {
		Some(("pause", ms)) => ms.trim().parse().ok().map(Tag::Pause),
		None if inner == "pause" => Some(Tag::Pause(DEFAULT_PAUSE_MS)),
		None => Style::from_tag(inner).map(Tag::Open),
		Some(_) => None,
	}
}

/// Splits tagged text into styled runs and pauses.
///
/// Unknown tags and closing tags without a matching opener stay in the text
/// verbatim. An unclosed tag styles everything up to the end of input.
pub fn parse(input: &str) -> Vec<Token> {
	let mut tokens = Vec::new();
	let mut stack: Vec<Style> = Vec::new();
	let mut buf = String::new();
	let mut rest = input;

	while let Some(open) = rest.find('[') {
		let (before, from_bracket) = rest.split_at(open);
		buf.push_str(before);

		let Some(close) = from_bracket.find(']') else {
			buf.push_str(from_bracket);
			rest = "";
			break;
		};
		if from_bracket[1..close].contains('[') {
			buf.push('[');
			rest = &from_bracket[1..];
			continue;
		}
		let raw = &from_bracket[..=close];
		rest = &from_bracket[close + 1..];

		let style = stack.last().copied().unwrap_or_default();
		match parse_tag(&raw[1..raw.len() - 1]) {
			Some(Tag::Open(s)) => {
				flush(&mut tokens, &mut buf, style);
				stack.push(s);
			}
			Some(Tag::Close(s)) if stack.contains(&s) => {
				flush(&mut tokens, &mut buf, style);
				while let Some(top) = stack.pop() {
					if top == s {
						break;
					}
				}
			}
			Some(Tag::Pause(ms)) => {
				flush(&mut tokens, &mut buf, style);
				tokens.push(Token::Pause(ms));
			}
			_ => buf.push_str(raw),
		}
	}
	buf.push_str(rest);
	flush(&mut tokens, &mut buf, stack.last().copied().unwrap_or_default());
	tokens
}

fn flush(tokens: &mut Vec<Token>, buf: &mut String, style: Style) {
	if buf.is_empty() {
		return;
	}
	let text = std::mem::take(buf);
	if let Some(Token::Text { text: prev, style: prev_style }) = tokens.last_mut() {
		if *prev_style == style {
			prev.push_str(&text);
			return;
		}
	}
	tokens.push(Token::Text { text, style });
}

/// Text with all recognised tags removed.
pub fn plain_text(tokens: &[Token]) -> String {
	tokens
		.iter()
		.filter_map(|t| match t {
			Token::Text { text, .. } => Some(text.as_str()),
			Token::Pause(_) => None,
		})
		.collect()
}

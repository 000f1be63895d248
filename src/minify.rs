//! CSS minification for serialized style tags, and whitespace collapsing
//! for rendered documents.

/// Maximum input size for CSS minification (1 MiB).
///
/// Inputs exceeding this limit are returned unmodified.
const MINIFY_CSS_MAX_INPUT_SIZE: usize = 1024 * 1024;

/// Maximum input size for document minification (1 MiB).
const MINIFY_HTML_MAX_INPUT_SIZE: usize = 1024 * 1024;

/// Elements whose contents are copied verbatim by [`minify_html`].
const RAW_TEXT_ELEMENTS: &[&str] = &["pre", "textarea", "style", "script"];

/// Characters around which whitespace is never significant.
///
/// `:` is only trimmed on its right side, since `a :hover` and `a:hover`
/// are different selectors.
const TIGHT_BEFORE: &[char] = &['{', '}', ';', ',', '>'];
const TIGHT_AFTER: &[char] = &['{', '}', ':', ';', ',', '>'];

/// Minifies CSS text before it is written into a `<style>` body.
pub trait Minifier: Send + Sync {
	/// Returns the minified form of `css`.
	fn minify(&self, css: &str) -> String;
}

impl<F> Minifier for F
where
	F: Fn(&str) -> String + Send + Sync,
{
	fn minify(&self, css: &str) -> String {
		self(css)
	}
}

/// Whitespace and comment stripping minifier.
///
/// - Removes `/* ... */` comments
/// - Collapses whitespace runs and drops them next to `{ } ; , >`
/// - Drops the last `;` of a block
/// - Copies quoted strings verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct CssMinifier;

impl CssMinifier {
	/// Creates the default minifier.
	pub fn new() -> Self {
		Self
	}
}

impl Minifier for CssMinifier {
	fn minify(&self, css: &str) -> String {
		minify_css(css)
	}
}

/// Minifies CSS, returning inputs larger than 1 MiB unchanged.
pub fn minify_css(css: &str) -> String {
	if css.len() > MINIFY_CSS_MAX_INPUT_SIZE {
		return css.to_string();
	}

	let mut out = String::with_capacity(css.len());
	let mut pending_space = false;
	let mut chars = css.chars().peekable();

	while let Some(c) = chars.next() {
		if c == '/' && chars.peek() == Some(&'*') {
			chars.next();
			let mut prev = '\0';
			for inner in chars.by_ref() {
				if prev == '*' && inner == '/' {
					break;
				}
				prev = inner;
			}
			pending_space = true;
			continue;
		}

		if c.is_whitespace() {
			pending_space = true;
			continue;
		}

		if pending_space {
			let tight = out.is_empty()
				|| TIGHT_BEFORE.contains(&c)
				|| out.ends_with(|last: char| TIGHT_AFTER.contains(&last));
			if !tight {
				out.push(' ');
			}
			pending_space = false;
		}

		match c {
			'"' | '\'' => {
				out.push(c);
				let mut escaped = false;
				for inner in chars.by_ref() {
					out.push(inner);
					if escaped {
						escaped = false;
					} else if inner == '\\' {
						escaped = true;
					} else if inner == c {
						break;
					}
				}
			}
			'}' => {
				if out.ends_with(';') {
					out.pop();
				}
				out.push('}');
			}
			_ => out.push(c),
		}
	}

	out
}

/// Collapses whitespace runs in an HTML document to a single space.
///
/// The bodies of `pre`, `textarea`, `style` and `script` elements are left
/// untouched. Inputs larger than 1 MiB are returned unchanged.
pub fn minify_html(html: &str) -> String {
	if html.len() > MINIFY_HTML_MAX_INPUT_SIZE {
		return html.to_string();
	}

	let mut out = String::with_capacity(html.len());
	let mut prev_was_whitespace = false;
	let mut rest = html;

	while let Some(c) = rest.chars().next() {
		if c == '<'
			&& let Some(name) = raw_text_element(rest)
		{
			let close = format!("</{}>", name);
			let end = rest.find(&close).map_or(rest.len(), |i| i + close.len());
			out.push_str(&rest[..end]);
			rest = &rest[end..];
			prev_was_whitespace = false;
			continue;
		}

		if c.is_whitespace() {
			if !prev_was_whitespace {
				out.push(' ');
				prev_was_whitespace = true;
			}
		} else {
			out.push(c);
			prev_was_whitespace = false;
		}
		rest = &rest[c.len_utf8()..];
	}

	out
}

/// Name of the raw-text element opened at the start of `s`, which begins
/// with `<`.
fn raw_text_element(s: &str) -> Option<&'static str> {
	let after_lt = &s[1..];
	RAW_TEXT_ELEMENTS.iter().copied().find(|name| {
		after_lt.strip_prefix(name).is_some_and(|after| {
			after.is_empty() || after.starts_with(|ch: char| ch == '>' || ch.is_ascii_whitespace())
		})
	})
}

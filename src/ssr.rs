//! Full-document SSR with collected styles.
//!
//! [`StyledRenderer`] runs one [`ServerStyleSheet`] pass over a page and
//! writes the collected `<style>` tags into the document `<head>`.

use crate::error::StyleResult;
use crate::minify::minify_html;
use crate::page::{IntoPage, html_escape};
use crate::registry::StyleRegistry;
use crate::server::ServerStyleSheet;

/// Options for document rendering.
#[derive(Debug, Clone)]
pub struct SsrOptions {
	/// Language attribute for the HTML element.
	pub lang: String,
	/// Document title.
	pub title: Option<String>,
	/// Whether to collapse whitespace in the rendered document.
	pub minify: bool,
}

impl Default for SsrOptions {
	fn default() -> Self {
		Self {
			lang: "en".to_string(),
			title: None,
			minify: false,
		}
	}
}

impl SsrOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the language.
	pub fn lang(mut self, lang: impl Into<String>) -> Self {
		self.lang = lang.into();
		self
	}

	/// Sets the title.
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Enables document minification.
	pub fn minify(mut self) -> Self {
		self.minify = true;
		self
	}
}

/// Renders pages to complete HTML documents with inlined styles.
#[derive(Debug, Clone)]
pub struct StyledRenderer {
	registry: StyleRegistry,
	options: SsrOptions,
}

impl StyledRenderer {
	/// Creates a renderer collecting from `registry`.
	pub fn new(registry: StyleRegistry) -> Self {
		Self::with_options(registry, SsrOptions::default())
	}

	/// Creates a renderer with custom options.
	pub fn with_options(registry: StyleRegistry, options: SsrOptions) -> Self {
		Self { registry, options }
	}

	/// Returns the registry this renderer collects from.
	pub fn registry(&self) -> &StyleRegistry {
		&self.registry
	}

	/// Renders `children` and returns the body HTML with its style tags.
	pub fn render_parts<F, V>(&self, children: F) -> StyleResult<(String, String)>
	where
		F: FnOnce() -> V,
		V: IntoPage,
	{
		let mut sheet = ServerStyleSheet::new(&self.registry);
		let body = sheet.collect_styles(children)?.render_to_string();
		let styles = sheet.get_style_tags();
		Ok((body, styles))
	}

	/// Renders `children` to a full HTML document.
	pub fn render_page<F, V>(&self, children: F) -> StyleResult<String>
	where
		F: FnOnce() -> V,
		V: IntoPage,
	{
		let (body, styles) = self.render_parts(children)?;
		let html = self.wrap_in_html(&body, &styles);
		if self.options.minify {
			Ok(minify_html(&html))
		} else {
			Ok(html)
		}
	}

	/// Wraps body content and style tags in an HTML document.
	pub fn wrap_in_html(&self, content: &str, styles: &str) -> String {
		let mut html = String::with_capacity(content.len() + styles.len() + 256);

		html.push_str("<!DOCTYPE html>\n");
		html.push_str(&format!(
			"<html lang=\"{}\">\n",
			html_escape(&self.options.lang)
		));

		html.push_str("<head>\n");
		html.push_str("<meta charset=\"UTF-8\">\n");
		html.push_str(
			"<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
		);
		if let Some(ref title) = self.options.title {
			html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
		}
		if !styles.is_empty() {
			html.push_str(styles);
			html.push('\n');
		}
		html.push_str("</head>\n");

		html.push_str("<body>\n");
		html.push_str("<div id=\"app\">");
		html.push_str(content);
		html.push_str("</div>\n");
		html.push_str("</body>\n");
		html.push_str("</html>");

		html
	}
}

//! Rendered element tree.
//!
//! `Page` is the framework-native form of a style tag: serializers that emit
//! `<style>` elements into a rendered tree build `PageElement`s instead of raw
//! HTML strings, and the string form is recovered with
//! [`Page::render_to_string`].
//!
//! ```ignore
//! use reinhardt_styled::page::{IntoPage, PageElement};
//!
//! let style = PageElement::new("style")
//!     .key("sc-0")
//!     .attr("type", "text/css")
//!     .dangerously_set_inner_html(".a{color:red}")
//!     .into_page();
//!
//! assert_eq!(style.render_to_string(), "<style type=\"text/css\">.a{color:red}</style>");
//! ```

use std::borrow::Cow;

const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Renderable content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
	/// An element.
	Element(PageElement),
	/// Text, escaped on render.
	Text(Cow<'static, str>),
	/// Sibling pages without a wrapper.
	Fragment(Vec<Page>),
	/// Renders nothing.
	Empty,
}

/// An element with attributes and either children or trusted inner markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
	tag: Cow<'static, str>,
	/// Identity among siblings. Never serialized.
	key: Option<Cow<'static, str>>,
	attrs: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	children: Vec<Page>,
	inner_html: Option<String>,
}

impl PageElement {
	/// Creates an element with no attributes.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			tag: tag.into(),
			key: None,
			attrs: Vec::new(),
			children: Vec::new(),
			inner_html: None,
		}
	}

	/// Sets the sibling key.
	pub fn key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Appends an attribute; values are escaped on render.
	pub fn attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Appends a child.
	pub fn child(mut self, child: impl IntoPage) -> Self {
		self.children.push(child.into_page());
		self
	}

	/// Sets trusted markup written verbatim in place of the children.
	pub fn dangerously_set_inner_html(mut self, html: impl Into<String>) -> Self {
		self.inner_html = Some(html.into());
		self
	}

	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	pub fn key_value(&self) -> Option<&str> {
		self.key.as_deref()
	}

	/// Returns the value of the first attribute named `name`.
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find_map(|(n, v)| (n == name).then_some(v.as_ref()))
	}

	fn write_to(&self, out: &mut String) {
		out.push('<');
		out.push_str(&self.tag);
		for (name, value) in &self.attrs {
			out.push(' ');
			out.push_str(name);
			out.push_str("=\"");
			out.push_str(&html_escape(value));
			out.push('"');
		}

		if VOID_ELEMENTS.contains(&&*self.tag) {
			out.push_str(" />");
			return;
		}

		out.push('>');
		match &self.inner_html {
			Some(html) => out.push_str(html),
			None => self.children.iter().for_each(|child| child.write_to(out)),
		}
		out.push_str("</");
		out.push_str(&self.tag);
		out.push('>');
	}
}

impl Page {
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(content.into())
	}

	pub fn fragment(children: impl IntoIterator<Item = impl IntoPage>) -> Self {
		Self::Fragment(children.into_iter().map(IntoPage::into_page).collect())
	}

	pub fn empty() -> Self {
		Self::Empty
	}

	/// Returns the element if this page is one.
	pub fn as_element(&self) -> Option<&PageElement> {
		match self {
			Page::Element(el) => Some(el),
			_ => None,
		}
	}

	/// Serializes the page as HTML.
	pub fn render_to_string(&self) -> String {
		let mut out = String::new();
		self.write_to(&mut out);
		out
	}

	fn write_to(&self, out: &mut String) {
		match self {
			Page::Element(el) => el.write_to(out),
			Page::Text(text) => out.push_str(&html_escape(text)),
			Page::Fragment(children) => children.iter().for_each(|child| child.write_to(out)),
			Page::Empty => {}
		}
	}
}

/// Conversion into a [`Page`].
pub trait IntoPage {
	fn into_page(self) -> Page;
}

impl IntoPage for Page {
	fn into_page(self) -> Page {
		self
	}
}

impl IntoPage for PageElement {
	fn into_page(self) -> Page {
		Page::Element(self)
	}
}

impl IntoPage for String {
	fn into_page(self) -> Page {
		Page::Text(self.into())
	}
}

impl IntoPage for &'static str {
	fn into_page(self) -> Page {
		Page::Text(self.into())
	}
}

impl<T: IntoPage> IntoPage for Vec<T> {
	fn into_page(self) -> Page {
		Page::fragment(self)
	}
}

/// Escapes text for HTML content and quoted attribute values.
///
/// Borrows the input when nothing needs escaping.
pub(crate) fn html_escape(s: &str) -> Cow<'_, str> {
	let Some(first) = s.find(['&', '<', '>', '"', '\'']) else {
		return Cow::Borrowed(s);
	};

	let mut escaped = String::with_capacity(s.len() + 16);
	escaped.push_str(&s[..first]);
	for c in s[first..].chars() {
		let entity = match c {
			'&' => "&amp;",
			'<' => "&lt;",
			'>' => "&gt;",
			'"' => "&quot;",
			'\'' => "&#x27;",
			_ => {
				escaped.push(c);
				continue;
			}
		};
		escaped.push_str(entity);
	}
	Cow::Owned(escaped)
}

//! Server-side style collector.
//!
//! A [`ServerStyleSheet`] covers one render pass: it takes an isolated clone
//! of the registry's stylesheet, wraps the page in a [`StyleSheetManager`]
//! bound to that clone, and serializes whatever the render injected.
//!
//! ```ignore
//! use reinhardt_styled::{ServerStyleSheet, StyleEnv, StyleOptions, StyleRegistry};
//!
//! let registry = StyleRegistry::server(StyleEnv::new(StyleOptions::production()));
//! let mut sheet = ServerStyleSheet::new(&registry);
//! let body = sheet.collect_styles(|| app())?.render_to_string();
//! let styles = sheet.get_style_tags();
//! ```

use crate::config::StyleEnv;
use crate::error::{StyleError, StyleResult};
use crate::manager::StyleSheetManager;
use crate::page::{IntoPage, Page};
use crate::registry::StyleRegistry;
use crate::sheet::{SheetHandle, StyleSheet};
use crate::tag::ServerTag;
use std::rc::Rc;
use std::sync::Arc;

/// Collects the styles generated while rendering one page.
#[derive(Debug)]
pub struct ServerStyleSheet {
	registry: StyleRegistry,
	instance: SheetHandle,
	closed: bool,
}

impl ServerStyleSheet {
	/// Clones the registry's stylesheet for an isolated render pass.
	pub fn new(registry: &StyleRegistry) -> Self {
		Self {
			registry: registry.clone(),
			instance: registry.clone_instance(),
			closed: false,
		}
	}

	/// Creates a stylesheet whose tags are [`ServerTag`]s sharing `env`.
	pub fn create(env: StyleEnv) -> StyleSheet {
		let env = Arc::new(env);
		StyleSheet::new(move |is_local| Box::new(ServerTag::new(is_local, Arc::clone(&env))))
	}

	/// Returns the cloned stylesheet this collector writes into.
	pub fn instance(&self) -> &SheetHandle {
		&self.instance
	}

	/// Whether the collector has been finalized.
	pub fn is_closed(&self) -> bool {
		self.closed
	}

	/// Wraps `children` so that styles rendered inside land in this
	/// collector's stylesheet.
	///
	/// # Errors
	///
	/// Returns [`StyleError::AlreadyClosed`] once styles have been read.
	pub fn collect_styles<F, V>(&self, children: F) -> StyleResult<StyleSheetManager<F>>
	where
		F: FnOnce() -> V,
		V: IntoPage,
	{
		if self.closed {
			return Err(StyleError::AlreadyClosed);
		}
		Ok(StyleSheetManager::new(Rc::clone(&self.instance), children))
	}

	/// Finalizes the collector and serializes its styles as HTML.
	///
	/// Only the first call detaches the stylesheet from the registry; later
	/// calls serialize again and return the same output.
	pub fn get_style_tags(&mut self) -> String {
		self.seal();
		self.instance.borrow().to_html()
	}

	/// Finalizes the collector and returns one `<style>` element per tag.
	pub fn get_style_element(&mut self) -> Vec<Page> {
		self.seal();
		self.instance.borrow().to_elements()
	}

	fn seal(&mut self) {
		if self.closed {
			return;
		}
		self.registry.release(&self.instance);
		self.closed = true;
		tracing::debug!(
			tags = self.instance.borrow().tags().len(),
			"closed server stylesheet"
		);
	}
}

impl Drop for ServerStyleSheet {
	fn drop(&mut self) {
		if !self.closed {
			self.registry.release(&self.instance);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::StyleOptions;
	use crate::manager::use_sheet;
	use crate::page::PageElement;
	use rstest::{fixture, rstest};

	const EXPECTED: &str = "<style type=\"text/css\" data-styled-components=\"sc-1\" data-styled-components-is-local=\"true\">/* sc-component-id: a */\nbody{color:red}\n</style>";

	#[fixture]
	fn registry() -> StyleRegistry {
		StyleRegistry::server(StyleEnv::new(StyleOptions::development()))
	}

	#[rstest]
	fn test_new_registers_live_clone(registry: StyleRegistry) {
		let sheet = ServerStyleSheet::new(&registry);
		assert!(!sheet.is_closed());
		assert!(registry.is_live(sheet.instance()));
	}

	#[rstest]
	fn test_get_style_tags_end_to_end(registry: StyleRegistry) {
		let mut sheet = ServerStyleSheet::new(&registry);
		sheet
			.instance()
			.borrow_mut()
			.inject("a", true, "body{color:red}\n", None, Some("sc-1"))
			.unwrap();

		assert_eq!(sheet.get_style_tags(), EXPECTED);
		assert!(sheet.is_closed());
		assert_eq!(registry.live_clones(), 0);

		// a second live clone must survive the repeated call
		let _other = registry.clone_instance();
		assert_eq!(sheet.get_style_tags(), EXPECTED);
		assert_eq!(registry.live_clones(), 1);
	}

	#[rstest]
	fn test_collect_styles_after_close_fails(registry: StyleRegistry) {
		let mut sheet = ServerStyleSheet::new(&registry);
		sheet.get_style_tags();
		let err = sheet.collect_styles(|| "late").unwrap_err();
		assert_eq!(err, StyleError::AlreadyClosed);
	}

	#[rstest]
	fn test_collect_styles_binds_clone(registry: StyleRegistry) {
		let mut sheet = ServerStyleSheet::new(&registry);
		let html = sheet
			.collect_styles(|| {
				use_sheet()
					.unwrap()
					.borrow_mut()
					.inject("btn", false, ".btn{}", None, Some("b1"))
					.unwrap();
				PageElement::new("button").attr("class", "b1")
			})
			.unwrap()
			.render_to_string();

		assert_eq!(html, "<button class=\"b1\"></button>");
		assert!(sheet.get_style_tags().contains(".btn{}"));
		assert!(!registry.instance().borrow().has_name("b1"));
	}

	#[rstest]
	fn test_get_style_element(registry: StyleRegistry) {
		let mut sheet = ServerStyleSheet::new(&registry);
		{
			let mut instance = sheet.instance().borrow_mut();
			instance.inject("a", true, "body{color:red}\n", None, Some("sc-1")).unwrap();
			instance.inject("b", false, "p{}", None, None).unwrap();
		}

		let elements = sheet.get_style_element();
		assert!(sheet.is_closed());
		assert_eq!(registry.live_clones(), 0);
		assert_eq!(elements.len(), 2);
		assert_eq!(elements[0].as_element().unwrap().key_value(), Some("sc-0"));
		assert_eq!(elements[1].as_element().unwrap().key_value(), Some("sc-1"));
		assert_eq!(elements[0].render_to_string(), EXPECTED);
	}

	#[rstest]
	fn test_drop_releases_unclosed_clone(registry: StyleRegistry) {
		{
			let _sheet = ServerStyleSheet::new(&registry);
			assert_eq!(registry.live_clones(), 1);
		}
		assert_eq!(registry.live_clones(), 0);
	}

	#[rstest]
	fn test_collectors_are_isolated(registry: StyleRegistry) {
		let mut first = ServerStyleSheet::new(&registry);
		let mut second = ServerStyleSheet::new(&registry);
		first
			.instance()
			.borrow_mut()
			.inject("a", false, ".first{}", None, Some("f"))
			.unwrap();

		assert!(first.get_style_tags().contains(".first{}"));
		assert_eq!(second.get_style_tags(), "");
	}
}

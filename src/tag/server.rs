//! In-memory tag used while rendering on the server.

use super::{ComponentRecord, LOCAL_ATTR, SC_ATTR, Tag};
use crate::config::StyleEnv;
use crate::error::{StyleError, StyleResult};
use crate::page::{IntoPage, Page, PageElement, html_escape};
use indexmap::IndexMap;
use std::sync::Arc;

/// Unbounded tag collecting CSS into strings.
///
/// Components keep their insertion order, so serialization is deterministic
/// for a given sequence of `add_component`/`inject` calls.
#[derive(Debug, Clone)]
pub struct ServerTag {
	is_local: bool,
	components: IndexMap<String, ComponentRecord>,
	size: usize,
	names: Vec<String>,
	env: Arc<StyleEnv>,
}

impl ServerTag {
	/// Creates an empty tag.
	pub fn new(is_local: bool, env: Arc<StyleEnv>) -> Self {
		Self {
			is_local,
			components: IndexMap::new(),
			size: 0,
			names: Vec::new(),
			env,
		}
	}

	/// Returns the record stored for `component_id`.
	pub fn component(&self, component_id: &str) -> Option<&ComponentRecord> {
		self.components.get(component_id)
	}

	fn insert_empty(&mut self, component_id: &str) {
		self.components
			.insert(component_id.to_string(), ComponentRecord::new(component_id));
		self.size += 1;
	}

	fn attributes(&self) -> Vec<(&'static str, String)> {
		let mut attrs = vec![
			("type", "text/css".to_string()),
			(SC_ATTR, self.names.join(" ")),
			(LOCAL_ATTR, self.is_local.to_string()),
		];
		if let Some(nonce) = self.env.nonce() {
			attrs.push(("nonce", nonce));
		}
		attrs
	}

	fn output_css(&self) -> String {
		self.env.finish_css(self.concatenate_css())
	}
}

impl Tag for ServerTag {
	fn is_local(&self) -> bool {
		self.is_local
	}

	fn is_full(&self) -> bool {
		false
	}

	fn size(&self) -> usize {
		self.size
	}

	fn names(&self) -> &[String] {
		&self.names
	}

	fn has_component(&self, component_id: &str) -> bool {
		self.components.contains_key(component_id)
	}

	fn add_component(&mut self, component_id: &str) -> StyleResult<()> {
		if self.env.options().strict_validation && self.components.contains_key(component_id) {
			return Err(StyleError::DuplicateComponent(component_id.to_string()));
		}
		tracing::trace!(component_id, is_local = self.is_local, "adding component");
		self.insert_empty(component_id);
		Ok(())
	}

	fn inject(&mut self, component_id: &str, css: &str, name: Option<&str>) -> StyleResult<()> {
		if !self.components.contains_key(component_id) {
			if self.env.options().strict_validation {
				return Err(StyleError::ComponentNotFound(component_id.to_string()));
			}
			tracing::warn!(component_id, "injecting into unregistered component");
			self.insert_empty(component_id);
		}

		let Some(record) = self.components.get_mut(component_id) else {
			return Err(StyleError::ComponentNotFound(component_id.to_string()));
		};
		if record.css.is_empty() {
			record.css = format!("/* sc-component-id: {} */\n", component_id);
		}
		record.css.push_str(css.trim_end_matches('\n'));
		record.css.push('\n');

		if let Some(name) = name.filter(|n| !n.is_empty()) {
			self.names.push(name.to_string());
		}
		tracing::trace!(component_id, bytes = css.len(), "injected css");
		Ok(())
	}

	fn concatenate_css(&self) -> String {
		self.components
			.values()
			.map(|record| record.css.as_str())
			.collect()
	}

	fn to_html(&self) -> String {
		let attrs = self
			.attributes()
			.into_iter()
			.map(|(name, value)| format!("{}=\"{}\"", name, html_escape(&value)))
			.collect::<Vec<_>>()
			.join(" ");
		format!("<style {}>{}</style>", attrs, self.output_css())
	}

	fn to_element(&self, key: &str) -> Page {
		let element = self
			.attributes()
			.into_iter()
			.fold(PageElement::new("style").key(key.to_string()), |el, (name, value)| {
				el.attr(name, value)
			});
		element
			.dangerously_set_inner_html(self.output_css())
			.into_page()
	}

	fn clone_tag(&self) -> Box<dyn Tag> {
		Box::new(self.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::StyleOptions;
	use crate::nonce::CspNonce;
	use rstest::{fixture, rstest};

	#[fixture]
	fn dev_env() -> Arc<StyleEnv> {
		Arc::new(StyleEnv::new(StyleOptions::development()))
	}

	#[fixture]
	fn prod_env() -> Arc<StyleEnv> {
		Arc::new(StyleEnv::new(StyleOptions::production()))
	}

	#[rstest]
	fn test_is_never_full(dev_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(false, dev_env);
		for i in 0..100 {
			tag.add_component(&format!("c{}", i)).unwrap();
		}
		assert!(!tag.is_full());
	}

	#[rstest]
	fn test_size_counts_distinct_adds_and_preserves_order(dev_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(false, dev_env);
		for id in ["b", "a", "c"] {
			tag.add_component(id).unwrap();
			tag.inject(id, &format!(".{}{{}}", id), None).unwrap();
		}
		assert_eq!(tag.size(), 3);
		assert_eq!(
			tag.concatenate_css(),
			"/* sc-component-id: b */\n.b{}\n/* sc-component-id: a */\n.a{}\n/* sc-component-id: c */\n.c{}\n"
		);
	}

	#[rstest]
	fn test_duplicate_add_fails_when_strict(dev_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(false, dev_env);
		tag.add_component("a").unwrap();
		assert_eq!(
			tag.add_component("a"),
			Err(StyleError::DuplicateComponent("a".to_string()))
		);
		assert_eq!(tag.size(), 1);
	}

	#[rstest]
	fn test_duplicate_add_tolerated_when_not_strict(prod_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(false, prod_env);
		tag.add_component("a").unwrap();
		assert!(tag.add_component("a").is_ok());
		assert!(tag.has_component("a"));
	}

	#[rstest]
	fn test_inject_unknown_component_fails_when_strict(dev_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(false, dev_env);
		assert_eq!(
			tag.inject("ghost", "a{}", Some("n")),
			Err(StyleError::ComponentNotFound("ghost".to_string()))
		);
		assert!(tag.names().is_empty());
		assert_eq!(tag.concatenate_css(), "");
	}

	#[rstest]
	fn test_inject_unknown_component_registers_when_not_strict(prod_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(false, prod_env);
		tag.inject("ghost", "a{}", None).unwrap();
		assert_eq!(tag.size(), 1);
		assert_eq!(
			tag.component("ghost").unwrap().css,
			"/* sc-component-id: ghost */\na{}\n"
		);
	}

	#[rstest]
	#[case("a\n\n\n", "a\n")]
	#[case("a", "a\n")]
	#[case("a\n", "a\n")]
	#[case("a\nb\n\n", "a\nb\n")]
	fn test_inject_collapses_trailing_newlines(
		dev_env: Arc<StyleEnv>,
		#[case] css: &str,
		#[case] stored_suffix: &str,
	) {
		let mut tag = ServerTag::new(false, dev_env);
		tag.add_component("x").unwrap();
		tag.inject("x", css, None).unwrap();
		let stored = &tag.component("x").unwrap().css;
		assert_eq!(stored, &format!("/* sc-component-id: x */\n{}", stored_suffix));
		assert!(!stored.ends_with("\n\n"));
	}

	#[rstest]
	fn test_marker_written_once(dev_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(false, dev_env);
		tag.add_component("x").unwrap();
		tag.inject("x", "a{}", Some("n1")).unwrap();
		tag.inject("x", "b{}", Some("n1")).unwrap();
		let css = &tag.component("x").unwrap().css;
		assert_eq!(css.matches("sc-component-id").count(), 1);
		assert_eq!(tag.names(), ["n1", "n1"]);
	}

	#[rstest]
	fn test_empty_name_is_not_recorded(dev_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(false, dev_env);
		tag.add_component("x").unwrap();
		tag.inject("x", "a{}", Some("")).unwrap();
		tag.inject("x", "b{}", None).unwrap();
		assert!(tag.names().is_empty());
	}

	#[rstest]
	fn test_to_html(dev_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(true, dev_env);
		tag.add_component("a").unwrap();
		tag.inject("a", "body{color:red}\n", Some("sc-1")).unwrap();
		assert_eq!(
			tag.to_html(),
			"<style type=\"text/css\" data-styled-components=\"sc-1\" data-styled-components-is-local=\"true\">/* sc-component-id: a */\nbody{color:red}\n</style>"
		);
	}

	#[rstest]
	fn test_to_html_with_nonce() {
		let env = Arc::new(
			StyleEnv::new(StyleOptions::development()).with_nonce(CspNonce::new("abc")),
		);
		let tag = ServerTag::new(false, env);
		let html = tag.to_html();
		assert!(html.contains("type=\"text/css\""));
		assert!(html.contains("data-styled-components=\"\""));
		assert!(html.contains("data-styled-components-is-local=\"false\""));
		assert!(html.ends_with(" nonce=\"abc\"></style>"));
	}

	#[rstest]
	fn test_to_html_minifies_in_production(prod_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(false, prod_env);
		tag.add_component("a").unwrap();
		tag.inject("a", "body { color: red; }", Some("sc-1")).unwrap();
		assert!(tag.to_html().ends_with(">body{color:red}</style>"));
	}

	#[rstest]
	fn test_to_html_escapes_attribute_values(dev_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(false, dev_env);
		tag.add_component("a").unwrap();
		tag.inject("a", "a{}", Some("\"><script>")).unwrap();
		let html = tag.to_html();
		assert!(!html.contains("\"><script>"));
		assert!(html.contains("&quot;&gt;&lt;script&gt;"));
	}

	#[rstest]
	fn test_to_element_matches_to_html(dev_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(false, dev_env);
		tag.add_component("a").unwrap();
		tag.inject("a", "a > b{x:y}", Some("n1")).unwrap();

		let page = tag.to_element("sc-0");
		let element = page.as_element().unwrap();
		assert_eq!(element.key_value(), Some("sc-0"));
		assert_eq!(element.get_attr(SC_ATTR), Some("n1"));
		assert_eq!(element.get_attr(LOCAL_ATTR), Some("false"));
		assert_eq!(page.render_to_string(), tag.to_html());
	}

	#[rstest]
	fn test_reads_are_idempotent(dev_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(false, dev_env);
		tag.add_component("a").unwrap();
		tag.inject("a", "a{}", Some("n")).unwrap();
		assert_eq!(tag.to_html(), tag.to_html());
		assert_eq!(tag.to_element("k"), tag.to_element("k"));
	}

	#[rstest]
	fn test_clone_is_isolated(dev_env: Arc<StyleEnv>) {
		let mut tag = ServerTag::new(true, dev_env);
		tag.add_component("a").unwrap();
		tag.inject("a", "a{}", Some("n1")).unwrap();

		let copy = tag.clone_tag();
		let snapshot = copy.concatenate_css();
		tag.inject("a", "b{}", Some("n2")).unwrap();
		tag.add_component("b").unwrap();

		assert_eq!(copy.concatenate_css(), snapshot);
		assert_eq!(copy.names(), ["n1"]);
		assert_eq!(copy.size(), 1);
		assert!(copy.is_local());
		assert!(!copy.has_component("b"));
	}
}

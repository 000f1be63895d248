//! Style tags: the per-stylesheet registries of component CSS.
//!
//! A stylesheet owns one or more tags. Each tag maps component ids to the
//! CSS accumulated for them and knows how to serialize itself, either as an
//! HTML `<style>` string or as a [`Page`] element.
//!
//! [`ServerTag`] is the in-memory variant used during server rendering.

mod server;

pub use server::ServerTag;

use crate::error::StyleResult;
use crate::page::Page;

/// Attribute listing the style names injected into a tag.
pub const SC_ATTR: &str = "data-styled-components";

/// Attribute marking whether a tag holds component-local styles.
pub const LOCAL_ATTR: &str = "data-styled-components-is-local";

/// CSS accumulated for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRecord {
	/// The component identifier.
	pub component_id: String,
	/// Newline-terminated CSS fragments, prefixed by a marker comment.
	pub css: String,
}

impl ComponentRecord {
	/// Creates an empty record.
	pub fn new(component_id: impl Into<String>) -> Self {
		Self {
			component_id: component_id.into(),
			css: String::new(),
		}
	}
}

/// Common interface of the tag variants a stylesheet can hold.
///
/// Object safe, so a stylesheet stores `Box<dyn Tag>` built by its tag
/// constructor.
pub trait Tag {
	/// Whether the tag holds component-local styles.
	fn is_local(&self) -> bool;

	/// Whether the tag accepts no further components.
	fn is_full(&self) -> bool;

	/// Number of `add_component` calls received.
	fn size(&self) -> usize;

	/// Style names injected so far, in order.
	fn names(&self) -> &[String];

	/// Whether `component_id` has a slot in this tag.
	fn has_component(&self, component_id: &str) -> bool;

	/// Registers an empty slot for `component_id`.
	fn add_component(&mut self, component_id: &str) -> StyleResult<()>;

	/// Appends `css` to the component's slot and records `name`.
	fn inject(&mut self, component_id: &str, css: &str, name: Option<&str>) -> StyleResult<()>;

	/// Concatenates every component's CSS in insertion order.
	fn concatenate_css(&self) -> String;

	/// Serializes the tag as an HTML `<style>` element.
	fn to_html(&self) -> String;

	/// Builds the tag as a keyed `<style>` page element.
	fn to_element(&self, key: &str) -> Page;

	/// Returns an independent copy of the tag.
	fn clone_tag(&self) -> Box<dyn Tag>;
}

impl std::fmt::Debug for dyn Tag {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Tag")
			.field("is_local", &self.is_local())
			.field("size", &self.size())
			.field("names", &self.names())
			.finish()
	}
}

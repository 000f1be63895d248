//! Stylesheets: ordered collections of tags.
//!
//! A [`StyleSheet`] assigns each component to a tag, creating tags through
//! its tag constructor whenever the last tag is full or has the wrong
//! locality. It also remembers which style names were injected so callers
//! can skip regenerating CSS they already emitted.
//!
//! The master sheet of a [`StyleRegistry`](crate::registry::StyleRegistry)
//! is linked to the registry's live clones: every injection into it is
//! replayed into each clone first, without hash or name bookkeeping.

use crate::error::StyleResult;
use crate::page::Page;
use crate::tag::Tag;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Builds a new tag for the given locality.
pub type TagConstructor = Arc<dyn Fn(bool) -> Box<dyn Tag> + Send + Sync>;

/// Shared handle to a stylesheet.
pub type SheetHandle = Rc<RefCell<StyleSheet>>;

/// Live clones of a master sheet.
pub(crate) type CloneList = RefCell<Vec<SheetHandle>>;

/// An ordered set of tags plus injection bookkeeping.
pub struct StyleSheet {
	tag_constructor: TagConstructor,
	tags: Vec<Box<dyn Tag>>,
	/// Component id to index into `tags`.
	component_tags: HashMap<String, usize>,
	names: HashSet<String>,
	hashes: HashMap<String, String>,
	deferred_injections: HashMap<String, String>,
	/// Set only on a registry's master sheet.
	live_clones: Weak<CloneList>,
}

impl fmt::Debug for StyleSheet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StyleSheet")
			.field("tags", &self.tags)
			.field("components", &self.component_tags.len())
			.field("names", &self.names.len())
			.field("is_master", &self.is_master())
			.finish()
	}
}

impl StyleSheet {
	/// Creates an empty stylesheet using `tag_constructor` for new tags.
	pub fn new<F>(tag_constructor: F) -> Self
	where
		F: Fn(bool) -> Box<dyn Tag> + Send + Sync + 'static,
	{
		Self::with_constructor(Arc::new(tag_constructor))
	}

	/// Creates an empty stylesheet sharing an existing constructor.
	pub fn with_constructor(tag_constructor: TagConstructor) -> Self {
		Self {
			tag_constructor,
			tags: Vec::new(),
			component_tags: HashMap::new(),
			names: HashSet::new(),
			hashes: HashMap::new(),
			deferred_injections: HashMap::new(),
			live_clones: Weak::new(),
		}
	}

	/// Wraps the sheet in a shared handle.
	pub fn into_handle(self) -> SheetHandle {
		Rc::new(RefCell::new(self))
	}

	/// Whether injections into this sheet are replayed into live clones.
	pub fn is_master(&self) -> bool {
		self.live_clones.strong_count() > 0
	}

	pub(crate) fn link_clones(&mut self, clones: &Rc<CloneList>) {
		self.live_clones = Rc::downgrade(clones);
	}

	pub(crate) fn unlink_clones(&mut self) {
		self.live_clones = Weak::new();
	}

	/// Returns the tags in creation order.
	pub fn tags(&self) -> &[Box<dyn Tag>] {
		&self.tags
	}

	/// Whether `component_id` already owns a tag slot.
	pub fn has_injected_component(&self, component_id: &str) -> bool {
		self.component_tags.contains_key(component_id)
	}

	/// Whether a style name has been injected.
	pub fn has_name(&self, name: &str) -> bool {
		self.names.contains(name)
	}

	/// Returns the name recorded for a content hash.
	pub fn get_name(&self, hash: &str) -> Option<&str> {
		self.hashes.get(hash).map(String::as_str)
	}

	/// Returns `true` and records `hash → name` when `name` was already
	/// injected; returns `false` otherwise.
	pub fn already_injected(&mut self, hash: &str, name: &str) -> bool {
		if !self.names.contains(name) {
			return false;
		}
		self.hashes.insert(hash.to_string(), name.to_string());
		true
	}

	/// Reserves a tag slot and stores CSS written before the component's
	/// first real injection.
	pub fn deferred_inject(
		&mut self,
		component_id: &str,
		is_local: bool,
		css: &str,
	) -> StyleResult<()> {
		if let Some(clones) = self.live_clones.upgrade() {
			for clone in clones.borrow().iter() {
				clone
					.borrow_mut()
					.deferred_inject(component_id, is_local, css)?;
			}
		}
		self.get_or_create_tag(component_id, is_local)?;
		self.deferred_injections
			.insert(component_id.to_string(), css.to_string());
		Ok(())
	}

	/// Injects `css` for a component, flushing deferred CSS first.
	///
	/// On a master sheet the css is written into every live clone before
	/// the master itself.
	pub fn inject(
		&mut self,
		component_id: &str,
		is_local: bool,
		css: &str,
		hash: Option<&str>,
		name: Option<&str>,
	) -> StyleResult<()> {
		if let Some(clones) = self.live_clones.upgrade() {
			for clone in clones.borrow().iter() {
				clone
					.borrow_mut()
					.inject(component_id, is_local, css, None, None)?;
			}
		}

		let index = self.get_or_create_tag(component_id, is_local)?;
		if let Some(deferred) = self.deferred_injections.remove(component_id) {
			self.tags[index].inject(component_id, &deferred, None)?;
		}
		self.tags[index].inject(component_id, css, name)?;

		if let Some(name) = name.filter(|n| !n.is_empty()) {
			self.names.insert(name.to_string());
			if let Some(hash) = hash {
				self.hashes.insert(hash.to_string(), name.to_string());
			}
		}
		Ok(())
	}

	/// Serializes every tag as HTML, in order.
	pub fn to_html(&self) -> String {
		self.tags.iter().map(|tag| tag.to_html()).collect()
	}

	/// Builds one keyed element per tag (`sc-0`, `sc-1`, ...).
	pub fn to_elements(&self) -> Vec<Page> {
		self.tags
			.iter()
			.enumerate()
			.map(|(i, tag)| tag.to_element(&format!("sc-{}", i)))
			.collect()
	}

	/// Returns an independent copy of the sheet.
	///
	/// Tags are cloned individually; the component-to-tag index is rebuilt
	/// from the cloned tags. The copy is never a master.
	pub fn clone_sheet(&self) -> StyleSheet {
		let mut copy = StyleSheet::with_constructor(Arc::clone(&self.tag_constructor));
		copy.tags = self.tags.iter().map(|tag| tag.clone_tag()).collect();
		copy.names = self.names.clone();
		copy.hashes = self.hashes.clone();
		copy.deferred_injections = self.deferred_injections.clone();
		copy.construct_component_tag_map(self.component_tags.keys());
		copy
	}

	fn construct_component_tag_map<'a>(&mut self, ids: impl Iterator<Item = &'a String>) {
		for id in ids {
			if let Some(index) = self.tags.iter().position(|tag| tag.has_component(id)) {
				self.component_tags.insert(id.clone(), index);
			}
		}
	}

	fn get_or_create_tag(&mut self, component_id: &str, is_local: bool) -> StyleResult<usize> {
		if let Some(&index) = self.component_tags.get(component_id) {
			return Ok(index);
		}

		let reusable = self
			.tags
			.last()
			.is_some_and(|last| !last.is_full() && last.is_local() == is_local);
		let index = if reusable {
			self.tags.len() - 1
		} else {
			self.create_new_tag(is_local)
		};

		self.tags[index].add_component(component_id)?;
		self.component_tags.insert(component_id.to_string(), index);
		Ok(index)
	}

	fn create_new_tag(&mut self, is_local: bool) -> usize {
		tracing::trace!(is_local, index = self.tags.len(), "creating style tag");
		self.tags.push((self.tag_constructor)(is_local));
		self.tags.len() - 1
	}
}

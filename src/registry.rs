//! The stylesheet registry.
//!
//! A [`StyleRegistry`] holds the master stylesheet shared by a process (or
//! by a test) and the list of live clones handed out to server collectors.
//! The master sheet is linked to that list: styles injected into it while
//! clones are live are replayed into every clone, whichever path the write
//! takes, so a collector also captures component styles registered
//! globally in the middle of its render.
//!
//! ```ignore
//! use reinhardt_styled::{StyleEnv, StyleRegistry, StyleOptions};
//!
//! let registry = StyleRegistry::server(StyleEnv::new(StyleOptions::production()));
//! let sheet = registry.clone_instance();
//! assert_eq!(registry.live_clones(), 1);
//! registry.release(&sheet);
//! ```

use crate::config::StyleEnv;
use crate::error::StyleResult;
use crate::server::ServerStyleSheet;
use crate::sheet::{CloneList, SheetHandle, StyleSheet};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

struct RegistryInner {
	instance: RefCell<SheetHandle>,
	clones: Rc<CloneList>,
}

/// Factory and owner of the master stylesheet and its live clones.
///
/// Cloning the registry yields another handle to the same state.
#[derive(Clone)]
pub struct StyleRegistry {
	inner: Rc<RegistryInner>,
}

impl fmt::Debug for StyleRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StyleRegistry")
			.field("live_clones", &self.live_clones())
			.finish()
	}
}

impl StyleRegistry {
	/// Creates a registry around a master stylesheet.
	pub fn new(mut instance: StyleSheet) -> Self {
		let clones = Rc::new(RefCell::new(Vec::new()));
		instance.link_clones(&clones);
		Self {
			inner: Rc::new(RegistryInner {
				instance: RefCell::new(instance.into_handle()),
				clones,
			}),
		}
	}

	/// Creates a registry whose master sheet builds server tags.
	pub fn server(env: StyleEnv) -> Self {
		Self::new(ServerStyleSheet::create(env))
	}

	/// Returns the master stylesheet.
	pub fn instance(&self) -> SheetHandle {
		Rc::clone(&self.inner.instance.borrow())
	}

	/// Replaces the master stylesheet. Live clones are left untouched.
	///
	/// The previous master stops replaying its injections into them.
	pub fn reset(&self, mut instance: StyleSheet) {
		instance.link_clones(&self.inner.clones);
		let previous = self.inner.instance.replace(instance.into_handle());
		previous.borrow_mut().unlink_clones();
	}

	/// Clones the master stylesheet and registers the clone as live.
	pub fn clone_instance(&self) -> SheetHandle {
		let copy = self.inner.instance.borrow().borrow().clone_sheet().into_handle();
		self.inner.clones.borrow_mut().push(Rc::clone(&copy));
		tracing::debug!(live_clones = self.live_clones(), "cloned stylesheet");
		copy
	}

	/// Removes `sheet` from the live clones.
	///
	/// Returns `false` when it was not registered.
	pub fn release(&self, sheet: &SheetHandle) -> bool {
		let mut clones = self.inner.clones.borrow_mut();
		let Some(position) = clones.iter().position(|c| Rc::ptr_eq(c, sheet)) else {
			return false;
		};
		clones.remove(position);
		tracing::debug!(live_clones = clones.len(), "released stylesheet");
		true
	}

	/// Number of live clones.
	pub fn live_clones(&self) -> usize {
		self.inner.clones.borrow().len()
	}

	/// Whether `sheet` is a live clone of this registry.
	pub fn is_live(&self, sheet: &SheetHandle) -> bool {
		self.inner
			.clones
			.borrow()
			.iter()
			.any(|c| Rc::ptr_eq(c, sheet))
	}

	/// Injects into the master sheet, which replays into every live clone.
	pub fn inject(
		&self,
		component_id: &str,
		is_local: bool,
		css: &str,
		hash: Option<&str>,
		name: Option<&str>,
	) -> StyleResult<()> {
		self.instance()
			.borrow_mut()
			.inject(component_id, is_local, css, hash, name)
	}

	/// Defers CSS in the master sheet and every live clone.
	pub fn deferred_inject(&self, component_id: &str, is_local: bool, css: &str) -> StyleResult<()> {
		self.instance()
			.borrow_mut()
			.deferred_inject(component_id, is_local, css)
	}
}

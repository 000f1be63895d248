//! Scoped stylesheet provider.
//!
//! `StyleSheetManager` binds a stylesheet for the duration of a subtree
//! render. Styled components rendered inside the subtree look up the
//! innermost bound sheet with [`use_sheet`] and write into it, which keeps
//! each server render isolated from the master sheet and from other
//! renders.

use crate::page::{IntoPage, Page};
use crate::sheet::SheetHandle;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

thread_local! {
	static SHEET_STACK: RefCell<Vec<SheetHandle>> = const { RefCell::new(Vec::new()) };
}

/// Returns the innermost stylesheet bound by a `StyleSheetManager`.
///
/// Returns `None` outside of any manager scope.
pub fn use_sheet() -> Option<SheetHandle> {
	SHEET_STACK.with(|stack| stack.borrow().last().cloned())
}

/// Pops the bound sheet when the render scope ends, including on unwind.
struct ScopeGuard;

impl ScopeGuard {
	fn enter(sheet: SheetHandle) -> Self {
		SHEET_STACK.with(|stack| stack.borrow_mut().push(sheet));
		ScopeGuard
	}
}

impl Drop for ScopeGuard {
	fn drop(&mut self) {
		SHEET_STACK.with(|stack| {
			stack.borrow_mut().pop();
		});
	}
}

/// Provider binding a stylesheet to a deferred subtree render.
pub struct StyleSheetManager<F> {
	sheet: SheetHandle,
	children: F,
}

impl<F> fmt::Debug for StyleSheetManager<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StyleSheetManager")
			.field("sheet", &Rc::as_ptr(&self.sheet))
			.field("children", &"<closure>")
			.finish()
	}
}

impl<F, V> StyleSheetManager<F>
where
	F: FnOnce() -> V,
	V: IntoPage,
{
	/// Binds `sheet` to the render of `children`.
	pub fn new(sheet: SheetHandle, children: F) -> Self {
		Self { sheet, children }
	}

	/// Renders the children with the sheet bound.
	pub fn render(self) -> Page {
		let _guard = ScopeGuard::enter(self.sheet);
		(self.children)().into_page()
	}

	/// Renders the children to an HTML string with the sheet bound.
	pub fn render_to_string(self) -> String {
		self.render().render_to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{StyleEnv, StyleOptions};
	use crate::page::PageElement;
	use crate::server::ServerStyleSheet;
	use rstest::rstest;
	use std::panic::{AssertUnwindSafe, catch_unwind};

	fn new_sheet() -> SheetHandle {
		ServerStyleSheet::create(StyleEnv::new(StyleOptions::development())).into_handle()
	}

	#[rstest]
	fn test_no_sheet_outside_scope() {
		assert!(use_sheet().is_none());
	}

	#[rstest]
	fn test_sheet_bound_during_render_only() {
		let sheet = new_sheet();
		let manager = StyleSheetManager::new(Rc::clone(&sheet), || {
			let active = use_sheet().unwrap();
			assert!(Rc::ptr_eq(&active, &sheet));
			PageElement::new("div")
		});
		assert_eq!(manager.render_to_string(), "<div></div>");
		assert!(use_sheet().is_none());
	}

	#[rstest]
	fn test_nested_managers_use_innermost_sheet() {
		let outer = new_sheet();
		let inner = new_sheet();
		let page = StyleSheetManager::new(Rc::clone(&outer), || {
			let nested = StyleSheetManager::new(Rc::clone(&inner), || {
				assert!(Rc::ptr_eq(&use_sheet().unwrap(), &inner));
				"inner"
			})
			.render();
			assert!(Rc::ptr_eq(&use_sheet().unwrap(), &outer));
			page_pair(nested)
		})
		.render();
		assert_eq!(page.render_to_string(), "innerouter");
	}

	fn page_pair(first: Page) -> Page {
		Page::fragment(vec![first, Page::text("outer")])
	}

	#[rstest]
	fn test_scope_is_popped_on_panic() {
		let sheet = new_sheet();
		let result = catch_unwind(AssertUnwindSafe(|| {
			StyleSheetManager::new(sheet, || -> Page { panic!("render failed") }).render()
		}));
		assert!(result.is_err());
		assert!(use_sheet().is_none());
	}
}

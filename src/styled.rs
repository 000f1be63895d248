//! Styled components.
//!
//! A [`StyledComponent`] pairs an element with the CSS it needs. Rendering
//! it inside a [`StyleSheetManager`](crate::manager::StyleSheetManager)
//! injects the CSS into the bound stylesheet once per class name and
//! returns the element carrying that class.
//!
//! ```ignore
//! use reinhardt_styled::StyledComponent;
//!
//! let button = StyledComponent::new("Button", "button", "sc-btn", ".sc-btn{color:red}");
//! let page = button.render("Click")?;
//! ```

use crate::error::{StyleError, StyleResult};
use crate::manager::use_sheet;
use crate::page::{IntoPage, PageElement};
use std::borrow::Cow;

/// An element type with attached styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledComponent {
	component_id: Cow<'static, str>,
	tag: Cow<'static, str>,
	name: String,
	css: String,
	is_local: bool,
}

impl StyledComponent {
	/// Creates a styled component rendering `tag` with class `name`.
	pub fn new(
		component_id: impl Into<Cow<'static, str>>,
		tag: impl Into<Cow<'static, str>>,
		name: impl Into<String>,
		css: impl Into<String>,
	) -> Self {
		Self {
			component_id: component_id.into(),
			tag: tag.into(),
			name: name.into(),
			css: css.into(),
			is_local: false,
		}
	}

	/// Marks the styles as component-local.
	pub fn local(mut self, is_local: bool) -> Self {
		self.is_local = is_local;
		self
	}

	/// Returns the component id.
	pub fn component_id(&self) -> &str {
		&self.component_id
	}

	/// Returns the generated class name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Injects the styles into the active sheet and builds the element.
	///
	/// # Errors
	///
	/// Returns [`StyleError::NoActiveSheet`] outside a manager scope, or the
	/// sheet's validation error.
	pub fn render(&self, children: impl IntoPage) -> StyleResult<PageElement> {
		let sheet = use_sheet().ok_or(StyleError::NoActiveSheet)?;
		{
			let mut sheet = sheet.borrow_mut();
			if !sheet.has_name(&self.name) {
				sheet.inject(
					&self.component_id,
					self.is_local,
					&self.css,
					None,
					Some(&self.name),
				)?;
			}
		}
		Ok(PageElement::new(self.tag.clone())
			.attr("class", self.name.clone())
			.child(children))
	}
}

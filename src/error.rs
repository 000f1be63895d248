//! Error types for style collection.

use thiserror::Error;

/// Errors raised by tags, stylesheets and the server collector.
///
/// All variants are contract violations by the caller. Nothing here is
/// transient, so no operation retries internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
	/// The collector was already finalized by `get_style_tags` or
	/// `get_style_element`.
	#[error("Can't collect styles once you've called get_style_tags")]
	AlreadyClosed,

	/// `add_component` was called twice for the same id (strict validation only).
	#[error("Trying to add component '{0}' twice")]
	DuplicateComponent(String),

	/// `inject` targeted an id that was never added (strict validation only).
	#[error("Must add component '{0}' before injecting css into it")]
	ComponentNotFound(String),

	/// A styled component rendered outside of any `StyleSheetManager`.
	#[error("No stylesheet is active; render inside StyleSheetManager")]
	NoActiveSheet,
}

/// Result type alias for style operations.
pub type StyleResult<T> = Result<T, StyleError>;

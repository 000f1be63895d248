//! CSP nonce lookup for inline `<style>` tags.
//!
//! When a Content-Security-Policy restricts `style-src`, inline styles need a
//! `nonce` attribute matching the one sent in the response header. The value
//! is looked up at every serialization through [`NonceSource`].

/// Nonce value for the current response.
///
/// Same shape as the value the CSP middleware stores in request extensions,
/// so a handler can pass it straight through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CspNonce(pub String);

impl CspNonce {
	/// Creates a nonce wrapper.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the nonce value.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Source of the nonce attached to serialized style tags.
///
/// Returning `None` (or an empty string) omits the attribute.
pub trait NonceSource: Send + Sync {
	/// Returns the nonce for the current serialization.
	fn nonce(&self) -> Option<String>;
}

/// Never yields a nonce.
impl NonceSource for () {
	fn nonce(&self) -> Option<String> {
		None
	}
}

impl NonceSource for CspNonce {
	fn nonce(&self) -> Option<String> {
		Some(self.0.clone())
	}
}

impl NonceSource for Option<String> {
	fn nonce(&self) -> Option<String> {
		self.clone()
	}
}

impl<F> NonceSource for F
where
	F: Fn() -> Option<String> + Send + Sync,
{
	fn nonce(&self) -> Option<String> {
		self()
	}
}
